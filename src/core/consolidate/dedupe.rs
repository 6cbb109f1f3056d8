//! Content-hash deduplication of configuration records.

use std::collections::{BTreeMap, HashSet};

use sha2::{Digest, Sha256};

use crate::core::{data::ComponentConfigOutput, diagnostics::Diagnostics};
use crate::error::{ExtractError, Result};

/// Digest of a record's JSON form without its `path`.
///
/// Two records declared in different files but otherwise identical share a hash.
pub fn content_hash(config: &ComponentConfigOutput) -> String {
    let mut value = serde_json::to_value(config).unwrap_or_default();
    if let Some(object) = value.as_object_mut() {
        object.remove("path");
    }
    hex::encode(Sha256::digest(value.to_string().as_bytes()))
}

/// Drop records whose content was already seen, keeping the first occurrence.
pub fn dedupe(configs: Vec<ComponentConfigOutput>) -> Vec<ComponentConfigOutput> {
    let mut seen = HashSet::new();
    configs
        .into_iter()
        .filter(|config| seen.insert(content_hash(config)))
        .collect()
}

/// Fail when two records share `(library, name)` with different content.
///
/// Strict mode returns [`ExtractError::DuplicateConfiguration`]; lenient mode warns
/// and keeps every record.
pub fn check_uniqueness(configs: &[ComponentConfigOutput], diags: &mut Diagnostics) -> Result<()> {
    let mut by_name: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for config in configs {
        *by_name
            .entry((config.library.as_str(), config.name.as_str()))
            .or_default() += 1;
    }

    let duplicates: Vec<String> = by_name
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((library, name), _)| format!("({}, {})", library, name))
        .collect();
    if duplicates.is_empty() {
        return Ok(());
    }

    if diags.is_strict() {
        return Err(ExtractError::DuplicateConfiguration { duplicates });
    }
    diags.warn(format!(
        "Duplicate (library, name) tuples are not allowed: {}",
        duplicates.join(", ")
    ));
    Ok(())
}
