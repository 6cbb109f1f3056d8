use std::{fs, path::Path};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ExtractError, Result};

/// Read and deserialize a JSON document.
///
/// Read and parse failures are both fatal: a JSON input of the pipeline that cannot
/// be read means a broken build input.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ExtractError::json(path, e))
}

/// Top-level keys of a localization bundle, in file order.
pub fn read_localization_keys(path: &Path) -> Result<Vec<String>> {
    let value: Value = read_json_file(path)?;
    match value {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        _ => Ok(Vec::new()),
    }
}
