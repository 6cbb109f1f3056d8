//! Project manifest (`tsconfig.json`) reading and file-set resolution.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use glob::{MatchOptions, Pattern, glob_with};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::core::parsers::source::normalize_path;
use crate::error::{ExtractError, Result};

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    root_dir: Option<String>,
}

/// Include/exclude patterns of a project, relative to `root_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub root_dir: PathBuf,
}

impl ProjectManifest {
    /// Read a manifest. `files` entries come before `include` patterns.
    ///
    /// The root directory is the manifest's directory joined with its `rootDir`.
    /// Comments and trailing commas are accepted, as in any `tsconfig.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ExtractError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let raw: RawManifest = json5::from_str(&content).map_err(|e| ExtractError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let manifest_dir = std::path::absolute(path)
            .map_err(|e| ExtractError::Manifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let root_dir = normalize_path(&manifest_dir.join(raw.root_dir.as_deref().unwrap_or(".")));

        let mut include = raw.files;
        include.extend(raw.include);

        Ok(Self {
            include,
            exclude: raw.exclude,
            root_dir,
        })
    }

    /// Concrete, sorted, absolute file set.
    ///
    /// Glob includes are expanded with `glob`; a literal include naming a directory is
    /// walked for TypeScript sources. Declaration files (`.d.ts`) are skipped.
    pub fn resolve_files(&self) -> Vec<PathBuf> {
        let excludes = ExcludeSet::new(&self.root_dir, &self.exclude);
        let mut files = BTreeSet::new();

        for include in &self.include {
            let full = self.root_dir.join(include);
            if is_glob_pattern(include) {
                let options = MatchOptions {
                    require_literal_leading_dot: true,
                    ..Default::default()
                };
                match glob_with(&full.to_string_lossy(), options) {
                    Ok(entries) => {
                        for entry in entries.flatten() {
                            if entry.is_file() {
                                files.insert(normalize_path(&entry));
                            }
                        }
                    }
                    Err(e) => tracing::warn!("Invalid include pattern '{}': {}", include, e),
                }
            } else if full.is_dir() {
                for entry in WalkDir::new(&full).into_iter().flatten() {
                    if entry.file_type().is_file() {
                        files.insert(normalize_path(entry.path()));
                    }
                }
            } else if full.is_file() {
                files.insert(normalize_path(&full));
            } else {
                tracing::debug!("Include path does not exist: {}", full.display());
            }
        }

        files
            .into_iter()
            .filter(|f| is_source_file(f) && !excludes.matches(f))
            .collect()
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

fn is_source_file(path: &Path) -> bool {
    let name = path.to_string_lossy();
    !name.ends_with(".d.ts")
        && path
            .extension()
            .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|e| ext == *e))
}

struct ExcludeSet {
    literal: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    fn new(root_dir: &Path, excludes: &[String]) -> Self {
        let mut literal = Vec::new();
        let mut patterns = Vec::new();
        for exclude in excludes {
            let full = root_dir.join(exclude);
            if is_glob_pattern(exclude) {
                match Pattern::new(&full.to_string_lossy()) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(e) => tracing::warn!("Invalid exclude pattern '{}': {}", exclude, e),
                }
            } else {
                literal.push(normalize_path(&full));
            }
        }
        Self { literal, patterns }
    }

    fn matches(&self, path: &Path) -> bool {
        self.literal.iter().any(|l| path.starts_with(l))
            || self.patterns.iter().any(|p| p.matches_path(path))
    }
}
