//! Pre-extracted metadata of allow-listed dependency libraries.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;

use crate::core::{
    data::{ComponentClassOutput, ComponentConfigOutput},
    parsers::json::read_json_file,
};
use crate::error::Result;

/// Where a library ships its metadata documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryMetadata {
    pub configuration_file_path: Option<PathBuf>,
    pub component_file_path: Option<PathBuf>,
}

/// Finds the metadata documents of a library.
pub trait LibraryLocator: Sync {
    /// `None` when the library ships no metadata.
    fn locate(&self, library: &str) -> Option<LibraryMetadata>;
}

/// Reads the `cmsMetadata` block of `node_modules/<library>/package.json`.
///
/// ```json
/// {
///   "name": "@lib/design",
///   "cmsMetadata": {
///     "configurationFilePath": "./component.config.metadata.json",
///     "componentFilePath": "./component.class.metadata.json"
///   }
/// }
/// ```
pub struct PackageJsonLocator {
    root: PathBuf,
}

impl PackageJsonLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    cms_metadata: Option<CmsMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CmsMetadata {
    configuration_file_path: Option<String>,
    component_file_path: Option<String>,
}

impl LibraryLocator for PackageJsonLocator {
    fn locate(&self, library: &str) -> Option<LibraryMetadata> {
        let package_dir = self.root.join("node_modules").join(library);
        let package_json = package_dir.join("package.json");
        let package: PackageJson = match read_json_file(&package_json) {
            Ok(package) => package,
            Err(e) => {
                tracing::debug!("No package metadata for {}: {}", library, e);
                return None;
            }
        };
        let Some(metadata) = package.cms_metadata else {
            tracing::debug!("{} does not declare cmsMetadata", library);
            return None;
        };

        let resolve = |file: Option<String>| file.map(|f| package_dir.join(f));
        Some(LibraryMetadata {
            configuration_file_path: resolve(metadata.configuration_file_path),
            component_file_path: resolve(metadata.component_file_path),
        })
    }
}

/// Metadata documents of every allow-listed library, one list per library.
#[derive(Debug, Default)]
pub struct LibraryArtifacts {
    pub configurations: Vec<Vec<ComponentConfigOutput>>,
    pub components: Vec<Vec<ComponentClassOutput>>,
}

impl LibraryArtifacts {
    /// Read the documents of `libraries`, in parallel.
    ///
    /// A library without metadata contributes nothing; a declared document that
    /// cannot be read or parsed is an error.
    pub fn load(locator: &dyn LibraryLocator, libraries: &[String]) -> Result<Self> {
        let located: Vec<LibraryMetadata> = libraries
            .iter()
            .filter_map(|library| locator.locate(library))
            .collect();

        let configurations = read_all(
            located
                .iter()
                .filter_map(|m| m.configuration_file_path.as_deref()),
        )?;
        let components = read_all(located.iter().filter_map(|m| m.component_file_path.as_deref()))?;

        Ok(Self {
            configurations,
            components,
        })
    }

    /// Whether a library ships a configuration named `name` under the library name `library`.
    pub fn has_configuration(&self, library: &str, name: &str) -> bool {
        self.configurations
            .iter()
            .flatten()
            .any(|c| c.library == library && c.name == name)
    }
}

fn read_all<'a, T>(paths: impl Iterator<Item = &'a Path>) -> Result<Vec<Vec<T>>>
where
    T: serde::de::DeserializeOwned + Send,
{
    let paths: Vec<&Path> = paths.collect();
    paths
        .par_iter()
        .map(|path| {
            tracing::debug!("Loading library metadata {}", path.display());
            read_json_file(path)
        })
        .collect()
}
