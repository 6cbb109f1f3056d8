use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::data::CategoryDescription;

pub const CONFIG_FILE_NAME: &str = ".compmetarc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Library name tagging every record. Defaults to the `name` of `package.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_ts_config")]
    pub ts_config: String,
    #[serde(default)]
    pub libraries: Vec<String>,
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default)]
    pub exposed_component_support: bool,
    #[serde(default)]
    pub global_config_categories: Vec<CategoryDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholders_metadata_file: Option<String>,
    #[serde(default = "default_component_output_file")]
    pub component_output_file: String,
    #[serde(default = "default_config_output_file")]
    pub config_output_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<String>,
    #[serde(default)]
    pub inline: bool,
}

fn default_ts_config() -> String {
    "tsconfig.json".to_string()
}

fn default_component_output_file() -> String {
    "component.class.metadata.json".to_string()
}

fn default_config_output_file() -> String {
    "component.config.metadata.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: None,
            ts_config: default_ts_config(),
            libraries: Vec::new(),
            strict_mode: false,
            exposed_component_support: false,
            global_config_categories: Vec::new(),
            placeholders_metadata_file: None,
            component_output_file: default_component_output_file(),
            config_output_file: default_config_output_file(),
            component_schema: None,
            config_schema: None,
            inline: false,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if `tsConfig` is empty or a library is listed twice.
    pub fn validate(&self) -> Result<()> {
        if self.ts_config.trim().is_empty() {
            bail!("'tsConfig' must not be empty");
        }

        let mut seen = HashSet::new();
        for library in &self.libraries {
            if !seen.insert(library) {
                bail!("Library \"{}\" is listed twice in 'libraries'", library);
            }
        }

        Ok(())
    }

    /// Library name from the config, else from `<root>/package.json`.
    pub fn library_name(&self, root: &Path) -> Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }

        #[derive(Deserialize)]
        struct PackageJson {
            name: Option<String>,
        }

        let path = root.join("package.json");
        let content = fs::read_to_string(&path).with_context(|| {
            format!(
                "No 'name' in {} and {} cannot be read",
                CONFIG_FILE_NAME,
                path.display()
            )
        })?;
        let package: PackageJson = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        package
            .name
            .with_context(|| format!("{} has no 'name' field", path.display()))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config was loaded from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
