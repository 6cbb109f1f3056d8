//! Consolidation of the parser aggregate into the two metadata documents.
//!
//! ## Module Structure
//!
//! - `library`: pre-extracted metadata shipped by allow-listed libraries
//! - `filter`: CMS compatibility filter
//! - `dedupe`: content-hash deduplication and the `(library, name)` uniqueness check
//!
//! ## Configurations document
//!
//! 1. application configurations, keyed by declaring file
//! 2. configurations of the components, keyed by declaring file (a configuration
//!    shared by two components appears once)
//! 3. every nested configuration, as `NESTED_ELEMENT`
//! 4. library configurations, verbatim
//!
//! then the compatibility filter and content-hash deduplication.
//!
//! ## Components document
//!
//! Every extracted component whose configuration resolves (or that has none), then
//! library components verbatim.

pub mod dedupe;
pub mod filter;
pub mod library;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::core::{
    data::{
        ComponentClassOutput, ComponentConfigOutput, ComponentInfo, ComponentOutput,
        ConfigurationInformation, MetadataCategory, PlaceholdersMetadata, TypeReference,
    },
    diagnostics::Diagnostics,
    parser::ParserOutput,
    parsers::{
        json::read_json_file,
        source::{normalize_path, to_slash_string},
    },
};
use crate::error::Result;

pub use dedupe::{check_uniqueness, content_hash, dedupe};
pub use filter::filter_incompatible;
pub use library::{LibraryArtifacts, LibraryLocator, LibraryMetadata, PackageJsonLocator};

/// Settings of one consolidation.
#[derive(Debug, Clone, Default)]
pub struct ConsolidatorOptions {
    /// Library tagging every record of the current project.
    pub library: String,
    /// Output paths are relative to this directory.
    pub workspace_root: PathBuf,
    pub libraries: Vec<String>,
    pub exposed_component_support: bool,
    pub placeholders_file: Option<PathBuf>,
}

/// Where a component's configuration comes from.
enum ConfigSource<'a> {
    /// Declared in the project, in the file keyed by the string.
    Local(&'a str),
    /// Shipped by an allow-listed library.
    Library,
    /// The component is not configurable.
    None,
    /// Neither local nor library-provided.
    Unresolved,
}

pub struct Consolidator<'a> {
    options: ConsolidatorOptions,
    locator: &'a dyn LibraryLocator,
}

impl<'a> Consolidator<'a> {
    pub fn new(options: ConsolidatorOptions, locator: &'a dyn LibraryLocator) -> Self {
        Self { options, locator }
    }

    /// Build both documents.
    ///
    /// # Errors
    ///
    /// A library artifact or the placeholders file cannot be read, or strict mode
    /// recorded an unsupported construct while filtering.
    pub fn consolidate(
        &self,
        parsed: &ParserOutput,
        diags: &mut Diagnostics,
    ) -> Result<ComponentOutput> {
        let artifacts = LibraryArtifacts::load(self.locator, &self.options.libraries)?;

        let mut configurations = self.consolidate_configurations(parsed, &artifacts, diags);
        configurations.extend(artifacts.configurations.iter().flatten().cloned());
        let mut filter_diags = diags.fork();
        let configurations = filter_incompatible(
            configurations,
            self.options.exposed_component_support,
            &mut filter_diags,
        );
        filter_diags.check("configuration metadata")?;
        diags.extend(filter_diags);
        let configurations = dedupe(configurations);

        let placeholders: Vec<PlaceholdersMetadata> = match &self.options.placeholders_file {
            Some(path) => read_json_file(path)?,
            None => Vec::new(),
        };
        let mut components = self.consolidate_components(parsed, &artifacts, &placeholders);
        components.extend(artifacts.components.iter().flatten().cloned());

        tracing::info!(
            "Consolidated {} configurations and {} components",
            configurations.len(),
            components.len()
        );
        Ok(ComponentOutput {
            configurations,
            components,
        })
    }

    fn consolidate_configurations(
        &self,
        parsed: &ParserOutput,
        artifacts: &LibraryArtifacts,
        diags: &mut Diagnostics,
    ) -> Vec<ComponentConfigOutput> {
        let mut by_path: Vec<ComponentConfigOutput> = Vec::new();
        let mut nested: Vec<ComponentConfigOutput> = Vec::new();

        for (file, wrapper) in &parsed.configurations {
            if let Some(information) = &wrapper.configuration_information
                && information.is_application_config
            {
                tracing::info!("Processing standalone APPLICATION config: {}.", information.name);
                insert_by_path(
                    &mut by_path,
                    self.config_output(information, file, MetadataCategory::Application),
                );
            }
            nested.extend(
                wrapper
                    .nested_configuration
                    .iter()
                    .map(|n| self.config_output(n, file, MetadataCategory::NestedElement)),
            );
        }

        for (file, component) in &parsed.components {
            let source = config_source(file, component, parsed, artifacts);
            let key = match source {
                ConfigSource::Local(key) => key,
                ConfigSource::Library => {
                    tracing::info!(
                        "{} is referencing a configuration in {}",
                        component.name,
                        component.config_path.as_deref().unwrap_or_default()
                    );
                    continue;
                }
                ConfigSource::None => continue,
                ConfigSource::Unresolved => {
                    diags.warn(format!(
                        "No Configuration for {}, the component will be skipped",
                        component.name
                    ));
                    continue;
                }
            };
            let Some(information) = parsed
                .configurations
                .get(key)
                .and_then(|w| w.configuration_information.as_ref())
            else {
                continue;
            };
            insert_by_path(
                &mut by_path,
                self.config_output(information, key, component.category.into()),
            );
        }

        by_path.extend(nested);
        by_path
    }

    fn consolidate_components(
        &self,
        parsed: &ParserOutput,
        artifacts: &LibraryArtifacts,
        placeholders: &[PlaceholdersMetadata],
    ) -> Vec<ComponentClassOutput> {
        let library = &self.options.library;

        let mut modules: HashMap<&str, (&str, &str)> = HashMap::new();
        for (file, module) in &parsed.modules {
            for item in &module.exported_items {
                modules.insert(item.as_str(), (module.name.as_str(), file.as_str()));
            }
        }

        parsed
            .components
            .iter()
            .filter_map(|(file, component)| {
                let config = match config_source(file, component, parsed, artifacts) {
                    ConfigSource::Unresolved => return None,
                    ConfigSource::None => None,
                    ConfigSource::Local(_) => component
                        .config_name
                        .as_ref()
                        .map(|name| TypeReference::new(library, name)),
                    ConfigSource::Library => component
                        .config_name
                        .as_ref()
                        .zip(component.config_path.as_ref())
                        .map(|(name, path)| TypeReference::new(path, name)),
                };
                let module = modules.get(component.name.as_str());

                let mut output = ComponentClassOutput {
                    library: library.clone(),
                    name: component.name.clone(),
                    path: self.relative(file),
                    template_path: component
                        .template_url
                        .as_deref()
                        .and_then(|url| {
                            let dir = Path::new(file).parent()?;
                            Some(self.relative(&to_slash_string(&normalize_path(&dir.join(url)))))
                        })
                        .unwrap_or_default(),
                    module_name: module.map(|(name, _)| name.to_string()).unwrap_or_default(),
                    module_path: module.map(|(_, path)| self.relative(path)).unwrap_or_default(),
                    selector: component.selector.clone().unwrap_or_default(),
                    category: component.category.into(),
                    context: component.context_name.as_ref().map(|name| {
                        TypeReference::new(self.reference_library(component.context_path.as_deref()), name)
                    }),
                    config,
                    linkable_to_ruleset: component.linkable_to_ruleset,
                    localization_keys: (!component.localization_keys.is_empty())
                        .then(|| component.localization_keys.clone()),
                    placeholders: None,
                };
                if let Some(entry) = placeholders
                    .iter()
                    .find(|p| p.name == output.name && p.library == output.library)
                {
                    output.placeholders = Some(entry.placeholders.clone());
                }
                Some(output)
            })
            .collect()
    }

    fn config_output(
        &self,
        information: &ConfigurationInformation,
        file: &str,
        category: MetadataCategory,
    ) -> ComponentConfigOutput {
        ComponentConfigOutput {
            library: self.options.library.clone(),
            name: information.name.clone(),
            title: information.title.clone(),
            description: information.description.clone(),
            path: self.relative(file),
            runtime: information.runtime,
            tags: information.tags.clone(),
            categories: information.categories.clone(),
            category,
            properties: information.properties.clone(),
        }
    }

    /// Library owning a referenced type: the allow-listed package it is imported
    /// from, else the current library.
    fn reference_library<'s>(&'s self, import_path: Option<&'s str>) -> &'s str {
        import_path
            .filter(|path| self.options.libraries.iter().any(|library| library == path))
            .unwrap_or(&self.options.library)
    }

    /// Workspace-relative, `/`-separated form of an absolute path.
    fn relative(&self, file: &str) -> String {
        let path = Path::new(file);
        let relative = path.strip_prefix(&self.options.workspace_root).unwrap_or(path);
        to_slash_string(relative)
    }
}

/// Replace the record with the same path, or append.
fn insert_by_path(configs: &mut Vec<ComponentConfigOutput>, config: ComponentConfigOutput) {
    match configs.iter_mut().find(|c| c.path == config.path) {
        Some(existing) => *existing = config,
        None => configs.push(config),
    }
}

/// Resolve a component's configuration: by its import path, then in the component's
/// own file, then among library configurations.
fn config_source<'p>(
    file: &'p str,
    component: &'p ComponentInfo,
    parsed: &'p ParserOutput,
    artifacts: &LibraryArtifacts,
) -> ConfigSource<'p> {
    let Some(config_name) = component.config_name.as_deref() else {
        return ConfigSource::None;
    };

    if let Some(path) = component.config_path.as_deref()
        && declares_configuration(parsed, path, config_name)
    {
        return ConfigSource::Local(path);
    }
    if component.config_path.is_none() && declares_configuration(parsed, file, config_name) {
        return ConfigSource::Local(file);
    }
    if let Some(path) = component.config_path.as_deref()
        && artifacts.has_configuration(path, config_name)
    {
        return ConfigSource::Library;
    }
    ConfigSource::Unresolved
}

fn declares_configuration(parsed: &ParserOutput, file: &str, name: &str) -> bool {
    parsed
        .configurations
        .get(file)
        .and_then(|w| w.configuration_information.as_ref())
        .is_some_and(|information| information.name == name)
}
