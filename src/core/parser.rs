//! Parser orchestrator.
//!
//! Runs the extraction pipeline over every file of a project manifest:
//!
//! 1. **Manifest**: resolve the file set from the project's tsconfig (fatal on error)
//! 2. **Session**: parse every file once, in parallel
//! 3. **Extraction**: per file, configuration extraction and its post-processing, then
//!    component extraction, then legacy module extraction
//! 4. **Aggregation**: non-empty results are keyed by file path
//!
//! Files are extracted in parallel; each one gets its own [`Diagnostics`] which are
//! merged back in path order, so the output does not depend on scheduling.

use std::{collections::BTreeMap, path::PathBuf};

use rayon::prelude::*;

use crate::core::{
    data::{
        CategoryDescription, ComponentInfo, ConfigurationInformation, ConfigurationWrapper,
        ModuleInfo,
    },
    diagnostics::Diagnostics,
    extract::{extract_component, extract_configuration, extract_module, reconcile_categories},
    parsers::{
        manifest::ProjectManifest,
        source::{SourceUnit, to_slash_string},
    },
    session::Session,
};
use crate::error::{ExtractError, Result};

/// Settings of one parser run.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Library tagging every record of the current project.
    pub library: String,
    /// Project manifest (a tsconfig file).
    pub tsconfig: PathBuf,
    pub strict: bool,
    /// Allow-listed dependency libraries.
    pub libraries: Vec<String>,
    /// Categories available to every configuration.
    pub global_categories: Vec<CategoryDescription>,
}

/// Aggregate of a parser run, keyed by absolute `/`-separated file path.
#[derive(Debug, Default)]
pub struct ParserOutput {
    pub components: BTreeMap<String, ComponentInfo>,
    pub configurations: BTreeMap<String, ConfigurationWrapper>,
    /// Deprecated.
    pub modules: BTreeMap<String, ModuleInfo>,
    pub diagnostics: Diagnostics,
}

/// What one file contributed.
struct FileOutput {
    key: String,
    component: Option<ComponentInfo>,
    configuration: Option<ConfigurationWrapper>,
    module: Option<ModuleInfo>,
    diagnostics: Diagnostics,
}

pub struct ComponentParser {
    options: ParserOptions,
}

impl ComponentParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Extract the components and configurations of every manifest file.
    ///
    /// # Errors
    ///
    /// - the manifest cannot be read or is malformed
    /// - a localization bundle cannot be read
    /// - strict mode only: a file fails to parse or declares an unsupported construct
    pub fn parse(&self) -> Result<ParserOutput> {
        let manifest = ProjectManifest::load(&self.options.tsconfig)?;
        let files = manifest.resolve_files();
        tracing::debug!(
            "{} files to parse from {}",
            files.len(),
            self.options.tsconfig.display()
        );

        let session = Session::parse(&files);
        self.parse_session(&session)
    }

    /// Extraction over an already built session.
    pub fn parse_session(&self, session: &Session) -> Result<ParserOutput> {
        let mut output = ParserOutput {
            diagnostics: Diagnostics::new(self.options.strict),
            ..Default::default()
        };

        for failure in session.failures() {
            if self.options.strict {
                return Err(ExtractError::Parse {
                    path: failure.path.clone(),
                    reason: failure.reason.clone(),
                });
            }
            output.diagnostics.warn(format!(
                "{} could not be parsed and will be skipped: {}",
                failure.path.display(),
                failure.reason
            ));
        }

        let units: Vec<&SourceUnit> = session.units().collect();
        let results: Vec<Result<FileOutput>> = units
            .par_iter()
            .map(|unit| self.parse_unit(unit, session))
            .collect();

        for result in results {
            let file = result?;
            if let Some(component) = file.component {
                output.components.insert(file.key.clone(), component);
            }
            if let Some(configuration) = file.configuration {
                output.configurations.insert(file.key.clone(), configuration);
            }
            if let Some(module) = file.module {
                output.modules.insert(file.key.clone(), module);
            }
            output.diagnostics.extend(file.diagnostics);
        }

        tracing::debug!(
            "Parsed {} components and {} configuration files",
            output.components.len(),
            output.configurations.len()
        );
        Ok(output)
    }

    fn parse_unit(&self, unit: &SourceUnit, session: &Session) -> Result<FileOutput> {
        tracing::debug!("Parsing {}", unit.path.display());
        let key = to_slash_string(&unit.path);
        let mut diagnostics = Diagnostics::new(self.options.strict);

        let mut wrapper = extract_configuration(
            unit,
            session,
            &self.options.library,
            &self.options.libraries,
            &mut diagnostics,
        );
        if let Some(information) = wrapper.configuration_information.as_mut() {
            self.post_process(information, &mut diagnostics);
        }

        let component = extract_component(unit, &mut diagnostics)?;
        let module = extract_module(unit);

        diagnostics.check(&key)?;

        Ok(FileOutput {
            key,
            component,
            configuration: (!wrapper.is_empty()).then_some(wrapper),
            module,
            diagnostics,
        })
    }

    /// Category reconciliation, then in strict mode removal of `unknown` properties.
    fn post_process(&self, information: &mut ConfigurationInformation, diags: &mut Diagnostics) {
        reconcile_categories(information, &self.options.global_categories, diags);

        if self.options.strict {
            let name = information.name.clone();
            information.properties.retain(|property| {
                let known = !property.property_type.is_unknown();
                if !known {
                    diags.warn(format!(
                        "The property {} from {} has unknown type, it will be filtered from metadata.",
                        property.name, name
                    ));
                }
                known
            });
        }
    }
}
