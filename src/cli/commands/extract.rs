//! `compmeta extract`: parse, consolidate, validate and write both documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;

use super::ExtractSummary;
use super::super::{args::ExtractCommand, exit_status::ExitStatus, report};
use crate::config::{ConfigLoadResult, load_config};
use crate::core::{
    ComponentParser, Diagnostics, ParserOptions,
    consolidate::{Consolidator, ConsolidatorOptions, PackageJsonLocator, check_uniqueness},
    data::CategoryDescription,
};
use crate::error::ExtractError;
use crate::validate::{JsonSchemaValidator, validate_document};

/// `.compmetarc.json` merged with the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSettings {
    pub root: PathBuf,
    pub library: String,
    pub tsconfig: PathBuf,
    pub strict: bool,
    pub libraries: Vec<String>,
    pub exposed_component_support: bool,
    pub global_categories: Vec<CategoryDescription>,
    pub placeholders_file: Option<PathBuf>,
    pub component_output: PathBuf,
    pub config_output: PathBuf,
    pub component_schema: Option<PathBuf>,
    pub config_schema: Option<PathBuf>,
    pub inline: bool,
}

impl ExtractSettings {
    /// Paths from the config file are relative to its directory, paths from the
    /// command line to `cwd`.
    pub fn resolve(cwd: &Path, cmd: ExtractCommand) -> Result<Self> {
        let ConfigLoadResult { config, path } = load_config(cwd)?;
        if let Some(path) = &path {
            tracing::debug!("Using {}", path.display());
        }
        let root = path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);

        let library = match cmd.name {
            Some(name) => name,
            None => config.library_name(&root)?,
        };
        let pick = |cli: Option<PathBuf>, file: &str| match cli {
            Some(path) => cwd.join(path),
            None => root.join(file),
        };
        let tsconfig = pick(cmd.tsconfig, &config.ts_config);
        let component_output = pick(cmd.component_output, &config.component_output_file);
        let config_output = pick(cmd.config_output, &config.config_output_file);
        let placeholders_file = match cmd.placeholders {
            Some(path) => Some(cwd.join(path)),
            None => config.placeholders_metadata_file.map(|file| root.join(file)),
        };

        Ok(Self {
            library,
            tsconfig,
            strict: cmd.strict || config.strict_mode,
            libraries: if cmd.libraries.is_empty() {
                config.libraries
            } else {
                cmd.libraries
            },
            exposed_component_support: cmd.exposed_component_support
                || config.exposed_component_support,
            global_categories: config.global_config_categories,
            placeholders_file,
            component_output,
            config_output,
            component_schema: config.component_schema.map(|file| root.join(file)),
            config_schema: config.config_schema.map(|file| root.join(file)),
            inline: cmd.inline || config.inline,
            root,
        })
    }
}

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let settings = ExtractSettings::resolve(&cwd, cmd)?;

    let mut diags = Diagnostics::new(settings.strict);
    let result = run(&settings, &mut diags);
    report::print_diagnostics(&diags);

    match result {
        Ok(summary) => {
            report::print_summary(&summary);
            Ok(ExitStatus::Success)
        }
        Err(err) if is_rejection(&err) => {
            report::print_rejection(&err);
            Ok(ExitStatus::Failure)
        }
        Err(err) => Err(err),
    }
}

/// Errors caused by the analyzed code rather than by the environment.
fn is_rejection(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ExtractError>(),
        Some(
            ExtractError::Unsupported { .. }
                | ExtractError::Parse { .. }
                | ExtractError::DuplicateConfiguration { .. }
                | ExtractError::Schema { .. }
        )
    )
}

pub fn run(settings: &ExtractSettings, diags: &mut Diagnostics) -> Result<ExtractSummary> {
    let parser = ComponentParser::new(ParserOptions {
        library: settings.library.clone(),
        tsconfig: settings.tsconfig.clone(),
        strict: settings.strict,
        libraries: settings.libraries.clone(),
        global_categories: settings.global_categories.clone(),
    });
    let mut parsed = parser.parse()?;
    diags.extend(std::mem::take(&mut parsed.diagnostics));

    let locator = PackageJsonLocator::new(&settings.root);
    let consolidator = Consolidator::new(
        ConsolidatorOptions {
            library: settings.library.clone(),
            workspace_root: settings.root.clone(),
            libraries: settings.libraries.clone(),
            exposed_component_support: settings.exposed_component_support,
            placeholders_file: settings.placeholders_file.clone(),
        },
        &locator,
    );
    let output = consolidator.consolidate(&parsed, diags)?;

    let configurations = serde_json::to_value(&output.configurations)?;
    let components = serde_json::to_value(&output.components)?;
    if let Some(schema) = &settings.config_schema {
        let validator = JsonSchemaValidator::from_file(schema)?;
        validate_document("Configuration", &configurations, &validator, diags)?;
    }
    if let Some(schema) = &settings.component_schema {
        let validator = JsonSchemaValidator::from_file(schema)?;
        validate_document("Component", &components, &validator, diags)?;
    }
    check_uniqueness(&output.configurations, diags)?;

    write_document(&settings.config_output, &configurations, settings.inline)?;
    write_document(&settings.component_output, &components, settings.inline)?;

    Ok(ExtractSummary {
        components: output.components.len(),
        configurations: output.configurations.len(),
        warnings: diags.warning_count(),
        component_output: settings.component_output.clone(),
        config_output: settings.config_output.clone(),
    })
}

fn write_document(path: &Path, document: &Value, inline: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let content = if inline {
        serde_json::to_string(document)?
    } else {
        serde_json::to_string_pretty(document)?
    };
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
