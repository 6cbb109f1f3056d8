//! JSON-schema validation of the output documents.

use std::path::Path;

use serde_json::Value;

use crate::core::{diagnostics::Diagnostics, parsers::json::read_json_file};
use crate::error::{ExtractError, Result};

/// Checks a document against a schema, returning every violation.
pub trait SchemaValidator {
    fn errors(&self, document: &Value) -> Vec<String>;
}

pub struct JsonSchemaValidator {
    validator: jsonschema::Validator,
}

impl JsonSchemaValidator {
    pub fn new(schema: &Value) -> Result<Self, String> {
        jsonschema::validator_for(schema)
            .map(|validator| Self { validator })
            .map_err(|e| e.to_string())
    }

    /// Compile the schema stored at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let schema: Value = read_json_file(path)?;
        Self::new(&schema).map_err(|reason| ExtractError::Schema {
            document: path.display().to_string(),
            errors: vec![reason],
        })
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn errors(&self, document: &Value) -> Vec<String> {
        self.validator
            .iter_errors(document)
            .map(|error| error.to_string())
            .collect()
    }
}

/// Validate `document` and apply the strict/lenient policy to the violations.
///
/// # Errors
///
/// [`ExtractError::Schema`] in strict mode when the document is invalid.
pub fn validate_document(
    name: &str,
    document: &Value,
    validator: &dyn SchemaValidator,
    diags: &mut Diagnostics,
) -> Result<()> {
    let errors = validator.errors(document);
    if errors.is_empty() {
        tracing::debug!("{} metadata is valid", name);
        return Ok(());
    }

    if diags.is_strict() {
        return Err(ExtractError::Schema {
            document: name.to_string(),
            errors,
        });
    }
    for error in errors {
        diags.warn(format!("{} metadata does not match its JSON schema: {}", name, error));
    }
    Ok(())
}
