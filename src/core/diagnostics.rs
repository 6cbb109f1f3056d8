//! Append-only diagnostics collector passed through every extraction call.
//!
//! Extractors never decide on their own whether an unsupported construct is fatal.
//! They report it through [`Diagnostics::unsupported`], which records it as a
//! warning in lenient mode and as an error in strict mode; the caller inspects
//! [`Diagnostics::has_errors`] once the unit is complete.

use std::fmt;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    strict: bool,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            entries: Vec::new(),
        }
    }

    /// Empty collector sharing this one's strictness.
    pub fn fork(&self) -> Self {
        Self::new(self.strict)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Data-quality warning that never becomes fatal.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    /// Unsupported construct: an error in strict mode, a warning otherwise.
    pub fn unsupported(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.strict {
            tracing::error!("{}", message);
            self.entries.push(Diagnostic {
                severity: Severity::Error,
                message,
            });
        } else {
            self.warn(format!(
                "{} Will throw in strict mode.",
                with_final_period(&message)
            ));
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Fail the unit named `unit` when any error was recorded.
    pub fn check(&self, unit: &str) -> Result<(), ExtractError> {
        let messages: Vec<String> = self
            .entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.clone())
            .collect();
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ExtractError::Unsupported {
                unit: unit.to_string(),
                messages,
            })
        }
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

fn with_final_period(message: &str) -> String {
    if message.ends_with('.') {
        message.to_string()
    } else {
        format!("{}.", message)
    }
}
