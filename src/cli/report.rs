//! Report formatting and printing utilities.
//!
//! Diagnostics and summaries are printed cargo-style. Kept apart from the pipeline
//! so compmeta can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::ExtractSummary;
use crate::core::{Diagnostic, Diagnostics, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print every diagnostic to stderr.
pub fn print_diagnostics(diags: &Diagnostics) {
    print_diagnostics_to(diags, &mut io::stderr().lock());
}

pub fn print_diagnostics_to<W: Write>(diags: &Diagnostics, writer: &mut W) {
    for diagnostic in diags.iter() {
        print_diagnostic(diagnostic, writer);
    }
}

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W) {
    let label = match diagnostic.severity {
        Severity::Error => "error:".bold().red(),
        Severity::Warning => "warning:".bold().yellow(),
    };
    let _ = writeln!(writer, "{} {}", label, diagnostic.message);
}

/// Print the error that rejected an extraction to stderr.
pub fn print_rejection(err: &anyhow::Error) {
    print_rejection_to(err, &mut io::stderr().lock());
}

pub fn print_rejection_to<W: Write>(err: &anyhow::Error, writer: &mut W) {
    let _ = writeln!(writer, "{} {:#}", "error:".bold().red(), err);
    let _ = writeln!(
        writer,
        "{} {}",
        FAILURE_MARK.red(),
        "Metadata extraction failed, no document written".red()
    );
}

/// Print the extraction summary to stdout.
pub fn print_summary(summary: &ExtractSummary) {
    print_summary_to(summary, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let mut message = format!(
        "Extracted {} {} and {} {}",
        summary.components,
        if summary.components == 1 { "component" } else { "components" },
        summary.configurations,
        if summary.configurations == 1 {
            "configuration"
        } else {
            "configurations"
        }
    );
    if summary.warnings > 0 {
        message.push_str(&format!(
            " ({} {})",
            summary.warnings,
            if summary.warnings == 1 { "warning" } else { "warnings" }
        ));
    }
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), message.green());

    for path in [&summary.component_output, &summary.config_output] {
        let _ = writeln!(writer, "  {} {}", "Wrote".bold(), path.display());
    }
}
