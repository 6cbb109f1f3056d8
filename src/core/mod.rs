//! Core extraction pipeline.
//!
//! ## Module Structure
//!
//! - `parsers`: project manifest, TypeScript sources and JSON inputs
//! - `session`: the shared, read-only parse session of a run
//! - `doc`: documentation comment annotations
//! - `extract`: per-file component, configuration and module extraction
//! - `parser`: the orchestrator building the per-file aggregate
//! - `consolidate`: merge with library metadata, filtering and deduplication
//! - `diagnostics`: the warning/error collector threaded through every stage

pub mod consolidate;
pub mod data;
pub mod diagnostics;
pub mod doc;
pub mod extract;
pub mod parser;
pub mod parsers;
pub mod session;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use parser::{ComponentParser, ParserOptions, ParserOutput};
