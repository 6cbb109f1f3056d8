//! compmeta - component and configuration metadata extractor
//!
//! compmeta statically analyzes the TypeScript sources of a project and produces
//! two JSON documents consumed by a CMS: the configurable components and the
//! configuration models driving them. Nothing is executed or type-checked; the
//! analysis works on declarations, decorators and documentation comments.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands, reporting, logging)
//! - `config`: `.compmetarc.json` loading and validation
//! - `core`: Extraction pipeline (parse, extract, consolidate)
//! - `error`: Fatal error conditions
//! - `validate`: JSON-schema validation of the output documents

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod validate;
