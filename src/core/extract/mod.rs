//! Per-file extraction.
//!
//! Each extractor takes one parsed [`SourceUnit`](crate::core::parsers::source::SourceUnit)
//! and returns what the file declares:
//!
//! - `class_extractor`: the component class, if any
//! - `config_extractor`: the configuration interfaces and their default values
//! - `module_extractor`: legacy module exports
//!
//! `type_resolver` maps declared property types onto the metadata vocabulary and is
//! shared by the configuration extractor and the cross-file nested expansion.

pub mod class_extractor;
pub mod config_extractor;
pub mod helpers;
pub mod heritage;
pub mod module_extractor;
pub mod type_resolver;

pub use class_extractor::extract_component;
pub use config_extractor::{extract_configuration, reconcile_categories};
pub use heritage::ConfigurationKind;
pub use module_extractor::extract_module;
