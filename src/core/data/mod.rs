//! Core data types shared by the extractors, the orchestrator and the consolidator.
//!
//! ## Module Structure
//!
//! - `component`: Component classification and per-file component facts
//! - `configuration`: Configuration interfaces, properties and the per-file wrapper
//! - `output`: The flattened records written to the two metadata documents

pub mod component;
pub mod configuration;
pub mod output;

pub use component::{ComponentCategory, ComponentInfo, ModuleInfo};
pub use configuration::{
    CategoryDescription, ConfigProperty, ConfigurationInformation, ConfigurationWrapper,
    DefaultValue, PropertyType, PropertyWidget, TypeReference, UnionTypeStringLiteral,
};
pub use output::{
    ComponentClassOutput, ComponentConfigOutput, ComponentOutput, MetadataCategory,
    PlaceholderInfo, PlaceholdersMetadata,
};
