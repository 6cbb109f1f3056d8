//! File parsers for the pipeline inputs.
//!
//! - `source`: TypeScript source parser (uses swc for AST generation)
//! - `manifest`: project manifest (`tsconfig.json`) and file-set resolution
//! - `json`: localization bundles and pre-extracted JSON artifacts

pub mod json;
pub mod manifest;
pub mod source;
