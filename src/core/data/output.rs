//! Records of the two metadata documents.
//!
//! Both record shapes are also read back from dependency libraries' pre-extracted
//! artifacts, so deserialization is lenient about optional fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CategoryDescription, ComponentCategory, ConfigProperty, TypeReference};

/// Category tag of a record in the metadata documents.
///
/// Library artifacts may carry categories this tool does not know about; those are
/// kept verbatim in `Other` so the compatibility filter can report them by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetadataCategory {
    Page,
    Block,
    Component,
    ExposedComponent,
    Application,
    NestedElement,
    Other(String),
}

impl MetadataCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "PAGE",
            Self::Block => "BLOCK",
            Self::Component => "COMPONENT",
            Self::ExposedComponent => "EXPOSED_COMPONENT",
            Self::Application => "APPLICATION",
            Self::NestedElement => "NESTED_ELEMENT",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for MetadataCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PAGE" => Self::Page,
            "BLOCK" => Self::Block,
            "COMPONENT" => Self::Component,
            "EXPOSED_COMPONENT" => Self::ExposedComponent,
            "APPLICATION" => Self::Application,
            "NESTED_ELEMENT" => Self::NestedElement,
            _ => Self::Other(value),
        }
    }
}

impl From<MetadataCategory> for String {
    fn from(value: MetadataCategory) -> Self {
        value.as_str().to_string()
    }
}

impl From<ComponentCategory> for MetadataCategory {
    fn from(value: ComponentCategory) -> Self {
        match value {
            ComponentCategory::Page => Self::Page,
            ComponentCategory::Block => Self::Block,
            ComponentCategory::Component => Self::Component,
            ComponentCategory::ExposedComponent => Self::ExposedComponent,
        }
    }
}

impl fmt::Display for MetadataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record of the configurations document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfigOutput {
    pub library: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Workspace-relative path of the declaring file. Excluded from the content hash.
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryDescription>>,
    #[serde(rename = "type")]
    pub category: MetadataCategory,
    #[serde(default)]
    pub properties: Vec<ConfigProperty>,
}

impl ComponentConfigOutput {
    /// `library#name`, the qualified name used in messages.
    pub fn qualified_name(&self) -> String {
        format!("{}#{}", self.library, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderInfo {
    pub id: String,
    #[serde(default)]
    pub description: String,
}

/// One entry of the placeholders metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholdersMetadata {
    pub library: String,
    pub name: String,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderInfo>,
}

/// A record of the components document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentClassOutput {
    pub library: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub template_path: String,
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub module_path: String,
    #[serde(default)]
    pub selector: String,
    #[serde(rename = "type")]
    pub category: MetadataCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TypeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TypeReference>,
    #[serde(default)]
    pub linkable_to_ruleset: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localization_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholders: Option<Vec<PlaceholderInfo>>,
}

/// The two in-memory metadata documents produced by the consolidator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentOutput {
    pub configurations: Vec<ComponentConfigOutput>,
    pub components: Vec<ComponentClassOutput>,
}
