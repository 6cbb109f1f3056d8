use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// The fixed vocabulary a configuration property type is mapped onto.
///
/// `Element` / `ElementArray` are structural references to another (nested)
/// configuration and always travel with a [`TypeReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "element")]
    Element,
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "string[]")]
    StringArray,
    #[serde(rename = "number[]")]
    NumberArray,
    #[serde(rename = "boolean[]")]
    BooleanArray,
    #[serde(rename = "enum[]")]
    EnumArray,
    #[serde(rename = "element[]")]
    ElementArray,
    #[serde(rename = "unknown[]")]
    UnknownArray,
}

impl PropertyType {
    /// Array counterpart of a scalar type; `None` for types that are already arrays.
    pub fn array_of(self) -> Option<Self> {
        match self {
            Self::String => Some(Self::StringArray),
            Self::Number => Some(Self::NumberArray),
            Self::Boolean => Some(Self::BooleanArray),
            Self::Enum => Some(Self::EnumArray),
            Self::Element => Some(Self::ElementArray),
            Self::Unknown => Some(Self::UnknownArray),
            _ => None,
        }
    }

    /// Primitive scalars keep their name with a `[]` suffix when used as array elements.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::Boolean | Self::Enum | Self::Unknown
        )
    }

    pub fn is_enum(self) -> bool {
        matches!(self, Self::Enum | Self::EnumArray)
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown | Self::UnknownArray)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Element => "element",
            Self::Unknown => "unknown",
            Self::StringArray => "string[]",
            Self::NumberArray => "number[]",
            Self::BooleanArray => "boolean[]",
            Self::EnumArray => "enum[]",
            Self::ElementArray => "element[]",
            Self::UnknownArray => "unknown[]",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from an `element`/`element[]` property to the configuration describing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    pub library: String,
    pub name: String,
}

impl TypeReference {
    pub fn new(library: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescription {
    pub name: String,
    pub label: String,
}

/// Editor widget hint declared with `@o3rWidget` / `@o3rWidgetParam`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWidget {
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

/// One default value of an array property.
///
/// Plain strings come from string literal elements, records from object literal
/// elements of a nested configuration array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Text(String),
    Record(BTreeMap<String, String>),
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A configurable property as exposed to the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProperty {
    pub name: String,
    pub label: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<TypeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<DefaultValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<PropertyWidget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl ConfigProperty {
    pub fn has_default(&self) -> bool {
        self.value.is_some() || self.values.is_some()
    }
}

/// A configuration interface after structural extraction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigurationInformation {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<CategoryDescription>>,
    /// `Some(false)` for a build-time marker, `Some(true)` for a runtime marker.
    pub runtime: Option<bool>,
    /// True iff `runtime` was determined, whatever its value.
    pub is_application_config: bool,
    pub properties: Vec<ConfigProperty>,
}

impl ConfigurationInformation {
    pub fn property_mut(&mut self, name: &str) -> Option<&mut ConfigProperty> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}

/// A string-literal union alias (`type Size = 'S' | 'M' | 'L'`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionTypeStringLiteral {
    pub name: String,
    pub choices: Vec<String>,
}

/// Per-file working state of the configuration extractor.
///
/// Threads the nested configurations and enum aliases collected so far into the
/// type resolver, and finally carries the file's configuration result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigurationWrapper {
    pub configuration_information: Option<ConfigurationInformation>,
    pub nested_configuration: Vec<ConfigurationInformation>,
    pub union_type_string_literal: Vec<UnionTypeStringLiteral>,
}

impl ConfigurationWrapper {
    pub fn has_nested(&self, name: &str) -> bool {
        self.nested_configuration.iter().any(|n| n.name == name)
    }

    pub fn enum_alias(&self, name: &str) -> Option<&UnionTypeStringLiteral> {
        self.union_type_string_literal.iter().find(|u| u.name == name)
    }

    /// Append nested configurations whose name is not known yet.
    pub fn merge_nested(&mut self, nested: impl IntoIterator<Item = ConfigurationInformation>) {
        for configuration in nested {
            if !self.has_nested(&configuration.name) {
                self.nested_configuration.push(configuration);
            }
        }
    }

    /// Whether the file contributes anything to the aggregate.
    pub fn is_empty(&self) -> bool {
        self.configuration_information.is_none() && self.nested_configuration.is_empty()
    }
}
