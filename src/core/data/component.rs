use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural category of a component.
///
/// Produced by a pure classification over either the `componentType` argument of
/// the component annotation or, on the legacy path, the marker interfaces a class
/// implements (`Block`, `Page`, `ExposedComponent`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    Page,
    Block,
    #[default]
    Component,
    ExposedComponent,
}

impl ComponentCategory {
    /// Classify a legacy marker interface name.
    ///
    /// Returns `None` for anything that is not one of the category markers.
    pub fn from_marker(name: &str) -> Option<Self> {
        match name {
            "Block" => Some(Self::Block),
            "Page" => Some(Self::Page),
            "ExposedComponent" => Some(Self::ExposedComponent),
            _ => None,
        }
    }

    /// Classify the raw text of an annotation's `componentType` value.
    ///
    /// Quotes are stripped, so `'Page'` and `"Page"` are both a page. Anything
    /// unrecognised is a plain component.
    pub fn from_annotation(raw: &str) -> Self {
        let sanitized: String = raw.chars().filter(|c| *c != '\'' && *c != '"').collect();
        Self::from_marker(sanitized.trim()).unwrap_or(Self::Component)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "PAGE",
            Self::Block => "BLOCK",
            Self::Component => "COMPONENT",
            Self::ExposedComponent => "EXPOSED_COMPONENT",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts extracted from the (at most one) component class of a file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentInfo {
    /// Class name. Never empty.
    pub name: String,
    /// Payload type of the `Configurable<..>` / `DynamicConfigurable<..>` marker.
    pub config_name: Option<String>,
    /// Module specifier the configuration is imported from, absolute when it was relative.
    pub config_path: Option<String>,
    /// True when the configurable marker is the `Dynamic` variant.
    pub is_dynamic_config: bool,
    /// First implemented interface ending in `Context`.
    pub context_name: Option<String>,
    pub context_path: Option<String>,
    pub category: ComponentCategory,
    pub selector: Option<String>,
    /// Deprecated, kept for the `templatePath` output field.
    pub template_url: Option<String>,
    pub linkable_to_ruleset: bool,
    /// Union of the keys of every localization bundle declared on the class.
    pub localization_keys: Vec<String>,
}

/// Legacy module declaration: a class annotated as a module with an `exports` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub exported_items: Vec<String>,
}
