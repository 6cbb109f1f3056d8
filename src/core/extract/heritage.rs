//! Classification of interfaces by the configuration markers they extend.

use swc_ecma_ast::TsInterfaceDecl;

use super::helpers::{heritage_name, last_segment};

const CONFIGURATION: &str = "Configuration";
const APP_BUILD_CONFIGURATION: &str = "AppBuildConfiguration";
const APP_RUNTIME_CONFIGURATION: &str = "AppRuntimeConfiguration";
const NESTED_CONFIGURATION: &str = "NestedConfiguration";

/// Kind of configuration an interface declares, decided from its `extends` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationKind {
    /// Extends the generic component configuration marker.
    Component,
    /// Extends the application build-time marker.
    Build,
    /// Extends the application runtime marker.
    Runtime,
    /// Extends only the nested configuration marker.
    Nested,
}

impl ConfigurationKind {
    /// Classify an interface. `None` when it extends no configuration marker.
    ///
    /// Build-time is checked before runtime, and both before the generic marker.
    pub fn of(decl: &TsInterfaceDecl) -> Option<Self> {
        let markers: Vec<String> = decl
            .extends
            .iter()
            .filter_map(heritage_name)
            .map(|name| last_segment(&name).to_string())
            .collect();
        let has = |marker: &str| markers.iter().any(|m| m == marker);

        if has(APP_BUILD_CONFIGURATION) {
            Some(Self::Build)
        } else if has(APP_RUNTIME_CONFIGURATION) {
            Some(Self::Runtime)
        } else if has(CONFIGURATION) {
            Some(Self::Component)
        } else if has(NESTED_CONFIGURATION) {
            Some(Self::Nested)
        } else {
            None
        }
    }

    /// Whether the interface can be the primary configuration of a file.
    pub fn is_primary(self) -> bool {
        !matches!(self, Self::Nested)
    }

    /// `Some(false)` for build-time, `Some(true)` for runtime, `None` otherwise.
    pub fn runtime(self) -> Option<bool> {
        match self {
            Self::Build => Some(false),
            Self::Runtime => Some(true),
            _ => None,
        }
    }
}

/// Whether the interface lists the nested configuration marker among its parents.
pub fn is_nested_configuration(decl: &TsInterfaceDecl) -> bool {
    decl.extends
        .iter()
        .filter_map(heritage_name)
        .any(|name| last_segment(&name) == NESTED_CONFIGURATION)
}
