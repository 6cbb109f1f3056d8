//! CMS compatibility filter.

use crate::core::{
    data::{ComponentConfigOutput, MetadataCategory},
    diagnostics::Diagnostics,
};

/// Whether the CMS accepts records of this category.
fn is_supported(category: &MetadataCategory, exposed_component_support: bool) -> bool {
    match category {
        MetadataCategory::Page
        | MetadataCategory::Block
        | MetadataCategory::Component
        | MetadataCategory::Application
        | MetadataCategory::NestedElement => true,
        MetadataCategory::ExposedComponent => exposed_component_support,
        MetadataCategory::Other(_) => false,
    }
}

/// Drop the configurations the CMS cannot accept, and the properties without a
/// default value of the configurations it keeps.
///
/// Both conditions are unsupported constructs: recorded as errors in strict mode.
pub fn filter_incompatible(
    configs: Vec<ComponentConfigOutput>,
    exposed_component_support: bool,
    diags: &mut Diagnostics,
) -> Vec<ComponentConfigOutput> {
    configs
        .into_iter()
        .filter_map(|mut config| {
            if !is_supported(&config.category, exposed_component_support) {
                diags.unsupported(format!(
                    "Config type \"{}\" is not supported for {}. Excluding it",
                    config.category,
                    config.qualified_name()
                ));
                return None;
            }

            let (with_default, without_default): (Vec<_>, Vec<_>) =
                std::mem::take(&mut config.properties)
                    .into_iter()
                    .partition(|property| property.has_default());
            if !without_default.is_empty() {
                diags.unsupported(format!(
                    "{} has properties without default value: {}. They will be excluded",
                    config.qualified_name(),
                    without_default
                        .iter()
                        .map(|p| p.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            config.properties = with_default;
            Some(config)
        })
        .collect()
}
