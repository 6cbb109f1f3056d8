//! Configuration interface extraction.
//!
//! Works in two passes over the top-level declarations of one file:
//!
//! - **Pass A** records string-literal union aliases as enum aliases and extracts
//!   every interface extending the nested configuration marker, with zero defaults.
//! - **Pass B** extracts the first interface extending a primary configuration
//!   marker, then binds default values from the variable statements that follow it
//!   and are typed with that interface.
//!
//! Pass B needs the nested configurations of Pass A to type its properties and to
//! accept object literals as array defaults, so the order matters.

use std::collections::{BTreeMap, HashSet};

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    Decl, Expr, Lit, ObjectLit, Pat, Prop, PropOrSpread, TsEntityName, TsInterfaceDecl,
    TsPropertySignature, TsType, TsUnionOrIntersectionType, VarDecl,
};

use crate::core::{
    data::{
        CategoryDescription, ConfigProperty, ConfigurationInformation, ConfigurationWrapper,
        DefaultValue, PropertyType, UnionTypeStringLiteral,
    },
    diagnostics::Diagnostics,
    doc::DocInfo,
    extract::{
        helpers::{
            extract_key_name, extract_prop_name, label_from_name, literal_text,
            property_signatures, remove_quotation_marks, top_level_decls, unwrap_ts_expr,
        },
        heritage::{ConfigurationKind, is_nested_configuration},
        type_resolver::{ResolutionContext, has_string_elements, resolve_type, union_choices},
    },
    parsers::source::SourceUnit,
    session::Session,
};

/// Extract the configuration wrapper of one file.
pub fn extract_configuration(
    unit: &SourceUnit,
    session: &Session,
    library: &str,
    libraries: &[String],
    diags: &mut Diagnostics,
) -> ConfigurationWrapper {
    tracing::debug!("Parsing configuration from {}", unit.path.display());

    let mut expanded = HashSet::new();
    let mut ctx = ResolutionContext {
        library,
        libraries,
        session,
        unit,
        expanded: &mut expanded,
    };

    let mut wrapper = harvest_nested(&mut ctx, diags);
    extract_primary(&mut wrapper, &mut ctx, diags);
    wrapper
}

/// Pass A: enum aliases and nested configurations of `ctx.unit`.
pub fn harvest_nested(
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) -> ConfigurationWrapper {
    let unit = ctx.unit;
    let mut wrapper = ConfigurationWrapper::default();

    for item in top_level_decls(&unit.module) {
        if let Decl::TsTypeAlias(alias) = item.decl
            && let TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(
                union,
            )) = &*alias.type_ann
            && has_string_elements(union)
        {
            wrapper.union_type_string_literal.push(UnionTypeStringLiteral {
                name: alias.id.sym.to_string(),
                choices: union_choices(union, unit, diags),
            });
        }
    }

    for item in top_level_decls(&unit.module) {
        let Decl::TsInterface(decl) = item.decl else {
            continue;
        };
        if !is_nested_configuration(decl) || wrapper.has_nested(decl.id.sym.as_str()) {
            continue;
        }
        if let Some(mut nested) = interface_information(decl, item.doc_pos, &mut wrapper, ctx, diags)
        {
            fill_zero_defaults(&mut nested);
            // A cross-file expansion may already have brought it back in.
            if !wrapper.has_nested(&nested.name) {
                wrapper.nested_configuration.push(nested);
            }
        }
    }

    wrapper
}

/// Pass B: primary configuration and its default values.
fn extract_primary(
    wrapper: &mut ConfigurationWrapper,
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) {
    let unit = ctx.unit;
    for item in top_level_decls(&unit.module) {
        match item.decl {
            Decl::TsInterface(decl) if wrapper.configuration_information.is_none() => {
                if ConfigurationKind::of(decl).is_some_and(ConfigurationKind::is_primary) {
                    let information = interface_information(decl, item.doc_pos, wrapper, ctx, diags);
                    wrapper.configuration_information = information;
                }
            }
            Decl::Var(var) if wrapper.configuration_information.is_some() => {
                bind_default_values(var, wrapper, unit, ctx.library, diags);
            }
            _ => {}
        }
    }
}

/// Structural extraction shared by primary and nested interfaces.
///
/// `None` when the interface extends no configuration marker.
fn interface_information(
    decl: &TsInterfaceDecl,
    doc_pos: BytePos,
    wrapper: &mut ConfigurationWrapper,
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) -> Option<ConfigurationInformation> {
    let name = decl.id.sym.to_string();
    let Some(kind) = ConfigurationKind::of(decl) else {
        tracing::debug!("{} is ignored because it is not a configuration", name);
        return None;
    };

    let mut properties = Vec::new();
    let mut categories_on_properties: Vec<String> = Vec::new();
    for signature in property_signatures(decl) {
        let Some(property) = property_information(signature, &name, wrapper, ctx, diags) else {
            continue;
        };
        if let Some(category) = &property.category
            && !categories_on_properties.contains(category)
        {
            categories_on_properties.push(category.clone());
        }
        properties.push(property);
    }

    tracing::debug!(
        "Extracted configuration {} from interface with properties: {}",
        name,
        properties
            .iter()
            .map(|p| format!("({}: {})", p.name, p.property_type))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let doc = doc_info(ctx.unit, doc_pos, &name, diags);
    let doc_found = doc.is_some();
    let doc = doc.unwrap_or_default();

    for described in doc.categories.iter().flatten() {
        if !categories_on_properties.contains(&described.name) {
            diags.unsupported(format!(
                "{}: Description found for category \"{}\" but no property has this category.",
                name, described.name
            ));
        }
    }

    let runtime = kind.runtime();
    Some(ConfigurationInformation {
        name,
        title: doc.title,
        description: doc_found.then_some(doc.description),
        tags: doc.tags,
        categories: doc.categories,
        runtime,
        is_application_config: runtime.is_some(),
        properties,
    })
}

fn property_information(
    signature: &TsPropertySignature,
    interface_name: &str,
    wrapper: &mut ConfigurationWrapper,
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) -> Option<ConfigProperty> {
    let name = extract_key_name(&signature.key)?;
    let qualified = format!("{}.{}", interface_name, name);
    let doc = doc_info(ctx.unit, signature.span.lo, &qualified, diags).unwrap_or_default();

    if signature.optional {
        diags.unsupported(format!(
            "{} property has been identified as optional, which is not cms compliant",
            qualified
        ));
    }

    let ty = signature.type_ann.as_deref().map(|ann| &*ann.type_ann);
    let resolved = resolve_type(ty, wrapper, ctx, diags);

    if resolved.property_type.is_enum() && resolved.choices.as_ref().is_none_or(Vec::is_empty) {
        diags.unsupported(format!(
            "{} property should be treated as ENUM but it is not an UnionType nor a TypeReference. This is not cms compliant",
            qualified
        ));
    }

    Some(ConfigProperty {
        label: doc.label.unwrap_or_else(|| label_from_name(&name)),
        name,
        description: doc.description,
        category: doc.category,
        property_type: resolved.property_type,
        choices: resolved.choices,
        reference: resolved.reference,
        value: None,
        values: None,
        widget: doc.widget,
        required: doc.required.then_some(true),
    })
}

/// Parsed documentation comment of the node at `pos`, if there is one.
fn doc_info(
    unit: &SourceUnit,
    pos: BytePos,
    entity: &str,
    diags: &mut Diagnostics,
) -> Option<DocInfo> {
    let comment = unit.doc_comment(pos)?;
    match DocInfo::parse(comment) {
        Ok(info) => Some(info),
        Err(e) => {
            diags.unsupported(format!("{}: {}", entity, e));
            None
        }
    }
}

/// Zero values of nested configuration properties: `''`, `'false'`, `'0'` or the
/// first enum choice.
fn fill_zero_defaults(information: &mut ConfigurationInformation) {
    for property in &mut information.properties {
        property.value = match property.property_type {
            PropertyType::String => Some(String::new()),
            PropertyType::Boolean => Some("false".to_string()),
            PropertyType::Number => Some("0".to_string()),
            PropertyType::Enum => property.choices.as_ref().and_then(|c| c.first().cloned()),
            _ => property.value.take(),
        };
    }
}

/// Bind the defaults of `const x: PrimaryConfig = { ... }`.
fn bind_default_values(
    var: &VarDecl,
    wrapper: &mut ConfigurationWrapper,
    unit: &SourceUnit,
    library: &str,
    diags: &mut Diagnostics,
) {
    let Some(config_name) = wrapper
        .configuration_information
        .as_ref()
        .map(|info| info.name.clone())
    else {
        return;
    };

    for declarator in &var.decls {
        let Pat::Ident(binding) = &declarator.name else {
            continue;
        };
        let is_typed_with_config = binding.type_ann.as_ref().is_some_and(|ann| {
            matches!(&*ann.type_ann, TsType::TsTypeRef(type_ref)
                if matches!(&type_ref.type_name, TsEntityName::Ident(ident) if ident.sym.as_str() == config_name))
        });
        if !is_typed_with_config {
            continue;
        }
        let Some(Expr::Object(object)) = declarator.init.as_deref().map(unwrap_ts_expr) else {
            continue;
        };

        for prop in &object.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            let Prop::KeyValue(key_value) = &**prop else {
                continue;
            };
            let Some(key) = extract_prop_name(&key_value.key) else {
                continue;
            };
            bind_default_value(&config_name, &key, &key_value.value, wrapper, unit, library, diags);
        }
    }
}

fn bind_default_value(
    config_name: &str,
    key: &str,
    value: &Expr,
    wrapper: &mut ConfigurationWrapper,
    unit: &SourceUnit,
    library: &str,
    diags: &mut Diagnostics,
) {
    let qualified = format!("{}.{}", config_name, key);
    let typed_nested = {
        let Some(property) = wrapper
            .configuration_information
            .as_ref()
            .and_then(|info| info.properties.iter().find(|p| p.name == key))
        else {
            return;
        };
        property
            .reference
            .as_ref()
            .is_some_and(|r| r.library != library || wrapper.has_nested(&r.name))
    };

    let mut scalar = None;
    let mut values = None;
    match unwrap_ts_expr(value) {
        Expr::Array(array) => {
            let mut defaults = Vec::new();
            for element in array.elems.iter().flatten() {
                let expr = unwrap_ts_expr(&element.expr);
                match expr {
                    Expr::Lit(Lit::Str(s)) if element.spread.is_none() => {
                        defaults.push(DefaultValue::Text(s.value.to_string_lossy().to_string()));
                    }
                    Expr::Object(item) if element.spread.is_none() && typed_nested => {
                        defaults.push(DefaultValue::Record(object_record(item, unit)));
                    }
                    Expr::Object(_) if element.spread.is_none() => diags.warn(format!(
                        "{} default value will be ignored because it's not typed as nested configuration",
                        qualified
                    )),
                    _ => diags.warn(format!(
                        "Unsupported default value found in {} will be ignored: {}",
                        qualified,
                        unit.text(element.expr.span())
                    )),
                }
            }
            values = Some(defaults);
        }
        other => match literal_text(other) {
            Some(text) => scalar = Some(text),
            None => diags.unsupported(format!(
                "{} default value {} is not a literal and will be ignored",
                qualified,
                unit.text(other.span())
            )),
        },
    }

    if let Some(property) = wrapper
        .configuration_information
        .as_mut()
        .and_then(|info| info.property_mut(key))
    {
        if values.is_some() {
            property.values = values;
        }
        if scalar.is_some() {
            property.value = scalar;
        }
    }
}

/// Key/value record of an object literal default, values as literal text.
fn object_record(object: &ObjectLit, unit: &SourceUnit) -> BTreeMap<String, String> {
    let mut record = BTreeMap::new();
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(key_value) = &**prop else {
            continue;
        };
        let Some(key) = extract_prop_name(&key_value.key) else {
            continue;
        };
        let value = literal_text(&key_value.value).unwrap_or_else(|| {
            remove_quotation_marks(&unit.text(key_value.value.span())).to_string()
        });
        record.insert(key, value);
    }
    record
}

/// Reconcile property categories with the interface's own and the global ones.
///
/// Categories a property references that are described neither on the interface
/// nor globally are dropped from the property. The final category list is the
/// interface's own plus the global categories actually used; `None` when empty.
pub fn reconcile_categories(
    information: &mut ConfigurationInformation,
    global_categories: &[CategoryDescription],
    diags: &mut Diagnostics,
) {
    let mut categories: Vec<CategoryDescription> =
        information.categories.take().unwrap_or_default();

    for category in &categories {
        if global_categories.iter().any(|g| g.name == category.name) {
            diags.warn(format!(
                "The category {} is already defined in the global ones.",
                category.name
            ));
        }
    }

    for property in &mut information.properties {
        let Some(category) = property.category.as_deref() else {
            continue;
        };
        if categories.iter().any(|c| c.name == category) {
            continue;
        }
        if let Some(global) = global_categories.iter().find(|g| g.name == category) {
            categories.push(global.clone());
        } else {
            diags.warn(format!(
                "The property {} from {} has an unknown category {}. The category will not be set for this property.",
                property.name, information.name, category
            ));
            property.category = None;
        }
    }

    information.categories = (!categories.is_empty()).then_some(categories);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use crate::core::data::TypeReference;
    use crate::core::diagnostics::Severity;
    use crate::core::extract::config_extractor::*;
    use crate::core::parsers::source::parse_source;

    const LIBRARY: &str = "@my/app";

    fn extract(code: &str, strict: bool) -> (ConfigurationWrapper, Diagnostics) {
        let unit = parse_source(code.to_string(), &PathBuf::from("/virtual/my.config.ts")).unwrap();
        let session = Session::default();
        let mut diags = Diagnostics::new(strict);
        let libraries = vec!["@lib/design".to_string()];
        let wrapper = extract_configuration(&unit, &session, LIBRARY, &libraries, &mut diags);
        (wrapper, diags)
    }

    fn property<'a>(info: &'a ConfigurationInformation, name: &str) -> &'a ConfigProperty {
        info.properties.iter().find(|p| p.name == name).unwrap()
    }

    fn messages(diags: &Diagnostics) -> Vec<String> {
        diags.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn test_primary_configuration_with_defaults() {
        let (wrapper, diags) = extract(
            r#"
import { Configuration } from '@o3r/core';

export interface MyConfig extends Configuration {
  myBool: boolean;
  myArray: string[];
  untouched: string;
}

export const MY_DEFAULT_CONFIG: MyConfig = {
  myBool: true,
  myArray: ['a', 'b']
};
"#,
            false,
        );
        let info = wrapper.configuration_information.unwrap();
        assert_eq!(info.name, "MyConfig");
        assert_eq!(info.runtime, None);
        assert!(!info.is_application_config);

        let my_bool = property(&info, "myBool");
        assert_eq!(my_bool.property_type, PropertyType::Boolean);
        assert_eq!(my_bool.value.as_deref(), Some("true"));
        assert_eq!(my_bool.label, "my Bool");
        assert_eq!(my_bool.description, "");

        let my_array = property(&info, "myArray");
        assert_eq!(my_array.property_type, PropertyType::StringArray);
        assert_eq!(
            my_array.values,
            Some(vec![DefaultValue::from("a"), DefaultValue::from("b")])
        );

        let untouched = property(&info, "untouched");
        assert_eq!(untouched.value, None);
        assert_eq!(untouched.values, None);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_nested_configurations_get_zero_defaults() {
        let (wrapper, _) = extract(
            r#"
export type Mode = 'light' | 'dark';

export interface Item extends NestedConfiguration {
  text: string;
  visible: boolean;
  count: number;
  mode: Mode;
  tags: string[];
}

export interface Other extends NestedConfiguration {
  name: string;
}
"#,
            false,
        );
        assert!(wrapper.configuration_information.is_none());
        assert_eq!(
            wrapper.union_type_string_literal,
            vec![UnionTypeStringLiteral {
                name: "Mode".to_string(),
                choices: vec!["light".to_string(), "dark".to_string()]
            }]
        );

        let names: Vec<&str> = wrapper.nested_configuration.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Item", "Other"]);

        let item = &wrapper.nested_configuration[0];
        let values: Vec<(&str, Option<&str>)> = item
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_deref()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("text", Some("")),
                ("visible", Some("false")),
                ("count", Some("0")),
                ("mode", Some("light")),
                ("tags", None),
            ]
        );
    }

    #[test]
    fn test_non_literal_defaults_are_excluded() {
        let (wrapper, diags) = extract(
            r#"
export interface MyConfig extends Configuration {
  scalar: string;
  list: string[];
}
export const DEFAULT: MyConfig = {
  scalar: foo.bar,
  list: ['a', foo.bar]
};
"#,
            false,
        );
        let info = wrapper.configuration_information.unwrap();
        let scalar = property(&info, "scalar");
        assert_eq!(scalar.property_type, PropertyType::String);
        assert_eq!(scalar.value, None);
        let list = property(&info, "list");
        assert_eq!(list.property_type, PropertyType::StringArray);
        assert_eq!(list.values, Some(vec![DefaultValue::from("a")]));

        let messages = messages(&diags);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("MyConfig.scalar") && messages[0].contains("foo.bar"));
        assert!(messages[1].contains("MyConfig.list") && messages[1].contains("foo.bar"));
    }

    #[test]
    fn test_unsupported_array_element_always_warns() {
        let code = r#"
export interface MyConfig extends Configuration {
  list: string[];
}
export const DEFAULT: MyConfig = { list: ['a', 42, foo.bar] };
"#;
        for strict in [false, true] {
            let (wrapper, diags) = extract(code, strict);
            assert!(!diags.has_errors(), "strict = {}", strict);
            assert_eq!(diags.warning_count(), 2);
            let info = wrapper.configuration_information.unwrap();
            assert_eq!(property(&info, "list").values, Some(vec![DefaultValue::from("a")]));
        }
    }

    #[test]
    fn test_object_default_on_element_property_follows_mode() {
        let code = r#"
export interface Item extends NestedConfiguration {
  label: string;
}
export interface MyConfig extends Configuration {
  item: Item;
}
export const DEFAULT: MyConfig = { item: { label: 'a' } };
"#;
        let (wrapper, diags) = extract(code, false);
        assert!(!diags.has_errors());
        assert_eq!(diags.warning_count(), 1);
        let info = wrapper.configuration_information.unwrap();
        let item = property(&info, "item");
        assert_eq!(item.property_type, PropertyType::Element);
        assert_eq!(item.value, None);
        assert!(messages(&diags)[0].contains("MyConfig.item default value"));

        let (wrapper, diags) = extract(code, true);
        assert!(diags.has_errors());
        let messages = messages(&diags);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("is not a literal and will be ignored"));
        let info = wrapper.configuration_information.unwrap();
        assert_eq!(property(&info, "item").value, None);
    }

    #[test]
    fn test_nested_object_defaults() {
        let (wrapper, diags) = extract(
            r#"
export interface Item extends NestedConfiguration {
  label: string;
  count: number;
}
export interface MyConfig extends Configuration {
  items: Item[];
  untyped: string[];
}
export const DEFAULT: MyConfig = {
  items: [{ label: 'first', count: 1 }, { 'label': "second", count: -2 }],
  untyped: [{ label: 'ignored' }]
};
"#,
            false,
        );
        let info = wrapper.configuration_information.unwrap();
        let items = property(&info, "items");
        assert_eq!(items.property_type, PropertyType::ElementArray);
        assert_eq!(items.reference, Some(TypeReference::new(LIBRARY, "Item")));

        let record = |pairs: &[(&str, &str)]| {
            DefaultValue::Record(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        };
        assert_eq!(
            items.values,
            Some(vec![
                record(&[("label", "first"), ("count", "1")]),
                record(&[("label", "second"), ("count", "-2")]),
            ])
        );
        assert_eq!(property(&info, "untyped").values, Some(vec![]));
        assert_eq!(
            messages(&diags),
            vec!["MyConfig.untyped default value will be ignored because it's not typed as nested configuration"]
        );
    }

    #[test]
    fn test_defaults_before_interface_are_ignored() {
        let (wrapper, _) = extract(
            r#"
export const EARLY: MyConfig = { flag: true };
export interface MyConfig extends Configuration {
  flag: boolean;
}
export const OTHER: Something = { flag: false };
"#,
            false,
        );
        let info = wrapper.configuration_information.unwrap();
        assert_eq!(property(&info, "flag").value, None);
    }

    #[test]
    fn test_application_configuration_runtime_flag() {
        let cases = [
            ("AppBuildConfiguration", Some(false), true),
            ("AppRuntimeConfiguration", Some(true), true),
            ("Configuration", None, false),
        ];
        for (marker, runtime, is_application) in cases {
            let code = format!("export interface AppConfig extends {} {{ a: string; }}", marker);
            let (wrapper, _) = extract(&code, false);
            let info = wrapper.configuration_information.unwrap();
            assert_eq!(info.runtime, runtime, "{}", marker);
            assert_eq!(info.is_application_config, is_application, "{}", marker);
        }
    }

    #[test]
    fn test_first_primary_interface_wins() {
        let (wrapper, _) = extract(
            r#"
interface Helper { a: string; }
export interface First extends Configuration { a: string; }
export interface Second extends Configuration { b: string; }
"#,
            false,
        );
        assert_eq!(wrapper.configuration_information.unwrap().name, "First");
    }

    #[test]
    fn test_optional_property_policy() {
        let code = "export interface MyConfig extends Configuration { maybe?: string; }";

        let (wrapper, diags) = extract(code, false);
        assert!(wrapper.configuration_information.is_some());
        assert_eq!(
            messages(&diags),
            vec!["MyConfig.maybe property has been identified as optional, which is not cms compliant. Will throw in strict mode."]
        );

        let (_, diags) = extract(code, true);
        assert!(diags.has_errors());
        assert!(diags.check("my.config.ts").is_err());
    }

    #[test]
    fn test_doc_comments_fill_metadata() {
        let (wrapper, diags) = extract(
            r#"
/**
 * Header configuration
 * @title Header
 * @tags [booking, upsell]
 * @o3rCategories display Display settings
 * @o3rCategories unused
 */
export interface HeaderConfig extends Configuration {
  /**
   * Show the logo
   * @label Logo visibility
   * @o3rCategory display
   * @o3rRequired
   */
  showLogo: boolean;
  /**
   * @o3rWidget COLOR
   * @o3rWidgetParam alpha false
   */
  color: string;
}
"#,
            false,
        );
        let info = wrapper.configuration_information.unwrap();
        assert_eq!(info.title.as_deref(), Some("Header"));
        assert_eq!(info.description.as_deref(), Some("Header configuration"));
        assert_eq!(
            info.tags,
            Some(vec!["booking".to_string(), "upsell".to_string()])
        );

        let show_logo = property(&info, "showLogo");
        assert_eq!(show_logo.label, "Logo visibility");
        assert_eq!(show_logo.description, "Show the logo");
        assert_eq!(show_logo.category.as_deref(), Some("display"));
        assert_eq!(show_logo.required, Some(true));

        let color = property(&info, "color");
        assert_eq!(color.widget.as_ref().unwrap().widget_type, "COLOR");
        assert_eq!(color.required, None);

        assert_eq!(
            messages(&diags),
            vec!["HeaderConfig: Description found for category \"unused\" but no property has this category. Will throw in strict mode."]
        );
    }

    #[test]
    fn test_enum_property_choices() {
        let (wrapper, diags) = extract(
            r#"
type Size = 'S' | 'M';
export interface MyConfig extends Configuration {
  size: Size;
  inline: 'a' | 'b';
}
export const DEFAULT: MyConfig = { size: 'M', inline: 'b' };
"#,
            true,
        );
        let info = wrapper.configuration_information.unwrap();
        let size = property(&info, "size");
        assert_eq!(size.property_type, PropertyType::Enum);
        assert_eq!(size.choices, Some(vec!["S".to_string(), "M".to_string()]));
        assert_eq!(size.value.as_deref(), Some("M"));
        assert_eq!(property(&info, "inline").value.as_deref(), Some("b"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_reconcile_categories() {
        let mut information = ConfigurationInformation {
            name: "MyConfig".to_string(),
            categories: Some(vec![CategoryDescription {
                name: "local".to_string(),
                label: "Local".to_string(),
            }]),
            properties: ["local", "global", "missing"]
                .iter()
                .map(|category| ConfigProperty {
                    name: format!("{}Prop", category),
                    label: String::new(),
                    description: String::new(),
                    category: Some(category.to_string()),
                    property_type: PropertyType::String,
                    choices: None,
                    reference: None,
                    value: None,
                    values: None,
                    widget: None,
                    required: None,
                })
                .collect(),
            ..Default::default()
        };
        let global = vec![
            CategoryDescription {
                name: "global".to_string(),
                label: "Global".to_string(),
            },
            CategoryDescription {
                name: "local".to_string(),
                label: "Shadowed".to_string(),
            },
        ];
        let mut diags = Diagnostics::new(false);
        reconcile_categories(&mut information, &global, &mut diags);

        let categories: Vec<&str> = information
            .categories
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(categories, vec!["Local", "Global"]);
        assert_eq!(information.properties[2].category, None);
        assert_eq!(diags.warning_count(), 2);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
    }

    #[test]
    fn test_reconcile_without_categories_is_none() {
        let mut information = ConfigurationInformation::default();
        let mut diags = Diagnostics::new(true);
        reconcile_categories(&mut information, &[], &mut diags);
        assert_eq!(information.categories, None);
        assert!(diags.is_empty());
    }
}
