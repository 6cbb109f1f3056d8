//! Component class extraction.
//!
//! A file contributes at most one component: the first top-level class that either
//! carries the `@O3rComponent` annotation or implements one of the legacy marker
//! interfaces.

use std::sync::LazyLock;

use regex::Regex;
use swc_common::Spanned;
use swc_ecma_ast::{
    CallExpr, Callee, Class, ClassMember, Decl, DefaultDecl, Expr, Lit, ModuleDecl, ModuleItem,
    ObjectLit, Prop, PropOrSpread, Stmt,
};

use crate::core::{
    data::{ComponentCategory, ComponentInfo},
    diagnostics::Diagnostics,
    extract::helpers::{extract_prop_name, heritage_name, unwrap_ts_expr},
    parsers::{
        json::read_localization_keys,
        source::{SourceUnit, normalize_path, resolve_import_path, to_slash_string},
    },
};
use crate::error::Result;

static CONFIGURABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(DynamicConfigurable|Configurable)").unwrap());

const COMPONENT_ANNOTATION: &str = "O3rComponent";
const ANGULAR_COMPONENT: &str = "Component";
const LOCALIZATION_DECORATOR: &str = "Localization";
const LINKABLE_TO_RULESET: &str = "LinkableToRuleset";
const CONTEXT_SUFFIX: &str = "Context";

/// Extract the component of a file, if it declares one.
///
/// Localization bundles declared on the class are read from disk; failing to read
/// or parse one is an error.
pub fn extract_component(unit: &SourceUnit, diags: &mut Diagnostics) -> Result<Option<ComponentInfo>> {
    tracing::debug!("Parsing component from {}", unit.path.display());

    let Some((name, class)) = top_level_classes(unit).find(|(_, class)| is_component_class(class))
    else {
        return Ok(None);
    };
    let mut info = component_information(unit, name, class, diags);

    if info.config_name.is_some() {
        tracing::debug!(
            "Extracted component {} based on configuration {}",
            info.name,
            info.config_name.as_deref().unwrap_or_default()
        );
    } else {
        tracing::debug!("{} is not a configurable component", info.name);
    }

    info.localization_keys = localization_keys(unit, class)?;
    info.config_path = info
        .config_name
        .as_deref()
        .and_then(|name| import_location(unit, name));
    info.context_path = info
        .context_name
        .as_deref()
        .and_then(|name| import_location(unit, name));
    info.config_name = info.config_name.map(|name| declared_name(unit, name));
    info.context_name = info.context_name.map(|name| declared_name(unit, name));

    Ok(Some(info))
}

/// Name under which an imported type is declared (`import { A as B }` gives `A` for `B`).
fn declared_name(unit: &SourceUnit, local_name: String) -> String {
    match unit.import_of(&local_name) {
        Some(import) if import.imported_name != "default" && import.imported_name != "*" => {
            import.imported_name.clone()
        }
        _ => local_name,
    }
}

/// Named top-level classes, exported or not, in source order.
fn top_level_classes(unit: &SourceUnit) -> impl Iterator<Item = (String, &Class)> {
    unit.module.body.iter().filter_map(|item| match item {
        ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))) => {
            Some((decl.ident.sym.to_string(), &*decl.class))
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
            Decl::Class(decl) => Some((decl.ident.sym.to_string(), &*decl.class)),
            _ => None,
        },
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
            DefaultDecl::Class(expr) => expr
                .ident
                .as_ref()
                .map(|ident| (ident.sym.to_string(), &*expr.class)),
            _ => None,
        },
        _ => None,
    })
}

fn is_component_class(class: &Class) -> bool {
    let annotated = class
        .decorators
        .iter()
        .any(|d| decorator_call(&d.expr).is_some_and(|(name, _)| name == COMPONENT_ANNOTATION));
    annotated || implemented_names(class).any(|name| is_legacy_marker(&name))
}

fn is_legacy_marker(name: &str) -> bool {
    CONFIGURABLE_REGEX.is_match(name)
        || name.ends_with(CONTEXT_SUFFIX)
        || name == LINKABLE_TO_RULESET
        || ComponentCategory::from_marker(name).is_some()
}

fn implemented_names(class: &Class) -> impl Iterator<Item = String> + '_ {
    class.implements.iter().filter_map(heritage_name)
}

fn component_information(
    unit: &SourceUnit,
    name: String,
    class: &Class,
    diags: &mut Diagnostics,
) -> ComponentInfo {
    let mut info = ComponentInfo {
        name,
        ..Default::default()
    };

    let mut legacy_category = None;
    for implemented in &class.implements {
        let Some(marker) = heritage_name(implemented) else {
            continue;
        };
        if info.config_name.is_none() && CONFIGURABLE_REGEX.is_match(&marker) {
            info.config_name = implemented
                .type_args
                .as_ref()
                .and_then(|args| args.params.first())
                .map(|payload| unit.text(payload.span()));
            info.is_dynamic_config = marker.starts_with("Dynamic");
        } else if info.context_name.is_none() && marker.ends_with(CONTEXT_SUFFIX) {
            info.context_name = Some(marker);
        } else if let Some(category) = ComponentCategory::from_marker(&marker) {
            diags.warn(format!(
                "Interface {} is deprecated, you should use the @O3rComponent decorator",
                marker
            ));
            legacy_category = Some(category);
        } else if marker == LINKABLE_TO_RULESET {
            info.linkable_to_ruleset = true;
        }
    }

    let mut annotated_category = None;
    for decorator in &class.decorators {
        let Some((callee, call)) = decorator_call(&decorator.expr) else {
            continue;
        };
        let Some(options) = first_object_argument(call) else {
            continue;
        };
        match callee {
            ANGULAR_COMPONENT => {
                info.selector = string_property(options, "selector");
                info.template_url = string_property(options, "templateUrl");
            }
            COMPONENT_ANNOTATION => {
                annotated_category = property_value(options, "componentType")
                    .map(|value| ComponentCategory::from_annotation(&unit.text(value.span())));
            }
            _ => {}
        }
    }

    info.category = annotated_category.or(legacy_category).unwrap_or_default();
    info
}

/// Keys of every localization bundle declared with `@Localization('path')` on a
/// class property, in declaration order and without repetition.
fn localization_keys(unit: &SourceUnit, class: &Class) -> Result<Vec<String>> {
    let Some(dir) = unit.path.parent() else {
        return Ok(Vec::new());
    };

    let mut keys: Vec<String> = Vec::new();
    for member in &class.body {
        let ClassMember::ClassProp(prop) = member else {
            continue;
        };
        for decorator in &prop.decorators {
            let Some((LOCALIZATION_DECORATOR, call)) = decorator_call(&decorator.expr) else {
                continue;
            };
            let Some(Expr::Lit(Lit::Str(file))) = call.args.first().map(|arg| &*arg.expr) else {
                continue;
            };
            let relative = file.value.to_string_lossy().to_string();
            let bundle = normalize_path(&dir.join(relative));
            for key in read_localization_keys(&bundle)? {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }
    Ok(keys)
}

/// Module a name is imported from: an absolute `/`-separated file path for relative
/// imports, the package specifier otherwise.
fn import_location(unit: &SourceUnit, name: &str) -> Option<String> {
    let import = unit.import_of(name)?;
    if import.module_path.starts_with('.') {
        resolve_import_path(&unit.path, &import.module_path).map(|path| to_slash_string(&path))
    } else {
        Some(import.module_path.clone())
    }
}

/// `@Name(...)` gives the callee name and the call.
fn decorator_call(expr: &Expr) -> Option<(&str, &CallExpr)> {
    let Expr::Call(call) = expr else {
        return None;
    };
    match &call.callee {
        Callee::Expr(callee) => match &**callee {
            Expr::Ident(ident) => Some((ident.sym.as_str(), call)),
            _ => None,
        },
        _ => None,
    }
}

fn first_object_argument(call: &CallExpr) -> Option<&ObjectLit> {
    match call.args.first().map(|arg| unwrap_ts_expr(&arg.expr)) {
        Some(Expr::Object(object)) => Some(object),
        _ => None,
    }
}

fn property_value<'a>(object: &'a ObjectLit, name: &str) -> Option<&'a Expr> {
    object.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) if extract_prop_name(&kv.key).as_deref() == Some(name) => {
                Some(&*kv.value)
            }
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

fn string_property(object: &ObjectLit, name: &str) -> Option<String> {
    match property_value(object, name).map(unwrap_ts_expr) {
        Some(Expr::Lit(Lit::Str(s))) => Some(s.value.to_string_lossy().to_string()),
        Some(Expr::Tpl(tpl)) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .map(|s| s.to_string_lossy().to_string()),
        _ => None,
    }
}
