//! Legacy module extraction: `@NgModule({ exports: [...] })` classes.
//!
//! Deprecated. Only used to fill `moduleName`/`modulePath` of component records.

use swc_ecma_ast::{Callee, Class, ClassDecl, ClassExpr, Expr, Prop, PropOrSpread};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{
    data::ModuleInfo,
    extract::helpers::{extract_prop_name, unwrap_ts_expr},
    parsers::source::SourceUnit,
};

const MODULE_DECORATOR: &str = "NgModule";

/// First class of the file annotated as a module, with the identifiers it exports.
pub fn extract_module(unit: &SourceUnit) -> Option<ModuleInfo> {
    let mut visitor = ModuleVisitor::default();
    unit.module.visit_with(&mut visitor);
    visitor.found
}

#[derive(Default)]
struct ModuleVisitor {
    found: Option<ModuleInfo>,
}

impl ModuleVisitor {
    fn check(&mut self, name: &str, class: &Class) {
        if self.found.is_some() {
            return;
        }
        if let Some(exported_items) = class
            .decorators
            .iter()
            .find_map(|decorator| module_exports(&decorator.expr))
        {
            self.found = Some(ModuleInfo {
                name: name.to_string(),
                exported_items,
            });
        }
    }
}

impl Visit for ModuleVisitor {
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.check(&node.ident.sym, &node.class);
    }

    // `export default class X`
    fn visit_class_expr(&mut self, node: &ClassExpr) {
        if let Some(ident) = &node.ident {
            self.check(&ident.sym, &node.class);
        }
    }
}

fn module_exports(expr: &Expr) -> Option<Vec<String>> {
    let Expr::Call(call) = expr else {
        return None;
    };
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    if !matches!(&**callee, Expr::Ident(ident) if ident.sym.as_str() == MODULE_DECORATOR) {
        return None;
    }
    let Some(Expr::Object(options)) = call.args.first().map(|arg| unwrap_ts_expr(&arg.expr)) else {
        return Some(Vec::new());
    };

    let exports = options.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) if extract_prop_name(&kv.key).as_deref() == Some("exports") => {
                Some(&*kv.value)
            }
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    });
    let Some(Expr::Array(array)) = exports.map(unwrap_ts_expr) else {
        return Some(Vec::new());
    };

    Some(
        array
            .elems
            .iter()
            .flatten()
            .filter(|element| element.spread.is_none())
            .filter_map(|element| match unwrap_ts_expr(&element.expr) {
                Expr::Ident(ident) => Some(ident.sym.to_string()),
                _ => None,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use crate::core::extract::module_extractor::*;
    use crate::core::parsers::source::parse_source;

    fn extract(code: &str) -> Option<ModuleInfo> {
        let unit = parse_source(code.to_string(), Path::new("/project/src/test.module.ts")).unwrap();
        extract_module(&unit)
    }

    #[test]
    fn test_module_exports() {
        let info = extract(
            r#"
@NgModule({
  imports: [CommonModule],
  declarations: [TestComponent, OtherComponent],
  exports: [TestComponent, OtherComponent, ...SHARED]
})
export class TestModule {}
"#,
        );
        assert_eq!(
            info,
            Some(ModuleInfo {
                name: "TestModule".to_string(),
                exported_items: vec!["TestComponent".to_string(), "OtherComponent".to_string()],
            })
        );
    }

    #[test]
    fn test_module_without_exports() {
        let info = extract("@NgModule({ imports: [] })\nclass EmptyModule {}").unwrap();
        assert_eq!(info.name, "EmptyModule");
        assert!(info.exported_items.is_empty());
    }

    #[test]
    fn test_spread_exports_are_skipped() {
        let info = extract("@NgModule({ exports: [...SHARED, TestComponent] })\nclass SharedModule {}").unwrap();
        assert_eq!(info.exported_items, vec!["TestComponent".to_string()]);
    }

    #[test]
    fn test_default_exported_module() {
        let info = extract("@NgModule({ exports: [A] })\nexport default class DefaultModule {}").unwrap();
        assert_eq!(info.name, "DefaultModule");
        assert_eq!(info.exported_items, vec!["A".to_string()]);
    }

    #[test]
    fn test_non_module_class() {
        assert_eq!(extract("@Component({})\nexport class TestComponent {}"), None);
    }
}
