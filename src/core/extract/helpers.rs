//! Helper functions for AST node extraction.
//!
//! Pure functions with no state dependencies, shared by the extractors and the
//! session lookups.

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    Decl, Expr, Lit, MemberProp, Module, ModuleDecl, ModuleItem, PropName, Stmt, TsEntityName, TsEnumDecl,
    TsExprWithTypeArgs, TsInterfaceDecl, TsLit, TsType, TsTypeElement, UnaryOp,
};

/// A top-level declaration, exported or not.
pub struct TopLevelDecl<'a> {
    pub decl: &'a Decl,
    /// Position leading comments are attached to (the `export` keyword when exported).
    pub doc_pos: BytePos,
}

/// Iterate top-level declarations in source order.
pub fn top_level_decls(module: &Module) -> impl Iterator<Item = TopLevelDecl<'_>> {
    module.body.iter().filter_map(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => Some(TopLevelDecl {
            decl: &export.decl,
            doc_pos: export.span.lo,
        }),
        ModuleItem::Stmt(Stmt::Decl(decl)) => Some(TopLevelDecl {
            decl,
            doc_pos: decl.span().lo,
        }),
        _ => None,
    })
}

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

/// Unwrap parenthesized and `readonly` types.
pub fn unwrap_ts_type(ty: &TsType) -> &TsType {
    match ty {
        TsType::TsParenthesizedType(paren) => unwrap_ts_type(&paren.type_ann),
        TsType::TsTypeOperator(op) if op.op == swc_ecma_ast::TsTypeOperatorOp::ReadOnly => {
            unwrap_ts_type(&op.type_ann)
        }
        _ => ty,
    }
}

/// Extract property name from a PropName node.
pub fn extract_prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Name of an interface property signature key (`foo` or `'foo'`).
pub fn extract_key_name(key: &Expr) -> Option<String> {
    match key {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().to_string()),
        _ => None,
    }
}

/// Text of a literal usable as a scalar default value.
///
/// Strings lose their quotes, booleans and numbers keep their source spelling.
/// Anything that is not a literal yields `None`.
pub fn literal_text(expr: &Expr) -> Option<String> {
    match unwrap_ts_expr(expr) {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().to_string()),
        Expr::Lit(Lit::Bool(b)) => Some(b.value.to_string()),
        Expr::Lit(Lit::Num(n)) => Some(
            n.raw
                .as_ref()
                .map(|raw| raw.to_string())
                .unwrap_or_else(|| n.value.to_string()),
        ),
        Expr::Unary(unary) if unary.op == UnaryOp::Minus => {
            literal_text(&unary.arg).map(|text| format!("-{}", text))
        }
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .map(|s| s.to_string_lossy().to_string()),
        _ => None,
    }
}

/// Remove one pair of surrounding quotes (`'a'` and `"a"` both give `a`).
pub fn remove_quotation_marks(input: &str) -> &str {
    let bytes = input.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'\'' | b'"')
        && matches!(bytes[bytes.len() - 1], b'\'' | b'"')
    {
        &input[1..input.len() - 1]
    } else {
        input
    }
}

/// Full text of an entity name (`Foo` or `ns.Foo`).
pub fn entity_name(name: &TsEntityName) -> String {
    match name {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => {
            format!("{}.{}", entity_name(&qualified.left), qualified.right.sym)
        }
    }
}

/// Name of a heritage clause entry, without type arguments.
pub fn heritage_name(heritage: &TsExprWithTypeArgs) -> Option<String> {
    expr_name(&heritage.expr)
}

fn expr_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Member(member) => {
            let object = expr_name(&member.obj)?;
            match &member.prop {
                MemberProp::Ident(property) => Some(format!("{}.{}", object, property.sym)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Last segment of a possibly qualified name (`core.Configuration` gives `Configuration`).
pub fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Value of a string literal type (`'a'`).
pub fn string_literal_type(ty: &TsType) -> Option<String> {
    match ty {
        TsType::TsLitType(lit) => match &lit.lit {
            TsLit::Str(s) => Some(s.value.to_string_lossy().to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// Values of an enum whose members are all initialized with strings.
pub fn string_enum_values(decl: &TsEnumDecl) -> Option<Vec<String>> {
    decl.members
        .iter()
        .map(|member| match member.init.as_deref() {
            Some(Expr::Lit(Lit::Str(s))) => Some(s.value.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Property signatures of an interface body.
pub fn property_signatures(
    decl: &TsInterfaceDecl,
) -> impl Iterator<Item = &swc_ecma_ast::TsPropertySignature> {
    decl.body.body.iter().filter_map(|element| match element {
        TsTypeElement::TsPropertySignature(prop) => Some(prop),
        _ => None,
    })
}

/// Insert a space before every upper-case letter (`myBool` gives `my Bool`).
pub fn label_from_name(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}
