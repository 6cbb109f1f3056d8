//! Mapping of declared property types onto the metadata type vocabulary.
//!
//! The resolution rules, in order:
//! 1. parentheses and `readonly` are unwrapped
//! 2. arrays resolve their element; primitives get a `[]` suffix, references to a
//!    nested configuration (local, cross-file or from an allow-listed library)
//!    become `element[]` with a reference
//! 3. named types: known nested configuration, known enum alias, then whatever
//!    string literals the session can resolve the name to
//! 4. inline unions of string literals become `enum`
//! 5. `string`, `number` and `boolean` keywords map 1:1, anything else is `unknown`

use std::{collections::HashSet, path::PathBuf};

use swc_ecma_ast::{
    TsEntityName, TsKeywordTypeKind, TsType, TsUnionOrIntersectionType, TsUnionType,
};

use crate::core::{
    data::{ConfigurationWrapper, PropertyType, TypeReference},
    diagnostics::Diagnostics,
    extract::{
        config_extractor::harvest_nested,
        helpers::{string_literal_type, unwrap_ts_type},
    },
    parsers::source::SourceUnit,
    session::{NestedLocation, Session},
};

/// Result of resolving one declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    pub property_type: PropertyType,
    pub reference: Option<TypeReference>,
    pub choices: Option<Vec<String>>,
}

impl ResolvedType {
    fn of(property_type: PropertyType) -> Self {
        Self {
            property_type,
            reference: None,
            choices: None,
        }
    }

    fn unknown() -> Self {
        Self::of(PropertyType::Unknown)
    }

    fn enumeration(choices: Vec<String>) -> Self {
        Self {
            property_type: PropertyType::Enum,
            reference: None,
            choices: Some(choices),
        }
    }

    fn element(property_type: PropertyType, library: &str, name: &str) -> Self {
        Self {
            property_type,
            reference: Some(TypeReference::new(library, name)),
            choices: None,
        }
    }
}

/// Everything type resolution needs to know about the file being extracted.
pub struct ResolutionContext<'a> {
    /// Library tagging references to configurations of the current project.
    pub library: &'a str,
    /// Allow-listed dependency libraries.
    pub libraries: &'a [String],
    pub session: &'a Session,
    pub unit: &'a SourceUnit,
    /// Cross-file expansions already done in this extraction run.
    pub expanded: &'a mut HashSet<(PathBuf, String)>,
}

impl<'a> ResolutionContext<'a> {
    /// Same run, other file.
    pub fn for_unit<'b>(&'b mut self, unit: &'b SourceUnit) -> ResolutionContext<'b> {
        ResolutionContext {
            library: self.library,
            libraries: self.libraries,
            session: self.session,
            unit,
            expanded: &mut *self.expanded,
        }
    }

    /// Library specifier and exported name when `name` is imported from an
    /// allow-listed library (or one of its entry points).
    pub fn library_import(&self, name: &str) -> Option<TypeReference> {
        let import = self.unit.import_of(name)?;
        let trusted = self.libraries.iter().any(|library| {
            import.module_path == *library
                || import
                    .module_path
                    .strip_prefix(library.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        });
        trusted.then(|| TypeReference::new(&import.module_path, &import.imported_name))
    }
}

/// Resolve a declared type. A missing annotation is `unknown`.
pub fn resolve_type(
    ty: Option<&TsType>,
    wrapper: &mut ConfigurationWrapper,
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) -> ResolvedType {
    let Some(ty) = ty else {
        return ResolvedType::unknown();
    };
    let ty = unwrap_ts_type(ty);

    if let Some(element) = array_element(ty) {
        return resolve_array(element, wrapper, ctx, diags);
    }

    match ty {
        TsType::TsTypeRef(type_ref) => {
            let name = match &type_ref.type_name {
                TsEntityName::Ident(ident) => ident.sym.to_string(),
                TsEntityName::TsQualifiedName(_) => return ResolvedType::unknown(),
            };
            if wrapper.has_nested(&name) {
                return ResolvedType::element(PropertyType::Element, ctx.library, &name);
            }
            if let Some(alias) = wrapper.enum_alias(&name) {
                return ResolvedType::enumeration(alias.choices.clone());
            }
            match ctx.session.string_union_choices(ctx.unit, &name) {
                Some(choices) => ResolvedType::enumeration(choices),
                None => ResolvedType::unknown(),
            }
        }
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union))
            if has_string_elements(union) =>
        {
            ResolvedType::enumeration(union_choices(union, ctx.unit, diags))
        }
        TsType::TsKeywordType(keyword) => match keyword.kind {
            TsKeywordTypeKind::TsStringKeyword => ResolvedType::of(PropertyType::String),
            TsKeywordTypeKind::TsBooleanKeyword => ResolvedType::of(PropertyType::Boolean),
            TsKeywordTypeKind::TsNumberKeyword => ResolvedType::of(PropertyType::Number),
            _ => ResolvedType::unknown(),
        },
        _ => ResolvedType::unknown(),
    }
}

fn resolve_array(
    element: &TsType,
    wrapper: &mut ConfigurationWrapper,
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) -> ResolvedType {
    let element = unwrap_ts_type(element);

    if let TsType::TsTypeRef(type_ref) = element
        && let TsEntityName::Ident(ident) = &type_ref.type_name
    {
        let name = ident.sym.as_str();
        if let Some(reference) = ctx.library_import(name) {
            return ResolvedType {
                property_type: PropertyType::ElementArray,
                reference: Some(reference),
                choices: None,
            };
        }
        if wrapper.has_nested(name) {
            return ResolvedType::element(PropertyType::ElementArray, ctx.library, name);
        }
        if let Some(location) = ctx.session.nested_declaration(ctx.unit, name) {
            if location.path != ctx.unit.path {
                expand_nested(&location, wrapper, ctx, diags);
            }
            return ResolvedType::element(PropertyType::ElementArray, ctx.library, &location.name);
        }
    }

    let child = resolve_type(Some(element), wrapper, ctx, diags);
    match child.property_type {
        PropertyType::Element => ResolvedType {
            property_type: PropertyType::ElementArray,
            ..child
        },
        scalar if scalar.is_primitive() => ResolvedType {
            property_type: scalar.array_of().unwrap_or(PropertyType::UnknownArray),
            reference: None,
            choices: child.choices.filter(|_| scalar.is_enum()),
        },
        _ => ResolvedType::of(PropertyType::UnknownArray),
    }
}

/// Harvest the nested configurations of the file declaring `location` into `wrapper`.
///
/// Runs at most once per (file, interface) in an extraction run, which also stops
/// mutually referencing nested configurations from recursing forever.
fn expand_nested(
    location: &NestedLocation,
    wrapper: &mut ConfigurationWrapper,
    ctx: &mut ResolutionContext<'_>,
    diags: &mut Diagnostics,
) {
    if !ctx
        .expanded
        .insert((location.path.clone(), location.name.clone()))
    {
        return;
    }
    tracing::debug!(
        "Expanding nested configuration {} from {}",
        location.name,
        location.path.display()
    );

    let session = ctx.session;
    let harvested = session.with_unit(&location.path, |other| {
        let mut other_ctx = ctx.for_unit(other);
        harvest_nested(&mut other_ctx, diags)
    });
    if let Some(harvested) = harvested {
        wrapper.merge_nested(harvested.nested_configuration);
    }
}

/// `T[]`, `Array<T>` and `ReadonlyArray<T>` give `T`.
fn array_element(ty: &TsType) -> Option<&TsType> {
    match ty {
        TsType::TsArrayType(array) => Some(&array.elem_type),
        TsType::TsTypeRef(type_ref) => match &type_ref.type_name {
            TsEntityName::Ident(ident)
                if matches!(ident.sym.as_str(), "Array" | "ReadonlyArray") =>
            {
                let params = &type_ref.type_params.as_ref()?.params;
                match params.as_slice() {
                    [param] => Some(param),
                    _ => None,
                }
            }
            _ => None,
        },
        _ => None,
    }
}

/// Whether a union has at least one string literal member.
pub fn has_string_elements(union: &TsUnionType) -> bool {
    union.types.iter().any(|t| string_literal_type(t).is_some())
}

/// String literal members of a union. Any other member is unsupported.
pub fn union_choices(union: &TsUnionType, unit: &SourceUnit, diags: &mut Diagnostics) -> Vec<String> {
    let choices: Vec<String> = union
        .types
        .iter()
        .filter_map(|t| string_literal_type(t))
        .collect();
    if choices.len() != union.types.len() {
        diags.unsupported(format!(
            "{} is a UnionType that does not have literal elements. This is not cms compliant",
            unit.text(union.span)
        ));
    }
    choices
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use pretty_assertions::assert_eq;
    use swc_ecma_ast::Decl;
    use tempfile::TempDir;

    use crate::core::data::UnionTypeStringLiteral;
    use crate::core::extract::helpers::{property_signatures, top_level_decls};
    use crate::core::extract::type_resolver::*;
    use crate::core::parsers::source::parse_source;

    const LIBRARY: &str = "@my/app";

    /// Resolve every property of the interface `Sample` declared in `code`.
    fn resolve_sample(
        session: &Session,
        unit: &SourceUnit,
        wrapper: &mut ConfigurationWrapper,
        diags: &mut Diagnostics,
    ) -> Vec<(String, ResolvedType)> {
        let libraries = vec!["@lib/design".to_string()];
        let mut expanded = HashSet::new();
        let mut ctx = ResolutionContext {
            library: LIBRARY,
            libraries: &libraries,
            session,
            unit,
            expanded: &mut expanded,
        };
        let sample = top_level_decls(&unit.module)
            .find_map(|d| match d.decl {
                Decl::TsInterface(i) if i.id.sym.as_str() == "Sample" => Some(i),
                _ => None,
            })
            .unwrap();
        property_signatures(sample)
            .map(|prop| {
                let name = crate::core::extract::helpers::extract_key_name(&prop.key).unwrap();
                let ty = prop.type_ann.as_deref().map(|a| &*a.type_ann);
                (name, resolve_type(ty, wrapper, &mut ctx, diags))
            })
            .collect()
    }

    fn resolve_inline(code: &str, wrapper: &mut ConfigurationWrapper) -> (Vec<(String, ResolvedType)>, Diagnostics) {
        let unit = parse_source(code.to_string(), Path::new("/virtual/sample.ts")).unwrap();
        let session = Session::default();
        let mut diags = Diagnostics::new(false);
        let resolved = resolve_sample(&session, &unit, wrapper, &mut diags);
        (resolved, diags)
    }

    fn types(resolved: &[(String, ResolvedType)]) -> Vec<(&str, PropertyType)> {
        resolved
            .iter()
            .map(|(name, r)| (name.as_str(), r.property_type))
            .collect()
    }

    #[test]
    fn test_primitives_and_arrays() {
        let (resolved, diags) = resolve_inline(
            r#"
interface Sample {
  a: string;
  b: (number);
  c: boolean;
  d: string[];
  e: readonly boolean[];
  f: Array<number>;
  g: Date;
  h: Date[];
  i: any;
  j;
}
"#,
            &mut ConfigurationWrapper::default(),
        );
        assert_eq!(
            types(&resolved),
            vec![
                ("a", PropertyType::String),
                ("b", PropertyType::Number),
                ("c", PropertyType::Boolean),
                ("d", PropertyType::StringArray),
                ("e", PropertyType::BooleanArray),
                ("f", PropertyType::NumberArray),
                ("g", PropertyType::Unknown),
                ("h", PropertyType::UnknownArray),
                ("i", PropertyType::Unknown),
                ("j", PropertyType::Unknown),
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_inline_union_is_enum() {
        let (resolved, diags) = resolve_inline(
            "interface Sample { size: 'S' | 'M'; sizes: ('S' | 'L')[]; mixed: 'a' | number; other: string | number; }",
            &mut ConfigurationWrapper::default(),
        );
        assert_eq!(resolved[0].1, ResolvedType::enumeration(vec!["S".into(), "M".into()]));
        assert_eq!(resolved[1].1.property_type, PropertyType::EnumArray);
        assert_eq!(resolved[1].1.choices, Some(vec!["S".to_string(), "L".to_string()]));
        assert_eq!(resolved[2].1, ResolvedType::enumeration(vec!["a".into()]));
        assert_eq!(resolved[3].1.property_type, PropertyType::Unknown);

        assert_eq!(diags.len(), 1);
        let message = &diags.iter().next().unwrap().message;
        assert!(message.starts_with("'a' | number is a UnionType"));
        assert!(message.ends_with("Will throw in strict mode."));
    }

    #[test]
    fn test_known_aliases_and_nested() {
        let mut wrapper = ConfigurationWrapper::default();
        wrapper.union_type_string_literal.push(UnionTypeStringLiteral {
            name: "Size".to_string(),
            choices: vec!["S".to_string(), "L".to_string()],
        });
        wrapper.nested_configuration.push(crate::core::data::ConfigurationInformation {
            name: "Item".to_string(),
            ..Default::default()
        });
        let (resolved, _) = resolve_inline(
            "interface Sample { size: Size; item: Item; items: Item[]; sizes: Size[]; }",
            &mut wrapper,
        );
        assert_eq!(resolved[0].1, ResolvedType::enumeration(vec!["S".into(), "L".into()]));
        assert_eq!(resolved[1].1, ResolvedType::element(PropertyType::Element, LIBRARY, "Item"));
        assert_eq!(
            resolved[2].1,
            ResolvedType::element(PropertyType::ElementArray, LIBRARY, "Item")
        );
        assert_eq!(resolved[3].1.property_type, PropertyType::EnumArray);
    }

    #[test]
    fn test_library_element_reference() {
        let (resolved, _) = resolve_inline(
            "import { Card as LibCard } from '@lib/design/cards';\ninterface Sample { cards: LibCard[]; }",
            &mut ConfigurationWrapper::default(),
        );
        assert_eq!(
            resolved[0].1,
            ResolvedType::element(PropertyType::ElementArray, "@lib/design/cards", "Card")
        );
    }

    #[test]
    fn test_cross_file_nested_expansion() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("item.ts"),
            r#"
export type Kind = 'a' | 'b';
export interface Item extends NestedConfiguration {
  label: string;
  kind: Kind;
}
export interface Other extends NestedConfiguration {
  count: number;
}
"#,
        )
        .unwrap();
        let sample_path = dir.path().join("sample.ts");
        fs::write(
            &sample_path,
            "import { Item } from './item';\ninterface Sample { items: Item[]; again: Item[]; }",
        )
        .unwrap();

        let session = Session::parse(&[sample_path.clone()]);
        let unit = session.get(&sample_path).unwrap();
        let mut wrapper = ConfigurationWrapper::default();
        let mut diags = Diagnostics::new(true);
        let resolved = resolve_sample(&session, unit, &mut wrapper, &mut diags);

        assert_eq!(
            resolved[0].1,
            ResolvedType::element(PropertyType::ElementArray, LIBRARY, "Item")
        );
        assert_eq!(resolved[1].1, resolved[0].1);
        let names: Vec<&str> = wrapper
            .nested_configuration
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(names, vec!["Item", "Other"]);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_mutually_referencing_nested_terminates() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.ts"),
            "import { B } from './b';\nexport interface A extends NestedConfiguration { bs: B[]; }",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.ts"),
            "import { A } from './a';\nexport interface B extends NestedConfiguration { owners: A[]; }",
        )
        .unwrap();
        let sample_path = dir.path().join("sample.ts");
        fs::write(
            &sample_path,
            "import { A } from './a';\ninterface Sample { list: A[]; }",
        )
        .unwrap();

        let session = Session::parse(&[sample_path.clone()]);
        let unit = session.get(&sample_path).unwrap();
        let mut wrapper = ConfigurationWrapper::default();
        let mut diags = Diagnostics::new(false);
        let resolved = resolve_sample(&session, unit, &mut wrapper, &mut diags);

        assert_eq!(resolved[0].1.property_type, PropertyType::ElementArray);
        let mut names: Vec<&str> = wrapper
            .nested_configuration
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
    }
}
