//! Shared parse session of one extraction run.
//!
//! Every manifest file is parsed once, in parallel, before extraction starts. After
//! construction the session is read-only and is shared by all per-file extractors.
//! It also answers the few type questions extraction needs without a type checker:
//! which string literals a named type stands for, and where a nested configuration
//! interface is declared.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use swc_ecma_ast::{Decl, TsEntityName, TsType, TsUnionOrIntersectionType};

use crate::core::{
    extract::{
        helpers::{string_enum_values, string_literal_type, top_level_decls, unwrap_ts_type},
        heritage::is_nested_configuration,
    },
    parsers::source::SourceUnit,
};

/// Alias chains longer than this are treated as unresolvable.
const MAX_ALIAS_DEPTH: usize = 8;

/// A file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Where a nested configuration interface is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedLocation {
    pub path: PathBuf,
    /// Declared name, which differs from the local name for aliased imports.
    pub name: String,
}

#[derive(Default)]
pub struct Session {
    units: BTreeMap<PathBuf, SourceUnit>,
    failures: Vec<ParseFailure>,
}

impl Session {
    /// Parse all files in parallel.
    pub fn parse(files: &[PathBuf]) -> Self {
        // Parallel file reading AND parsing (both I/O-bound and CPU-bound)
        let results: Vec<_> = files
            .par_iter()
            .map(|path| (path.clone(), SourceUnit::from_file(path)))
            .collect();

        // Sequential map construction
        let mut session = Self::default();
        for (path, result) in results {
            match result {
                Ok(unit) => {
                    session.units.insert(path, unit);
                }
                Err(e) => {
                    tracing::debug!("Failed to parse {}: {}", path.display(), e);
                    session.failures.push(ParseFailure {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        session.failures.sort_by(|a, b| a.path.cmp(&b.path));
        session
    }

    /// Session over already parsed units.
    pub fn from_units(units: impl IntoIterator<Item = SourceUnit>) -> Self {
        Self {
            units: units.into_iter().map(|u| (u.path.clone(), u)).collect(),
            failures: Vec::new(),
        }
    }

    /// Parsed units in path order.
    pub fn units(&self) -> impl ExactSizeIterator<Item = &SourceUnit> {
        self.units.values()
    }

    pub fn get(&self, path: &Path) -> Option<&SourceUnit> {
        self.units.get(path)
    }

    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    /// Run `f` on the unit of `path`, parsing the file on demand when it is not part
    /// of the session. `None` when the file cannot be read or parsed.
    pub fn with_unit<R>(&self, path: &Path, f: impl FnOnce(&SourceUnit) -> R) -> Option<R> {
        if let Some(unit) = self.units.get(path) {
            return Some(f(unit));
        }
        match SourceUnit::from_file(path) {
            Ok(unit) => Some(f(&unit)),
            Err(e) => {
                tracing::debug!("Cannot load {} on demand: {}", path.display(), e);
                None
            }
        }
    }

    /// String literal values a named type stands for.
    ///
    /// Follows type aliases (transitively, through unions of aliases) and string
    /// enums, in `unit` or in the file a relative import of `name` points to.
    pub fn string_union_choices(&self, unit: &SourceUnit, name: &str) -> Option<Vec<String>> {
        self.named_choices(unit, name, 0)
    }

    fn named_choices(&self, unit: &SourceUnit, name: &str, depth: usize) -> Option<Vec<String>> {
        if depth > MAX_ALIAS_DEPTH {
            return None;
        }
        for item in top_level_decls(&unit.module) {
            match item.decl {
                Decl::TsTypeAlias(alias) if alias.id.sym.as_str() == name => {
                    return self.type_choices(unit, &alias.type_ann, depth);
                }
                Decl::TsEnum(decl) if decl.id.sym.as_str() == name => {
                    return string_enum_values(decl);
                }
                _ => {}
            }
        }

        let import = unit.import_of(name)?;
        let path = unit.resolve_import(&import.module_path)?;
        let imported = import.imported_name.as_str();
        self.with_unit(&path, |other| self.named_choices(other, imported, depth + 1))
            .flatten()
    }

    fn type_choices(&self, unit: &SourceUnit, ty: &TsType, depth: usize) -> Option<Vec<String>> {
        match unwrap_ts_type(ty) {
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                let mut choices = Vec::new();
                for member in &union.types {
                    if let Some(value) = string_literal_type(member) {
                        choices.push(value);
                    } else {
                        choices.extend(self.type_choices(unit, member, depth + 1)?);
                    }
                }
                Some(choices)
            }
            TsType::TsTypeRef(type_ref) => match &type_ref.type_name {
                TsEntityName::Ident(ident) => self.named_choices(unit, ident.sym.as_str(), depth + 1),
                TsEntityName::TsQualifiedName(_) => None,
            },
            other => string_literal_type(other).map(|value| vec![value]),
        }
    }

    /// Declaring file and name of the nested configuration interface `name` refers to
    /// in `unit`, looking through one relative import.
    pub fn nested_declaration(&self, unit: &SourceUnit, name: &str) -> Option<NestedLocation> {
        if declares_nested(unit, name) {
            return Some(NestedLocation {
                path: unit.path.clone(),
                name: name.to_string(),
            });
        }

        let import = unit.import_of(name)?;
        let path = unit.resolve_import(&import.module_path)?;
        let declared = import.imported_name.clone();
        self.with_unit(&path, |other| declares_nested(other, &declared))
            .filter(|found| *found)
            .map(|_| NestedLocation {
                path,
                name: declared,
            })
    }
}

fn declares_nested(unit: &SourceUnit, name: &str) -> bool {
    top_level_decls(&unit.module).any(|item| {
        matches!(item.decl, Decl::TsInterface(decl)
            if decl.id.sym.as_str() == name && is_nested_configuration(decl))
    })
}
