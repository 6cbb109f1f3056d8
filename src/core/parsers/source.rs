use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use swc_common::{
    BytePos, FileName, GLOBALS, Globals, SourceMap, SourceMapper, Span,
    comments::{Comment, CommentKind, SingleThreadedComments},
};
use swc_ecma_ast::{ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::error::{ExtractError, Result};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
/// Extracted during parsing and stored independently of swc types.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }
}

/// How a name is imported into a file.
///
/// ```typescript
/// import { MyConfig as Config } from './my.config';
/// // local_name: "Config", imported_name: "MyConfig", module_path: "./my.config"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    pub local_name: String,
    /// Original exported name, `default` for default imports and `*` for namespaces.
    pub imported_name: String,
    pub module_path: String,
}

/// One parsed TypeScript file.
pub struct SourceUnit {
    pub path: PathBuf,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
    pub imports: Vec<ImportInfo>,
}

impl SourceUnit {
    /// Read and parse a file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let code = std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        parse_source(code, path)
    }

    /// Source text of a node, the equivalent of `getText()`.
    pub fn text(&self, span: Span) -> String {
        self.source_map.span_to_snippet(span).unwrap_or_default()
    }

    /// Body of the JSDoc block (`/** ... */`) directly attached to the node starting at `pos`.
    pub fn doc_comment(&self, pos: BytePos) -> Option<&str> {
        self.comments
            .leading
            .get(&pos)?
            .iter()
            .rev()
            .find(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
            .map(|c| c.text.as_str())
    }

    pub fn import_of(&self, local_name: &str) -> Option<&ImportInfo> {
        self.imports.iter().find(|i| i.local_name == local_name)
    }

    /// Resolve a relative module specifier against this file.
    pub fn resolve_import(&self, module_path: &str) -> Option<PathBuf> {
        resolve_import_path(&self.path, module_path)
    }
}

/// Parse TypeScript source code into a [`SourceUnit`].
///
/// Each unit owns its own `SourceMap`, so files can be parsed from several threads.
/// `.tsx` files are parsed with JSX enabled; decorators are always enabled.
pub fn parse_source(code: String, path: &Path) -> Result<SourceUnit> {
    let source_map: Arc<SourceMap> = Default::default();

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(path.to_path_buf()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: path.extension().is_some_and(|ext| ext == "tsx"),
            decorators: true,
            ..Default::default()
        });

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), Some(&comments));

        let module = parser.parse_module().map_err(|e| ExtractError::Parse {
            path: path.to_path_buf(),
            reason: format!("{:?}", e.kind()),
        })?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);
        let imports = collect_imports(&module);

        Ok(SourceUnit {
            path: path.to_path_buf(),
            module,
            source_map: source_map.clone(),
            comments: extracted_comments,
            imports,
        })
    })
}

fn collect_imports(module: &Module) -> Vec<ImportInfo> {
    let mut imports = Vec::new();
    for item in &module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(node)) = item else {
            continue;
        };
        let module_path = node.src.value.to_string_lossy().to_string();
        for specifier in &node.specifiers {
            let (local_name, imported_name) = match specifier {
                ImportSpecifier::Named(named) => {
                    let local_name = named.local.sym.to_string();
                    let imported_name = named
                        .imported
                        .as_ref()
                        .map(|i| match i {
                            ModuleExportName::Ident(ident) => ident.sym.to_string(),
                            ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
                        })
                        .unwrap_or_else(|| local_name.clone());
                    (local_name, imported_name)
                }
                ImportSpecifier::Default(default) => {
                    (default.local.sym.to_string(), "default".to_string())
                }
                ImportSpecifier::Namespace(ns) => (ns.local.sym.to_string(), "*".to_string()),
            };
            imports.push(ImportInfo {
                local_name,
                imported_name,
                module_path: module_path.clone(),
            });
        }
    }
    imports
}

/// Resolve a relative import to a file path.
///
/// Tries `.ts`, `.tsx` then `index.ts`/`index.tsx`. When nothing exists on disk the
/// speculative `.ts` path is returned so lookups keyed by path still line up.
/// Returns `None` for package imports.
pub fn resolve_import_path(current_file: &Path, import_path: &str) -> Option<PathBuf> {
    if !import_path.starts_with('.') {
        return None;
    }

    let base_dir = current_file.parent()?;
    let resolved = normalize_path(&base_dir.join(import_path));

    for ext in ["ts", "tsx"] {
        let with_ext = append_extension(&resolved, ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }

    for ext in ["ts", "tsx"] {
        let index_path = resolved.join(format!("index.{}", ext));
        if index_path.is_file() {
            return Some(index_path);
        }
    }

    Some(append_extension(&resolved, "ts"))
}

/// `./a.config` + `ts` gives `./a.config.ts` (`with_extension` would replace `.config`).
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}

/// Lexically remove `.` and `..` components.
pub fn normalize_path(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path as a string with `/` separators on every platform.
pub fn to_slash_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::core::parsers::source::*;

    #[test]
    fn test_parse_collects_imports() {
        let code = r#"
import { MyConfig as Config, OTHER } from './my.config';
import Default from '@lib/a';
import * as ns from './ns';
"#;
        let unit = parse_source(code.to_string(), Path::new("/project/src/a.ts")).unwrap();
        assert_eq!(unit.imports.len(), 4);

        let config = unit.import_of("Config").unwrap();
        assert_eq!(config.imported_name, "MyConfig");
        assert_eq!(config.module_path, "./my.config");
        assert_eq!(unit.import_of("Default").unwrap().imported_name, "default");
        assert_eq!(unit.import_of("ns").unwrap().imported_name, "*");
    }

    #[test]
    fn test_doc_comment_attaches_to_export() {
        let code = r#"
/**
 * My configuration
 */
export interface MyConfig extends Configuration {
  /** The flag */
  flag: boolean;
}
"#;
        let unit = parse_source(code.to_string(), Path::new("/project/src/a.ts")).unwrap();
        let ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) = &unit.module.body[0] else {
            panic!("expected an export declaration");
        };
        assert!(unit.doc_comment(export.span.lo).unwrap().contains("My configuration"));

        let swc_ecma_ast::Decl::TsInterface(interface) = &export.decl else {
            panic!("expected an interface");
        };
        let swc_ecma_ast::TsTypeElement::TsPropertySignature(prop) = &interface.body.body[0] else {
            panic!("expected a property");
        };
        assert_eq!(unit.doc_comment(prop.span.lo), Some("* The flag "));
    }

    #[test]
    fn test_parse_decorators() {
        let code = r#"
@Component({ selector: 'o3r-test' })
export class TestComponent {}
"#;
        assert!(parse_source(code.to_string(), Path::new("/project/src/a.ts")).is_ok());
    }

    #[test]
    fn test_parse_error_names_file() {
        let result = parse_source("interface {".to_string(), Path::new("/project/broken.ts"));
        assert!(matches!(result, Err(ExtractError::Parse { path, .. }) if path == Path::new("/project/broken.ts")));
    }

    #[test]
    fn test_text_reads_snippet() {
        let unit = parse_source("const a = foo.bar;".to_string(), Path::new("/p/a.ts")).unwrap();
        assert_eq!(unit.text(unit.module.span), "const a = foo.bar;");
    }

    #[test]
    fn test_resolve_import_path() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("my.config.ts"), "").unwrap();
        fs::write(src.join("nested/index.ts"), "").unwrap();
        let current = src.join("component.ts");

        assert_eq!(
            resolve_import_path(&current, "./my.config"),
            Some(src.join("my.config.ts"))
        );
        assert_eq!(
            resolve_import_path(&current, "./nested"),
            Some(src.join("nested/index.ts"))
        );
        assert_eq!(
            resolve_import_path(&current, "../missing"),
            Some(dir.path().join("missing.ts"))
        );
        assert_eq!(resolve_import_path(&current, "@lib/a"), None);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./c/../d")),
            PathBuf::from("/a/b/d")
        );
    }
}
