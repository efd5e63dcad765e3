use crate::parser::ParsedFile;
use log::debug;
use std::path::PathBuf;
use syn::Item;

/// Declaration kind as it appears in source, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// A `struct` declaration (entity, adapter, or handler candidate)
    Struct,
    /// A `trait` declaration (port candidate)
    Trait,
}

/// One raw type declaration found in a source file.
///
/// This is the language-neutral tuple the classifier operates on: nothing
/// here depends on the syntax tree anymore, only on names and paths.
#[derive(Debug, Clone)]
pub struct RawDecl {
    /// Declared type name, exactly as written
    pub name: String,
    /// Struct or trait
    pub kind: DeclKind,
    /// Source file the declaration was found in
    pub path: PathBuf,
    /// Declaring module, taken from the file's parent directory
    pub module: String,
}

/// Extracts all struct and trait declarations from parsed files.
///
/// Declarations inside inline `mod` blocks are included and attributed to
/// the same file-level module. Enums, type aliases, functions and impls are
/// not domain components and are ignored. No deduplication happens here;
/// the aggregation stage resolves duplicates.
pub fn extract_declarations(parsed_files: &[ParsedFile]) -> Vec<RawDecl> {
    let mut decls = Vec::new();

    for file in parsed_files {
        let module = module_of(file);
        collect_items(&file.syntax_tree.items, file, &module, &mut decls);
    }

    debug!(
        "Extracted {} declarations from {} files",
        decls.len(),
        parsed_files.len()
    );

    decls
}

fn collect_items(items: &[Item], file: &ParsedFile, module: &str, out: &mut Vec<RawDecl>) {
    for item in items {
        match item {
            Item::Struct(s) => out.push(RawDecl {
                name: s.ident.to_string(),
                kind: DeclKind::Struct,
                path: file.path.clone(),
                module: module.to_string(),
            }),
            Item::Trait(t) => out.push(RawDecl {
                name: t.ident.to_string(),
                kind: DeclKind::Trait,
                path: file.path.clone(),
                module: module.to_string(),
            }),
            Item::Mod(m) => {
                if let Some((_, nested)) = &m.content {
                    collect_items(nested, file, module, out);
                }
            }
            _ => {}
        }
    }
}

/// Declaring module name: the parent directory of the source file.
///
/// `mod.rs` files take the directory they name; anything unresolvable falls
/// back to the empty string, which no classification rule matches.
fn module_of(file: &ParsedFile) -> String {
    file.path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
