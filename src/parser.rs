use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// A successfully parsed Rust source file with its syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

/// Parses a single Rust source file into an AST.
///
/// Reads the file fully into memory and parses it with `syn::parse_file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid Rust
/// syntax. Callers running discovery over a whole tree should prefer
/// [`parse_all`], which absorbs these errors.
pub fn parse_file(path: &Path) -> Result<ParsedFile> {
    debug!("Parsing file: {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let syntax_tree = syn::parse_file(&content)
        .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

    Ok(ParsedFile {
        path: path.to_path_buf(),
        syntax_tree,
    })
}

/// Parses a batch of source files, skipping the ones that fail.
///
/// Discovery runs over possibly-incomplete, hand-edited project trees, so a
/// file that fails to read or parse must not abort the scan: each failure is
/// logged as a warning and the remaining files are still processed.
pub fn parse_all(paths: &[PathBuf]) -> Vec<ParsedFile> {
    let mut parsed = Vec::with_capacity(paths.len());

    for path in paths {
        match parse_file(path) {
            Ok(file) => parsed.push(file),
            Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    debug!(
        "Parsed {} of {} files",
        parsed.len(),
        paths.len()
    );

    parsed
}
