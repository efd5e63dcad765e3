use anyhow::{bail, Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Reads the crate name from a project's `Cargo.toml`.
///
/// Wiring generation cannot proceed without the crate name: the generated
/// binary imports the project's own modules through it. A missing manifest
/// or a manifest without `[package] name` is therefore a hard error, not a
/// defaultable condition.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, is not valid TOML, or
/// has no `package.name` entry.
pub fn crate_name(project_dir: &Path) -> Result<String> {
    let manifest_path = project_dir.join("Cargo.toml");
    let content = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;

    let manifest: toml::Value = content
        .parse()
        .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))?;

    let Some(name) = manifest
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
    else {
        bail!(
            "Manifest {} has no [package] name; wiring needs it for import paths",
            manifest_path.display()
        );
    };

    debug!("Detected crate name: {}", name);
    Ok(name.to_string())
}

/// The crate name as it appears in `use` paths: hyphens become underscores.
pub fn import_ident(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
