use crate::extractor::{DeclKind, RawDecl};
use crate::scanner::normalize;
use serde::Serialize;
use std::path::PathBuf;

/// Type suffixes that carry architectural meaning, in stripping order.
/// A name is stripped at most once; the first match wins.
const DOMAIN_SUFFIXES: [&str; 7] = [
    "Repository",
    "Service",
    "Handler",
    "Entity",
    "Port",
    "Adapter",
    "Repo",
];

/// Suffixes marking transport/config shapes that are never domain components.
const DTO_SUFFIXES: [&str; 7] = [
    "Request", "Response", "DTO", "Config", "Error", "Result", "Option",
];

/// Module names of storage drivers; structs under them are repository adapters.
const STORAGE_MODULES: [&str; 4] = ["postgres", "mysql", "mongo", "sqlite"];

/// Classified kind of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// A struct under the entity tree
    Entity,
    /// A trait (port contract)
    Interface,
    /// Any other struct
    Struct,
}

/// Architectural role a component plays within its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Entity,
    ServicePort,
    RepoPort,
    RepoAdapter,
    Handler,
}

/// One classified component.
///
/// `name` is the canonical domain name: suffix-stripped and lowercased,
/// never empty. `role` is `None` for structs that match no classification
/// signal; those are carried through unchanged but never attached to a
/// domain, which is existing behavior preserved deliberately.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentInfo {
    /// Canonical lowercase domain name
    pub name: String,
    /// Declared type name, exactly as written in source
    pub type_name: String,
    pub kind: ComponentKind,
    pub path: PathBuf,
    pub module: String,
    /// Always consistent with `kind == Interface`
    pub is_port: bool,
    pub is_adapter: bool,
    pub role: Option<Role>,
}

/// Strips the first matching domain suffix from a type name.
///
/// Idempotent over the suffix table: a stripped name no longer ends in any
/// suffix, so stripping again is a no-op.
pub fn strip_domain_suffix(name: &str) -> &str {
    for suffix in DOMAIN_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped;
        }
    }
    name
}

/// Derives the canonical domain name for a declared type.
pub fn domain_name(type_name: &str) -> String {
    strip_domain_suffix(type_name).to_ascii_lowercase()
}

/// Maps a raw declaration to a classified component.
///
/// Returns `None` for declarations that are not domain components at all:
/// DTO-like shapes, value objects, and names that are nothing but a suffix.
/// This is a pure function of `(name, path, module)`.
pub fn classify(decl: &RawDecl) -> Option<ComponentInfo> {
    let type_name = decl.name.as_str();

    if DTO_SUFFIXES.iter().any(|s| type_name.ends_with(s)) {
        return None;
    }

    let path = normalize(&decl.path);
    if has_segment(&path, "valueobject") {
        return None;
    }

    let name = domain_name(type_name);
    if name.is_empty() {
        return None;
    }

    let (kind, is_port, is_adapter, role) = match decl.kind {
        DeclKind::Trait => {
            let role = classify_port(type_name, &path);
            (ComponentKind::Interface, true, false, role)
        }
        DeclKind::Struct if has_segment(&path, "entity") => {
            (ComponentKind::Entity, false, false, Some(Role::Entity))
        }
        DeclKind::Struct => {
            let role = classify_adapter(&path, &decl.module);
            (ComponentKind::Struct, false, true, role)
        }
    };

    Some(ComponentInfo {
        name,
        type_name: type_name.to_string(),
        kind,
        path: decl.path.clone(),
        module: decl.module.clone(),
        is_port,
        is_adapter,
        role,
    })
}

/// Splits a trait into service port vs repository port by name/path signal.
fn classify_port(type_name: &str, path: &str) -> Option<Role> {
    if type_name.contains("Service") || path.contains("service") {
        return Some(Role::ServicePort);
    }
    if type_name.contains("Repository") || type_name.contains("Repo") || path.contains("repository")
    {
        return Some(Role::RepoPort);
    }
    None
}

/// Splits a concrete struct into handler vs repository adapter.
///
/// A struct matching neither signal stays `is_adapter = true` with no role
/// and will not populate any domain field.
fn classify_adapter(path: &str, module: &str) -> Option<Role> {
    if path.contains("handler") || module.contains("handler") {
        return Some(Role::Handler);
    }
    if path.contains("repository")
        || module.contains("repository")
        || STORAGE_MODULES
            .iter()
            .any(|m| module == *m || has_segment(path, m))
    {
        return Some(Role::RepoAdapter);
    }
    None
}

/// True if the normalized path contains `segment` as a whole path component.
fn has_segment(path: &str, segment: &str) -> bool {
    path.split('/').any(|part| part == segment)
}
