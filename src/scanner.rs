use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Path-substring filters controlling which source files are scanned.
///
/// The defaults match the layout this tool scaffolds: only files under the
/// `core/` and `adapter/` trees hold domain components, while tool-internal
/// packages (generators, terminal UI, configuration, AI providers, caches)
/// are never part of the domain model. The lists are plain data so callers
/// with differently-shaped project skeletons can supply their own.
#[derive(Debug, Clone)]
pub struct ScanFilter {
    /// A file is considered only if its path contains one of these substrings
    pub allow: Vec<String>,
    /// A file is skipped if its path contains any of these substrings
    pub deny: Vec<String>,
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            allow: vec!["core/".to_string(), "adapter/".to_string()],
            deny: vec![
                "generator".to_string(),
                "tui".to_string(),
                "config".to_string(),
                "provider".to_string(),
                "cache".to_string(),
            ],
        }
    }
}

impl ScanFilter {
    /// Checks a normalized (forward-slash) path against both lists.
    fn accepts(&self, normalized: &str) -> bool {
        if self.deny.iter().any(|d| normalized.contains(d.as_str())) {
            return false;
        }
        self.allow.iter().any(|a| normalized.contains(a.as_str()))
    }
}

/// Recursive source-file scanner for project directories.
///
/// The `SourceScanner` walks a project tree and collects the Rust source
/// files that may declare domain components. It skips build output
/// (`target`), hidden directories, test directories, and `*_test.rs` files,
/// and applies the [`ScanFilter`] allow/deny lists on top of that.
///
/// # Example
///
/// ```no_run
/// use hexagen::scanner::{ScanFilter, SourceScanner};
/// use std::path::PathBuf;
///
/// let scanner = SourceScanner::new(PathBuf::from("./my-service/src"), ScanFilter::default());
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.files.len());
/// ```
pub struct SourceScanner {
    root_path: PathBuf,
    filter: ScanFilter,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Discovered source files, in directory-walk order
    pub files: Vec<PathBuf>,
    /// Warning messages for paths that could not be accessed
    pub warnings: Vec<String>,
}

impl SourceScanner {
    /// Creates a scanner rooted at `root_path` with the given filter.
    pub fn new(root_path: PathBuf, filter: ScanFilter) -> Self {
        Self { root_path, filter }
    }

    /// Creates the narrower entity-only scanner used by wiring generation.
    ///
    /// The root is the entity directory itself, so no allow/deny filtering
    /// applies; callers additionally require struct declarations when
    /// extracting from these files.
    pub fn entities(entity_dir: PathBuf) -> Self {
        Self {
            root_path: entity_dir,
            filter: ScanFilter {
                allow: vec![String::new()],
                deny: Vec::new(),
            },
        }
    }

    /// Walks the tree and collects matching `.rs` files.
    ///
    /// Inaccessible paths are recorded as warnings and the walk continues.
    /// A missing root yields an empty result rather than an error, since a
    /// project without the scanned subtree simply has nothing to discover.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut files = Vec::new();
        let mut warnings = Vec::new();

        if !self.root_path.exists() {
            return Ok(ScanResult { files, warnings });
        }

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";
                let is_test_dir = e.file_type().is_dir() && file_name == "tests";

                !is_hidden && !is_target && !is_test_dir
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && Self::is_source_file(path) {
                        let normalized = normalize(path);
                        if self.filter.accepts(&normalized) {
                            files.push(path.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult { files, warnings })
    }

    /// A `.rs` file that is not a test file by naming convention.
    fn is_source_file(path: &Path) -> bool {
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            return false;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        !name.ends_with("_test.rs")
    }
}

/// Renders a path with forward slashes for substring matching.
pub fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
