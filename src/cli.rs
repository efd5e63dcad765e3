use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregator::{aggregate, DomainInfo};
use crate::backend::detect_backend;
use crate::classifier::classify;
use crate::diagram::DiagramSynthesizer;
use crate::extractor::extract_declarations;
use crate::manifest;
use crate::parser::parse_all;
use crate::scanner::{ScanFilter, SourceScanner};
use crate::wiring::{discover_entity_domains, WiringSynthesizer};

/// hexagen - discovers domain components in Clean-Architecture Rust services
/// and generates dependency wiring and architecture diagrams
#[derive(Parser, Debug)]
#[command(name = "hexagen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover domain components and print a summary
    Scan {
        /// Path to the project directory
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Emit the discovered domains as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate the application entry point and dependency wiring
    Wire {
        /// Path to the project directory
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output directory for the generated binary, relative to the project
        #[arg(short, long, default_value = "src/bin/api")]
        output: PathBuf,

        /// Default HTTP port baked into the generated entry point
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Render architecture diagrams from the discovered components
    Diagram {
        /// Path to the project directory
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Diagram format
        #[arg(short, long, value_enum, default_value = "mermaid")]
        format: DiagramFormat,

        /// Detail level
        #[arg(short, long, value_enum, default_value = "all")]
        detail: DiagramDetail,

        /// Write the diagram to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Diagram output formats
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DiagramFormat {
    /// Mermaid graph description, fenced for markdown
    Mermaid,
    /// Box-drawing ASCII rendering with a domain legend
    Ascii,
    /// Mermaid first, then ASCII
    Both,
}

/// Diagram detail levels
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DiagramDetail {
    /// Full layered diagram, one node per component
    All,
    /// One node per domain fanning out to its components
    Domain,
    /// Fixed generic layer diagram
    Layers,
    /// Static diagram of this tool's own pipeline
    Dependencies,
}

/// Validates already-parsed arguments.
pub fn validate(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    let project = match &args.command {
        Command::Scan { project, .. } => project,
        Command::Wire { project, .. } => project,
        Command::Diagram { project, .. } => project,
    };

    if !project.exists() {
        anyhow::bail!("Project path does not exist: {}", project.display());
    }
    if !project.is_dir() {
        anyhow::bail!("Project path is not a directory: {}", project.display());
    }

    Ok(args)
}

/// Runs the full discovery pipeline over a project's `src` tree.
pub fn discover(project: &Path) -> Result<Vec<DomainInfo>> {
    info!("Scanning {}", project.display());
    let scanner = SourceScanner::new(project.join("src"), ScanFilter::default());
    let scan = scanner.scan()?;
    info!("Found {} source files", scan.files.len());

    let parsed = parse_all(&scan.files);
    let decls = extract_declarations(&parsed);
    let components = decls.iter().filter_map(classify).collect();
    let domains = aggregate(components);

    info!("Discovered {} domain(s)", domains.len());
    Ok(domains)
}

/// Dispatches a validated command.
pub fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Scan { project, json } => run_scan(&project, json),
        Command::Wire {
            project,
            output,
            port,
        } => run_wire(&project, &output, port),
        Command::Diagram {
            project,
            format,
            detail,
            output,
        } => run_diagram(&project, format, detail, output.as_deref()),
    }
}

fn run_scan(project: &Path, json: bool) -> Result<()> {
    let domains = discover(project)?;

    if json {
        let rendered = serde_json::to_string_pretty(&domains)
            .context("Failed to serialize discovered domains")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Discovered {} domain(s):", domains.len());
    for domain in &domains {
        println!("  - {}: {}", domain.name, domain.present_kinds().join(", "));
    }
    Ok(())
}

fn run_wire(project: &Path, output: &Path, port: u16) -> Result<()> {
    // All preconditions resolve before anything is written: a missing
    // manifest aborts with no partial output.
    let crate_name = manifest::crate_name(project)?;
    let crate_ident = manifest::import_ident(&crate_name);
    let backend = detect_backend(project);
    info!("Wiring crate {} against {}", crate_name, backend);

    let domains = discover_entity_domains(project)?;
    if domains.is_empty() {
        log::warn!("No entities found; generating wiring with an empty route set");
    }

    let out_dir = if output.is_absolute() {
        output.to_path_buf()
    } else {
        project.join(output)
    };

    let synthesizer = WiringSynthesizer::new(domains, crate_ident, backend, port);
    let artifacts = synthesizer.write_artifacts(&out_dir)?;

    println!("Generated {}", artifacts.main_rs.display());
    println!("Generated {}", artifacts.wiring_rs.display());
    Ok(())
}

fn run_diagram(
    project: &Path,
    format: DiagramFormat,
    detail: DiagramDetail,
    output: Option<&Path>,
) -> Result<()> {
    let domains = discover(project)?;
    let rendered = DiagramSynthesizer::new(domains).render(format, detail);

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write diagram: {}", path.display()))?;
            println!("Wrote diagram to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_tree(root: &Path, files: &[(&str, &str)]) {
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }
    }

    #[test]
    fn test_discover_groups_components_by_domain() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(
            temp_dir.path(),
            &[
                ("src/core/entity/order.rs", "pub struct Order { pub id: u64 }"),
                (
                    "src/core/port/order_repo.rs",
                    "pub trait OrderRepository {}",
                ),
                (
                    "src/adapter/handler/http/order_handler.rs",
                    "pub struct OrderHandler;",
                ),
            ],
        );

        let domains = discover(temp_dir.path()).unwrap();

        assert_eq!(domains.len(), 1);
        let order = &domains[0];
        assert_eq!(order.name, "order");
        assert!(order.entity.is_some());
        assert!(order.repo_port.is_some());
        assert!(order.handler.is_some());
        assert!(order.service_port.is_none());
        assert!(order.repo_adapter.is_none());
    }

    #[test]
    fn test_discover_survives_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(
            temp_dir.path(),
            &[
                ("src/core/entity/order.rs", "pub struct Order;"),
                ("src/core/entity/broken.rs", "pub struct Broken {"),
            ],
        );

        let domains = discover(temp_dir.path()).unwrap();
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].name, "order");
    }

    #[test]
    fn test_discover_empty_project() {
        let temp_dir = TempDir::new().unwrap();
        let domains = discover(temp_dir.path()).unwrap();
        assert!(domains.is_empty());
    }

    #[test]
    fn test_validate_rejects_missing_project() {
        let args = CliArgs {
            command: Command::Scan {
                project: PathBuf::from("/nonexistent/project"),
                json: false,
            },
            verbose: false,
        };

        assert!(validate(args).is_err());
    }

    #[test]
    fn test_validate_accepts_existing_project() {
        let temp_dir = TempDir::new().unwrap();
        let args = CliArgs {
            command: Command::Scan {
                project: temp_dir.path().to_path_buf(),
                json: false,
            },
            verbose: false,
        };

        assert!(validate(args).is_ok());
    }

    #[test]
    fn test_discovered_domains_serialize_to_json() {
        let temp_dir = TempDir::new().unwrap();
        write_tree(
            temp_dir.path(),
            &[("src/core/entity/order.rs", "pub struct Order;")],
        );

        let domains = discover(temp_dir.path()).unwrap();
        let json = serde_json::to_string_pretty(&domains).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["name"], "order");
        assert_eq!(parsed[0]["entity"]["type_name"], "Order");
    }
}
