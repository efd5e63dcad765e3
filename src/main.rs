//! hexagen - scaffolding analyzer for Clean-Architecture Rust services.
//!
//! This binary discovers domain components (entities, ports, adapters,
//! handlers) in an existing project tree and regenerates the artifacts that
//! depend on all of them at once: the dependency-wiring composition root and
//! the architecture diagram.
//!
//! # Usage
//!
//! ```bash
//! hexagen <COMMAND> [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Summarize the discovered domains:
//! ```bash
//! hexagen scan -p ./my-service
//! ```
//!
//! Regenerate the wiring binary:
//! ```bash
//! hexagen wire -p ./my-service
//! ```
//!
//! Render an architecture diagram:
//! ```bash
//! hexagen diagram -p ./my-service -f both -d all
//! ```

mod aggregator;
mod backend;
mod classifier;
mod cli;
mod diagram;
mod extractor;
mod manifest;
mod naming;
mod parser;
mod scanner;
mod wiring;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once to pick up the verbose flag, initialize logging, then
    // validate with the logger in place so warnings are visible.
    let parsed = cli::CliArgs::parse();

    let log_level = if parsed.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let args = cli::validate(parsed)?;

    cli::run(args)?;

    info!("Done");

    Ok(())
}
