//! MVC Enumerator - command-line tool listing ASP.NET controller entry points.
//!
//! Scans a directory of C# sources, finds controller classes and writes every public
//! action with its route, HTTP verbs and attributes to a CSV (or JSON/YAML) report.
//!
//! # Usage
//!
//! ```bash
//! mvc-enumerator -d <DIR> [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Enumerate every action:
//! ```bash
//! mvc-enumerator -d ./MyWebApp -o actions.csv
//! ```
//!
//! List actions that are not protected by `[Authorize]`:
//! ```bash
//! mvc-enumerator -d ./MyWebApp -n Authorize
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! mvc-enumerator -d ./MyWebApp -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use mvc_enumerator::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("MVC Enumerator starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Enumeration completed successfully");

    Ok(())
}
