//! MVC Enumerator - Static discovery of ASP.NET controller entry points.
//!
//! This library scans C# source trees for web-framework controller classes and
//! reports the HTTP entry points they expose, with route templates, verbs and
//! attributes, optionally filtered by attribute presence or absence.
//!
//! # Supported Frameworks
//!
//! - **ASP.NET MVC**: classes deriving from `Controller` / `AsyncController`
//! - **ASP.NET Web API**: classes deriving from `ApiController`
//! - **ASP.NET Core**: classes deriving from `Controller` / `ControllerBase`
//!
//! Controller detection is syntactic: only the base types written on the class
//! itself are compared. Deriving through a local intermediate base class is only
//! recognised with [`config::ScanConfig::resolve_inheritance`].
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively collects `.cs` files
//! 2. [`parser`] - Parses C# into the [`model`] declarations with tree-sitter
//! 3. [`classifier`] - Decides which classes are controllers
//! 4. [`extractor`] - Derives verbs, routes and attributes per action
//! 5. [`filter`] - Applies the attribute include/exclude filters
//! 6. [`aggregator`] - Groups endpoints by source file
//! 7. [`paths`] - Computes the common path prefix for display
//! 8. [`reporter`] / [`serializer`] - Console, CSV, JSON and YAML output
//!
//! [`engine`] ties steps 3 to 6 together.
//!
//! # Example Usage
//!
//! ```no_run
//! use mvc_enumerator::{
//!     config::ScanConfig,
//!     engine::enumerate,
//!     parser::CSharpParser,
//!     paths::common_prefix,
//!     reporter::render_csv,
//!     scanner::FileScanner,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./MyWebApp")).scan().unwrap();
//!
//! let mut parser = CSharpParser::new().unwrap();
//! let units: Vec<_> = parser
//!     .parse_files(&scan_result.source_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let results = enumerate(&units, &ScanConfig::default());
//! let prefix = common_prefix(&results.keys());
//! println!("{}", render_csv(&results, &prefix));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod model;
pub mod parser;
pub mod paths;
pub mod reporter;
pub mod scanner;
pub mod serializer;
