use crate::aggregator::ResultSet;
use crate::config::ScanConfig;
use crate::engine::enumerate;
use crate::error::Error;
use crate::model::SourceUnit;
use crate::parser::CSharpParser;
use crate::paths::common_prefix;
use crate::reporter::{render_console, render_csv};
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// MVC Enumerator - List the HTTP entry points of ASP.NET controllers in a C# source tree
#[derive(Parser, Debug)]
#[command(name = "mvc-enumerator")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory to scan
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: PathBuf,

    /// Report file (defaults to enumerated_controllers_<timestamp>.<format>)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Only return controller methods set with the specified attribute
    #[arg(short = 'a', long = "attribute", value_name = "NAME")]
    pub attribute: Option<String>,

    /// Only return controller methods not set with the specified attribute
    #[arg(short = 'n', long = "negative", value_name = "NAME")]
    pub negative: Option<String>,

    /// Controller base type name; repeat to replace the built-in set
    #[arg(short = 'b', long = "base-type", value_name = "NAME")]
    pub base_types: Vec<String>,

    /// Also detect controllers deriving from controller bases defined in the scanned sources
    #[arg(long = "resolve-inheritance")]
    pub resolve_inheritance: bool,

    /// Report format
    #[arg(short = 'f', long = "format", value_enum, default_value = "csv")]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma separated values
    Csv,
    /// JSON array of rows
    Json,
    /// YAML sequence of rows
    Yaml,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl CliArgs {
    /// Core scan settings selected by the arguments.
    pub fn to_config(&self) -> ScanConfig {
        let mut config = ScanConfig {
            include_attribute: self.attribute.clone(),
            exclude_attribute: self.negative.clone(),
            resolve_inheritance: self.resolve_inheritance,
            ..ScanConfig::default()
        };
        if !self.base_types.is_empty() {
            config.base_type_names = self.base_types.clone();
        }
        config
    }

    /// Report path, falling back to a timestamped name in the working directory.
    pub fn report_path(&self) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| {
            let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
            PathBuf::from(format!(
                "enumerated_controllers_{}.{}",
                timestamp,
                self.output_format.extension()
            ))
        })
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.directory.exists() {
        return Err(Error::InvalidInput(format!(
            "directory does not exist: {}",
            args.directory.display()
        ))
        .into());
    }

    if !args.directory.is_dir() {
        return Err(Error::InvalidInput(format!(
            "not a directory: {}",
            args.directory.display()
        ))
        .into());
    }

    info!("Directory: {}", args.directory.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref attribute) = args.attribute {
        info!("Attribute filter: {}", attribute);
    }
    if let Some(ref negative) = args.negative {
        info!("Negative attribute filter: {}", negative);
    }
    if !args.base_types.is_empty() {
        info!("Controller base types: {}", args.base_types.join(", "));
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let config = args.to_config();

    // Steps 1-2: Scan directory for C# files and parse them
    let (file_count, units) = parse_directory(&args.directory)?;

    // Step 3: Classify, extract, filter and aggregate
    let results = enumerate(&units, &config);
    info!(
        "Found {} entry points in {} controller files",
        results.endpoint_count(),
        results.len()
    );

    // Step 4: Shorten controller paths for display
    let prefix = common_prefix(&results.keys());
    debug!("Common path prefix: {}", prefix);

    if results.is_empty() {
        println!("No Entrypoints with the specified search parameters found.");
    } else if config.has_filter() {
        print!("{}", render_console(&results, &prefix));
    }

    // Step 5: Write the report
    let content = match args.output_format {
        OutputFormat::Csv => render_csv(&results, &prefix),
        OutputFormat::Json => serialize_json(&results, &prefix)?,
        OutputFormat::Yaml => serialize_yaml(&results, &prefix)?,
    };
    let report_path = args.report_path();
    write_to_file(&content, &report_path)?;
    println!(
        "{} output written to: {}",
        args.output_format.extension().to_uppercase(),
        report_path.display()
    );

    info!("Summary:");
    info!("  - Files scanned: {}", file_count);
    info!("  - Files parsed: {}", units.len());
    info!("  - Controllers: {}", results.len());
    info!("  - Entry points: {}", results.endpoint_count());

    Ok(())
}

/// Scans `directory` with `config` and returns the aggregated results.
///
/// Files that fail to parse are skipped.
pub fn scan_directory(directory: &Path, config: &ScanConfig) -> Result<ResultSet> {
    let (_, units) = parse_directory(directory)?;
    Ok(enumerate(&units, config))
}

/// Collects and parses every C# file under `directory`.
///
/// Returns the number of files found together with the units that parsed.
fn parse_directory(directory: &Path) -> Result<(usize, Vec<SourceUnit>)> {
    info!("Scanning {}...", directory.display());
    let scanner = FileScanner::new(directory.to_path_buf());
    let scan_result = scanner.scan()?;

    info!("Found {} C# files", scan_result.source_files.len());
    if scan_result.source_files.is_empty() {
        return Err(Error::NoSourceFiles(directory.to_path_buf()).into());
    }

    let mut parser = CSharpParser::new()?;
    let units: Vec<SourceUnit> = parser
        .parse_files(&scan_result.source_files)
        .into_iter()
        .filter_map(|result| result.ok())
        .collect();
    info!("Successfully parsed {} files", units.len());

    Ok((scan_result.source_files.len(), units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(dir: &Path, extra: &[&str]) -> CliArgs {
        let mut argv = vec!["mvc-enumerator", "-d", dir.to_str().unwrap()];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_flags() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(
            temp_dir.path(),
            &["-a", "Authorize", "-n", "AllowAnonymous", "-b", "BaseController", "-b", "Controller", "-f", "json"],
        );

        let config = args.to_config();
        assert_eq!(config.include_attribute.as_deref(), Some("Authorize"));
        assert_eq!(config.exclude_attribute.as_deref(), Some("AllowAnonymous"));
        assert_eq!(config.base_type_names, vec!["BaseController", "Controller"]);
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_directory_is_required() {
        assert!(CliArgs::try_parse_from(["mvc-enumerator"]).is_err());
    }

    #[test]
    fn test_default_report_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = args(temp_dir.path(), &[]).report_path();
        let name = path.to_string_lossy().to_string();

        assert!(name.starts_with("enumerated_controllers_"));
        assert!(name.ends_with(".csv"));
        // enumerated_controllers_ + yyyyMMddHHmmss + .csv
        assert_eq!(name.len(), "enumerated_controllers_".len() + 14 + ".csv".len());
    }

    #[test]
    fn test_validation_rejects_missing_and_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("File.cs");
        fs::write(&file, "").unwrap();

        assert!(parse_args_from_parsed(args(&file, &[])).is_err());
        assert!(parse_args_from_parsed(args(&temp_dir.path().join("missing"), &[])).is_err());
        assert!(parse_args_from_parsed(args(temp_dir.path(), &[])).is_ok());
    }

    #[test]
    fn test_run_without_source_files_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.csv");
        let out_arg = output.to_str().unwrap().to_string();

        let err = run(args(temp_dir.path(), &["-o", &out_arg])).unwrap_err();

        assert!(err.to_string().contains("No C# source files"));
        assert!(!output.exists());
    }
}
