use anyhow::{Context, Result};
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Build output directories that never contain hand-written sources.
const SKIPPED_DIRECTORIES: &[&str] = &["bin", "obj"];

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a directory to find all C# source files.
/// It automatically skips build output directories (`bin`, `obj`) and hidden
/// directories (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use mvc_enumerator::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./MyWebApp"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} C# files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered C# files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths to all discovered `.cs` files, sorted
    pub source_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.cs` files.
    ///
    /// The extension match ignores case. If any directories or files below the root
    /// cannot be accessed, warnings are logged and added to the result, but scanning
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory itself cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::read_dir(&self.root_path)
            .with_context(|| format!("Failed to read directory: {}", self.root_path.display()))?;

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| e.path() == self.root_path || !Self::is_skipped(e.path()))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file() && Self::is_source_file(path) {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        source_files.sort();

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }

    fn is_skipped(path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        let is_hidden = name.starts_with('.');
        let is_build_output = path.is_dir() && SKIPPED_DIRECTORIES.contains(&&*name);

        is_hidden || is_build_output
    }

    fn is_source_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
    }
}
