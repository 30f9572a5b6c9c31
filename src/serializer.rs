//! Serialization module for writing enumeration reports.
//!
//! The CSV layout is rendered by [`crate::reporter`]; this module adds JSON and YAML
//! renderings of the same rows and the file writer shared by every format.

use crate::aggregator::ResultSet;
use crate::error::{Error, Result};
use crate::paths::trim_prefix;
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the result rows to pretty-printed JSON.
///
/// Each row carries the display controller key alongside the endpoint fields
/// (`method_name`, `route`, `http_methods`, `attributes`).
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(results: &ResultSet, prefix: &str) -> Result<String> {
    debug!("Serializing {} endpoints to JSON", results.endpoint_count());
    let rows = results.rows(|key| trim_prefix(key, prefix));
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Serializes the result rows to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(results: &ResultSet, prefix: &str) -> Result<String> {
    debug!("Serializing {} endpoints to YAML", results.endpoint_count());
    let rows = results.rows(|key| trim_prefix(key, prefix));
    Ok(serde_yaml::to_string(&rows)?)
}

/// Writes string content to a file.
///
/// The file is always created fresh: an existing file is truncated, never appended
/// to. Missing parent directories are created.
///
/// # Errors
///
/// Returns [`Error::Output`] if the directory or file cannot be created or written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| Error::Output {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
