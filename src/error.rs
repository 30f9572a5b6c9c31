use std::path::PathBuf;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    /// A source file could not be read
    Read { file: PathBuf, source: std::io::Error },
    /// A source file could not be turned into declarations
    ParseError { file: PathBuf, message: String },
    /// The C# grammar could not be loaded
    Grammar(String),
    InvalidInput(String),
    NoSourceFiles(PathBuf),
    /// The report file could not be created or written
    Output { path: PathBuf, source: std::io::Error },
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Read { file, source } => {
                write!(f, "Unable to read {}: {}", file.display(), source)
            }
            Error::ParseError { file, message } => {
                write!(f, "Unable to parse {}: {}", file.display(), message)
            }
            Error::Grammar(msg) => write!(f, "Unable to load C# grammar: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid path: {}", msg),
            Error::NoSourceFiles(root) => {
                write!(f, "No C# source files found under {}", root.display())
            }
            Error::Output { path, source } => {
                write!(f, "Unable to write report to {}: {}", path.display(), source)
            }
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { source, .. } | Error::Output { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization failed: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization failed: {}", err))
    }
}

impl From<tree_sitter::LanguageError> for Error {
    fn from(err: tree_sitter::LanguageError) -> Self {
        Error::Grammar(err.to_string())
    }
}
