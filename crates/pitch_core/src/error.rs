use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration failures; the caller aborts loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Pitch file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid pitch entries in {}", path.display())]
    NoEntries { path: PathBuf },

    #[error("Invalid value for {key} on line {line}: '{value}'")]
    InvalidEnvValue {
        key: String,
        value: String,
        line: usize,
    },
}

/// Recoverable per-line pitch parse failures; the line's entry is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("Malformed number for {key}: '{value}'")]
    MalformedNumber { key: String, value: String },

    #[error("Malformed range marker for {key}: '{value}'")]
    MalformedRange { key: String, value: String },

    #[error("Malformed axis: '{0}'")]
    MalformedAxis(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Random field that cannot be sampled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Field {field} is random but has no complete range")]
    MissingRange { field: &'static str },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Pitch index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConfigError {
    pub fn is_missing_file(&self) -> bool {
        match self {
            ConfigError::NotFound { .. } => true,
            ConfigError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
