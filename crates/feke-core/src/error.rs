use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FekeError {
    // Config errors
    #[error("CONFIG_NOT_FOUND: {} not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Directory configuration errors
    #[error("DIRECTORY_INVALID: {role} directory '{}' does not exist or is not a directory", path.display())]
    DirectoryInvalid { role: &'static str, path: PathBuf },

    // Template errors
    #[error("TEMPLATE_ERROR: {0}")]
    Template(#[from] crate::template::TemplateError),

    // Cache errors
    #[error("CACHE_UNAVAILABLE: {0}")]
    Cache(#[from] crate::cache::CacheError),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<serde_json::Error> for FekeError {
    fn from(err: serde_json::Error) -> Self {
        FekeError::Generic(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, FekeError>;
