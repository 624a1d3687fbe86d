//! Error handling for the ATS analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AtsError>;

/// Pattern compilation failures surface as processing errors
impl From<regex::Error> for AtsError {
    fn from(err: regex::Error) -> Self {
        AtsError::Processing(format!("Failed to compile pattern: {}", err))
    }
}

impl From<aho_corasick::BuildError> for AtsError {
    fn from(err: aho_corasick::BuildError) -> Self {
        AtsError::Processing(format!("Failed to build phrase matcher: {}", err))
    }
}

impl From<toml::de::Error> for AtsError {
    fn from(err: toml::de::Error) -> Self {
        AtsError::Configuration(format!("Failed to parse TOML: {}", err))
    }
}
