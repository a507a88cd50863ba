//! Error types for the read-aloud engine

use std::io;
use thiserror::Error;

/// Main error type for the read-aloud engine
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Document error: {0}")]
    Document(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("AI service error: {0}")]
    Service(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for read-aloud operations
pub type Result<T> = std::result::Result<T, ReaderError>;

impl From<String> for ReaderError {
    fn from(s: String) -> Self {
        ReaderError::Other(s)
    }
}

impl From<&str> for ReaderError {
    fn from(s: &str) -> Self {
        ReaderError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for ReaderError {
    fn from(e: serde_json::Error) -> Self {
        ReaderError::Document(format!("JSON error: {}", e))
    }
}
