//! Error types for the expression engine
//!
//! The completion core never fails: absent blocks, anchors and matches are
//! ordinary `None`/empty results. Errors only surface at the edges where
//! files are read, payloads are parsed, or commands are routed to fields.

use std::fmt;

/// Errors raised outside the pure completion pipeline
#[derive(Debug)]
pub enum EngineError {
    /// IO error while reading a config or schema file
    IoError(std::io::Error),
    /// Configuration could not be parsed or is invalid
    Config(String),
    /// Schema or context payload is not usable JSON
    Schema(String),
    /// Serialization error
    SerdeError(String),
    /// No field registered under this id
    UnknownField(String),
    /// An insertion was requested but no field has reported focus
    NoFocusedField,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::IoError(e) => write!(f, "IO error: {}", e),
            EngineError::Config(msg) => write!(f, "Configuration error: {}", msg),
            EngineError::Schema(msg) => write!(f, "Schema error: {}", msg),
            EngineError::SerdeError(msg) => write!(f, "Serialization error: {}", msg),
            EngineError::UnknownField(id) => write!(f, "Unknown field: {}", id),
            EngineError::NoFocusedField => write!(f, "No field has focus"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::IoError(e)
    }
}

/// Result type for engine edge operations
pub type EngineResult<T> = Result<T, EngineError>;
