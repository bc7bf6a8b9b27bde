//! Error types for apiary_io.
//!
//! Covers record export and import, ledger persistence and species data
//! files.

use apiary_core::GeneticsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Rkyv error: {0}")]
    Rkyv(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Input that parsed but makes no sense
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Registry rejected the loaded data
    #[error("Genetics error: {0}")]
    Genetics(#[from] GeneticsError),

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn rkyv<S: Into<String>>(msg: S) -> Self {
        Self::Rkyv(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::validation("empty species list");
        assert_eq!(err.to_string(), "Validation error: empty species list");
    }

    #[test]
    fn test_error_context() {
        let err = IoError::not_found("species.toml").with_context("loading species data");
        assert!(err.to_string().starts_with("loading species data"));
        assert!(err.to_string().contains("species.toml"));
    }

    #[test]
    fn test_from_genetics_error() {
        let err: IoError = GeneticsError::InvalidChance(1.5).into();
        assert!(matches!(err, IoError::Genetics(_)));
    }
}
