//! Core error types for confab

use thiserror::Error;

/// Result type alias for confab operations
pub type ConfabResult<T> = Result<T, ConfabError>;

/// Main error type for confab
///
/// Record-scoped failures (one undecodable or unsupported record) are kept
/// separate from environment failures (storage, upstream source,
/// configuration): stream stages skip the former and abort on the latter.
#[derive(Error, Debug, Clone)]
pub enum ConfabError {
    /// A record that cannot be decoded into canonical form
    #[error("Malformed record: {message}")]
    MalformedRecord {
        message: String,
        line: Option<u64>,
    },

    /// Provider with no registered normalization rules
    #[error("Unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    /// The upstream source cannot be reached or refuses the request
    #[error("Source unavailable: {provider}: {message}")]
    SourceUnavailable {
        provider: String,
        message: String,
    },

    /// The upstream source no longer has the requested entity
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Cache storage errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ConfabError {
    /// Whether a stream stage may skip the offending record and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::UnsupportedProvider { .. }
        )
    }
}
