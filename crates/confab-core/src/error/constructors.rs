//! Constructor methods for ConfabError

use super::types::ConfabError;

impl ConfabError {
    /// Create a new malformed record error
    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
            line: None,
        }
    }

    /// Attach an input line number to a malformed record error.
    ///
    /// The normalizer reports what is wrong; the stage driving it knows
    /// which line it was on. Other variants pass through unchanged.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            Self::MalformedRecord { message, .. } => Self::MalformedRecord {
                message,
                line: Some(line),
            },
            other => other,
        }
    }

    /// Create a new unsupported provider error
    pub fn unsupported_provider(provider: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            provider: provider.into(),
        }
    }

    /// Create a new source unavailable error
    pub fn source_unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            path: None,
        }
    }

    /// Create a storage error with the affected path
    pub fn storage_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a JSON error with message
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create an IO error with message
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
