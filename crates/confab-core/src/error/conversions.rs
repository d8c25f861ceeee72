//! From trait implementations for ConfabError conversions

use super::types::ConfabError;

impl From<std::io::Error> for ConfabError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for ConfabError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}
