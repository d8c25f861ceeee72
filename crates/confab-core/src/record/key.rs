//! Cache keys and their on-disk layout

use std::path::PathBuf;

use super::{Provider, RecordKind};

/// Identifies one record in the cache: provider, kind, provider-native id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub provider: Provider,
    pub kind: RecordKind,
    pub id: String,
}

impl RecordKey {
    pub fn new(provider: Provider, kind: RecordKind, id: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            id: id.into(),
        }
    }

    /// Path of the entry file relative to the cache root:
    /// `{provider}/{kind}/{id}.json`.
    ///
    /// Provider names and ids come from untrusted input, so both are
    /// percent-encoded before they become path components. Kinds are a
    /// closed enum and need no encoding.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(encode_component(self.provider.name()))
            .join(self.kind.name())
            .join(format!("{}.json", encode_component(&self.id)))
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.provider, self.kind, self.id)
    }
}

/// Percent-encode a string for use as a single path component.
///
/// ASCII alphanumerics and `.`, `_`, `-` pass through; every other byte
/// becomes `%XX`. A component that is entirely `.` or `..` is encoded
/// as well, so nothing can step out of the cache directory.
pub(crate) fn encode_component(s: &str) -> String {
    if s == "." || s == ".." {
        return s.replace('.', "%2E");
    }
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
