//! Record kind classification

use serde::{Deserialize, Serialize};

/// The three kinds of conversation-graph unit the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A workspace or account grouping conversations
    Organization,
    /// A single conversation thread
    Conversation,
    /// One message within a conversation
    Message,
}

impl RecordKind {
    /// Get the kind name as a string
    pub fn name(&self) -> &str {
        match self {
            RecordKind::Organization => "organization",
            RecordKind::Conversation => "conversation",
            RecordKind::Message => "message",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "organization" | "org" => Ok(RecordKind::Organization),
            "conversation" | "convo" => Ok(RecordKind::Conversation),
            "message" | "msg" => Ok(RecordKind::Message),
            other => Err(format!("Unknown record kind: {}", other)),
        }
    }
}
