//! Chat providers understood by the pipeline

use serde::{Deserialize, Serialize};

/// Supported chat providers
///
/// `Custom` carries any other provider tag through the pipeline unchanged;
/// the normalizer rejects it, but cached records from out-of-tree
/// normalizers still list and render fine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Anthropic claude.ai conversations
    Claude,
    /// OpenAI ChatGPT conversation exports
    ChatGpt,
    /// Provider without built-in normalization rules
    Custom(String),
}

impl Provider {
    /// Get the provider name as a string
    pub fn name(&self) -> &str {
        match self {
            Provider::Claude => "claude",
            Provider::ChatGpt => "chatgpt",
            Provider::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Provider::Claude),
            "chatgpt" | "openai" => Ok(Provider::ChatGpt),
            _ => Ok(Provider::Custom(s.to_string())),
        }
    }
}

// On the wire a provider is a plain string ("claude", not {"custom":...}),
// so serde goes through name()/FromStr instead of the derive.

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_parsing_accepts_aliases() {
        assert_eq!("claude".parse::<Provider>(), Ok(Provider::Claude));
        assert_eq!("Anthropic".parse::<Provider>(), Ok(Provider::Claude));
        assert_eq!("openai".parse::<Provider>(), Ok(Provider::ChatGpt));
        assert_eq!(
            "slack".parse::<Provider>(),
            Ok(Provider::Custom("slack".to_string()))
        );
    }

    #[test]
    fn test_provider_wire_form_is_a_string() {
        assert_eq!(serde_json::to_value(Provider::Claude).unwrap(), json!("claude"));
        assert_eq!(
            serde_json::to_value(Provider::Custom("slack".to_string())).unwrap(),
            json!("slack")
        );

        let parsed: Provider = serde_json::from_value(json!("chatgpt")).unwrap();
        assert_eq!(parsed, Provider::ChatGpt);
    }
}
