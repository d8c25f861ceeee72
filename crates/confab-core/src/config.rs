//! Cache store configuration
//!
//! Resolution order mirrors the CLI: explicit flags win, then the
//! `CONFAB_CACHE_DIR` / `CONFAB_TTL` environment variables, then the
//! defaults (`~/.confab/cache`, 15 minutes).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL;
use crate::error::{ConfabError, ConfabResult};

/// Environment variable overriding the cache root directory
pub const ENV_CACHE_DIR: &str = "CONFAB_CACHE_DIR";
/// Environment variable overriding the freshness TTL (humantime syntax)
pub const ENV_TTL: &str = "CONFAB_TTL";

/// Configuration for a [`CacheStore`](crate::cache::CacheStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory entries are stored under
    pub root: PathBuf,
    /// Freshness window stamped onto newly stored entries
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Default cache root: `~/.confab/cache`.
    pub fn default_root() -> ConfabResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfabError::config("Could not determine home directory"))?;
        Ok(home.join(".confab").join("cache"))
    }

    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> ConfabResult<Self> {
        let root = match std::env::var(ENV_CACHE_DIR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_root()?,
        };

        let mut config = Self::new(root);
        if let Ok(raw) = std::env::var(ENV_TTL)
            && !raw.is_empty()
        {
            let ttl = humantime::parse_duration(&raw).map_err(|e| {
                ConfabError::config(format!("Invalid {ENV_TTL} value: {e}"))
            })?;
            config = config.with_ttl(ttl);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_ttl() {
        let config = StoreConfig::new("/tmp/cache");
        assert_eq!(config.root, PathBuf::from("/tmp/cache"));
        assert_eq!(config.ttl, DEFAULT_TTL);
    }

    #[test]
    fn test_with_ttl_overrides() {
        let config = StoreConfig::new("/tmp/cache").with_ttl(Duration::from_secs(60));
        assert_eq!(config.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_ttl_serializes_as_humantime() {
        let config = StoreConfig::new("/tmp/cache").with_ttl(Duration::from_secs(15 * 60));
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["ttl"], serde_json::json!("15m"));

        let parsed: StoreConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.ttl, Duration::from_secs(15 * 60));
    }
}
