//! Upstream record sources
//!
//! A source hands back raw enveloped values, exactly what the normalize
//! stage reads from stdin: the provider's native record plus `unit` and
//! an optional `fetched_at`. Streaming results lets a paginated source
//! fail partway without pretending the whole fetch succeeded.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use crate::error::{ConfabError, ConfabResult};
use crate::record::Provider;

/// Where raw records come from when the cache cannot answer.
#[async_trait]
pub trait RawSource: Send + Sync {
    fn provider(&self) -> Provider;

    /// Every organization visible to the account.
    async fn fetch_organizations(&self) -> ConfabResult<BoxStream<'_, ConfabResult<Value>>>;

    /// One conversation followed by its messages, flattened.
    ///
    /// An id the upstream no longer knows is `NotFound`; an unreachable
    /// upstream is `SourceUnavailable`.
    async fn fetch_conversation(
        &self,
        id: &str,
    ) -> ConfabResult<BoxStream<'_, ConfabResult<Value>>>;
}

/// In-memory source replaying captured raw records.
///
/// Used in tests and wherever a capture file stands in for a live
/// upstream; the in-process analog of piping a capture through the
/// normalize stage.
pub struct StaticSource {
    provider: Provider,
    organizations: Vec<Value>,
    conversations: HashMap<String, Vec<Value>>,
    unavailable: bool,
}

impl StaticSource {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            organizations: Vec::new(),
            conversations: HashMap::new(),
            unavailable: false,
        }
    }

    /// A source that refuses every fetch, for exercising degraded paths.
    pub fn unavailable(provider: Provider) -> Self {
        Self {
            unavailable: true,
            ..Self::new(provider)
        }
    }

    pub fn with_organizations(mut self, records: Vec<Value>) -> Self {
        self.organizations = records;
        self
    }

    pub fn with_conversation(mut self, id: impl Into<String>, records: Vec<Value>) -> Self {
        self.conversations.insert(id.into(), records);
        self
    }

    fn check_available(&self) -> ConfabResult<()> {
        if self.unavailable {
            return Err(ConfabError::source_unavailable(
                self.provider.name(),
                "source marked unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RawSource for StaticSource {
    fn provider(&self) -> Provider {
        self.provider.clone()
    }

    async fn fetch_organizations(&self) -> ConfabResult<BoxStream<'_, ConfabResult<Value>>> {
        self.check_available()?;
        let records: Vec<ConfabResult<Value>> =
            self.organizations.iter().cloned().map(Ok).collect();
        Ok(stream::iter(records).boxed())
    }

    async fn fetch_conversation(
        &self,
        id: &str,
    ) -> ConfabResult<BoxStream<'_, ConfabResult<Value>>> {
        self.check_available()?;
        let records = self
            .conversations
            .get(id)
            .ok_or_else(|| ConfabError::not_found(format!("Conversation {id} not found")))?;
        let records: Vec<ConfabResult<Value>> = records.iter().cloned().map(Ok).collect();
        Ok(stream::iter(records).boxed())
    }
}
