//! Channel registry implementation
//!
//! The central name → channel mapping shared by the ingestion and query
//! paths. Channels are created by join requests only and live for the rest
//! of the process; the router and the query handlers merely look them up.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ring::{MessageRing, DEFAULT_CAPACITY};

/// Canonical form of a channel name
///
/// Names are case-insensitive on the network; everything in the registry is
/// keyed by the lower-cased form.
pub fn canonicalize(name: &str) -> String {
    name.to_lowercase()
}

/// One registered channel: its canonical name plus the history ring
#[derive(Debug)]
pub struct Channel {
    name: String,
    ring: MessageRing,
}

impl Channel {
    fn new(name: String, capacity: usize) -> Self {
        Self {
            name,
            ring: MessageRing::with_capacity(capacity),
        }
    }

    /// Canonical (lower-case) channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The channel's history ring
    pub fn ring(&self) -> &MessageRing {
        &self.ring
    }
}

/// Central registry of all joined channels
///
/// Thread-safe via `RwLock`. The map lock is independent of each ring's
/// internal lock, so a lookup never waits on another channel's buffer
/// traffic.
pub struct ChannelRegistry {
    /// Map of canonical channel name to channel
    channels: RwLock<HashMap<String, Arc<Channel>>>,

    /// Ring capacity applied to newly created channels
    capacity: usize,
}

impl ChannelRegistry {
    /// Create a registry whose channels hold the default number of records
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a registry with a custom per-channel ring capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Register a channel, creating its ring if absent
    ///
    /// Idempotent: a second call for the same (case-insensitive) name
    /// returns the existing channel untouched.
    pub async fn ensure(&self, name: &str) -> Arc<Channel> {
        let canonical = canonicalize(name);

        {
            let channels = self.channels.read().await;
            if let Some(existing) = channels.get(&canonical) {
                return Arc::clone(existing);
            }
        }

        let mut channels = self.channels.write().await;

        // Re-check: another task may have inserted between the locks
        if let Some(existing) = channels.get(&canonical) {
            return Arc::clone(existing);
        }

        let channel = Arc::new(Channel::new(canonical.clone(), self.capacity));
        channels.insert(canonical, Arc::clone(&channel));

        tracing::info!(
            channel = %channel.name(),
            capacity = self.capacity,
            "Channel registered"
        );

        channel
    }

    /// Look up a channel by (case-insensitive) name
    pub async fn get(&self, name: &str) -> Option<Arc<Channel>> {
        let channels = self.channels.read().await;
        channels.get(&canonicalize(name)).map(Arc::clone)
    }

    /// Canonical names of all registered channels, sorted
    ///
    /// Used by the connect sequence to issue a deterministic join order.
    pub async fn channel_names(&self) -> Vec<String> {
        let channels = self.channels.read().await;
        let mut names: Vec<String> = channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// Total number of registered channels
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_creates_channel() {
        let registry = ChannelRegistry::new();

        let channel = registry.ensure("somechannel").await;
        assert_eq!(channel.name(), "somechannel");
        assert_eq!(registry.channel_count().await, 1);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let registry = ChannelRegistry::new();

        let first = registry.ensure("somechannel").await;
        let second = registry.ensure("somechannel").await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.channel_count().await, 1);
    }

    #[tokio::test]
    async fn test_names_are_canonicalized() {
        let registry = ChannelRegistry::new();

        let created = registry.ensure("SomeChannel").await;
        assert_eq!(created.name(), "somechannel");

        // Any casing resolves to the same channel
        let upper = registry.get("SOMECHANNEL").await.unwrap();
        let lower = registry.get("somechannel").await.unwrap();
        assert!(Arc::ptr_eq(&upper, &lower));
        assert_eq!(registry.channel_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_channel() {
        let registry = ChannelRegistry::new();

        assert!(registry.get("nosuchchannel").await.is_none());
    }

    #[tokio::test]
    async fn test_registered_channel_starts_empty() {
        let registry = ChannelRegistry::new();

        // Unknown and empty are different answers
        assert!(registry.get("fresh").await.is_none());

        registry.ensure("fresh").await;
        let channel = registry.get("fresh").await.unwrap();
        assert!(channel.ring().snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_channel_names_sorted() {
        let registry = ChannelRegistry::new();

        registry.ensure("zebra").await;
        registry.ensure("alpha").await;
        registry.ensure("Mid").await;

        assert_eq!(registry.channel_names().await, vec!["alpha", "mid", "zebra"]);
    }

    #[tokio::test]
    async fn test_capacity_applies_to_new_channels() {
        let registry = ChannelRegistry::with_capacity(3);

        let channel = registry.ensure("tiny").await;
        assert_eq!(channel.ring().capacity(), 3);

        for i in 1..=5 {
            channel.ring().append(i.to_string()).await;
        }
        assert_eq!(channel.ring().snapshot().await.len(), 3);
    }
}
