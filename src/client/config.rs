//! Upstream client configuration

use std::time::Duration;

use crate::protocol::constants::{DEFAULT_NICK, DEFAULT_UPSTREAM_ADDR};

/// Upstream connection options
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upstream chat endpoint (`host:port`)
    pub upstream_addr: String,

    /// Anonymous read-only nick announced at connect
    pub nick: String,

    /// Interval between keepalive probes; a probe unacknowledged for one
    /// full interval marks the link dead
    pub keepalive_interval: Duration,

    /// Delay before the first reconnect attempt
    pub reconnect_initial_delay: Duration,

    /// Upper bound for the doubling reconnect delay
    pub reconnect_max_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            upstream_addr: DEFAULT_UPSTREAM_ADDR.to_string(),
            nick: DEFAULT_NICK.to_string(),
            keepalive_interval: Duration::from_secs(15),
            reconnect_initial_delay: Duration::from_secs(1),
            reconnect_max_delay: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at a custom upstream endpoint
    pub fn with_addr(addr: impl Into<String>) -> Self {
        Self {
            upstream_addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set the upstream endpoint
    pub fn upstream_addr(mut self, addr: impl Into<String>) -> Self {
        self.upstream_addr = addr.into();
        self
    }

    /// Set the anonymous nick
    pub fn nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = nick.into();
        self
    }

    /// Set the keepalive probe interval
    pub fn keepalive_interval(mut self, interval: Duration) -> Self {
        self.keepalive_interval = interval;
        self
    }

    /// Set the reconnect backoff bounds
    ///
    /// The delay starts at `initial`, doubles after each failed attempt and
    /// is capped at `max`.
    pub fn reconnect_delay(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_initial_delay = initial;
        self.reconnect_max_delay = max.max(initial);
        self
    }
}
