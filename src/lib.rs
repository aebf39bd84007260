//! # chattail
//!
//! Bounded chat-history service: joins IRC chat channels read-only over a
//! single persistent connection and serves each channel's recent messages
//! over HTTP.
//!
//! ## Features
//!
//! - **Single upstream connection**: anonymous login, tag capabilities and
//!   every channel join multiplexed on one socket
//! - **Bounded history**: fixed-size ring per channel; once full, each new
//!   message evicts the oldest
//! - **Arrival stamping**: every stored record carries a
//!   `timestamp-utc=YYYYMMDD-HHMMSS` tag, queryable with a "since" cutoff
//! - **Self-healing**: keepalive probes and reconnect with bounded backoff
//!
//! ## Modules
//!
//! - [`registry`]: per-channel ring buffers behind one registry
//! - [`client`]: upstream connection supervision and line routing
//! - [`protocol`]: line splitting, tags, timestamp stamping
//! - [`api`]: HTTP query surface
//! - [`service`]: assembly of the above from [`config::Settings`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chattail::{Service, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load("config.json")?;
//!     let service = Service::new(settings);
//!     service.run_until(chattail::api::shutdown_signal()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod service;

// Re-export top-level types for convenience
pub use api::{build_router, serve, AppState};
pub use client::{ChatClient, ClientConfig};
pub use config::Settings;
pub use error::{ConfigError, Error, Result};
pub use registry::{ChannelRegistry, MessageRing, RingSnapshot};
pub use service::Service;
