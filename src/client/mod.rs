//! Upstream chat client
//!
//! Client-side plumbing for the single persistent chat connection:
//! - Connection supervision with keepalive and reconnect
//! - Routing of inbound lines into the channel registry
//! - Connection tuning knobs
//!
//! Responses to channel queries are served elsewhere; this module only
//! writes into the registry.

pub mod config;
pub mod connection;
pub mod router;

pub use config::ClientConfig;
pub use connection::ChatClient;
pub use router::{route, Routed};
