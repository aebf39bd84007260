//! Per-channel history storage
//!
//! The registry maps canonical channel names to their bounded message rings.
//! One writer (the ingestion path) appends; any number of query tasks read
//! through consistent snapshots.
//!
//! # Architecture
//!
//! ```text
//!                      Arc<ChannelRegistry>
//!                 ┌───────────────────────────┐
//!                 │ channels: HashMap<String, │
//!                 │   Arc<Channel {           │
//!                 │     name,                 │
//!                 │     ring: MessageRing,    │
//!                 │   }>                      │
//!                 │ >                         │
//!                 └────────────┬──────────────┘
//!                              │
//!            ┌─────────────────┴─────────────────┐
//!            │                                   │
//!            ▼                                   ▼
//!       [Ingestion]                          [Queries]
//!       ring.append(record)                  ring.snapshot()
//!            │                                   │
//!            └──► overwrite oldest when full     └──► oldest-first body
//! ```
//!
//! # Locking
//!
//! The registry's map lock and each ring's lock are separate: a channel
//! lookup never blocks on another channel's buffer traffic, and a ring lock
//! is held only for O(capacity) copy work, never across I/O.

pub mod ring;
pub mod store;

pub use ring::{MessageRing, RingSnapshot, DEFAULT_CAPACITY};
pub use store::{canonicalize, Channel, ChannelRegistry};
