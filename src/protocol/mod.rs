//! Upstream chat protocol: wire constants and line/tag parsing
//!
//! The upstream speaks a line-oriented IRC dialect. This module owns the
//! handful of literal commands the service sends, the token conventions it
//! recognizes on inbound lines, and the `@key=value;...` tag block handling
//! used to stamp and later filter stored records.

pub mod constants;
pub mod message;

pub use message::{parse_timestamp, prepend_timestamp_tag, record_timestamp, split_tags, tag_value};
