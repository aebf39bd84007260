//! Channel history queries
//!
//! Handlers for the `/lastmessages` routes. Each query snapshots the
//! channel's ring under its lock, then assembles the response body outside
//! it, so slow clients never stall ingestion.

use std::sync::Arc;

use axum::extract::{Path, State};
use chrono::NaiveDateTime;

use crate::protocol;
use crate::registry::ChannelRegistry;

use super::AppState;

/// Body returned for channels the service never joined
pub const NOT_FOUND_BODY: &str = "Channel does not exist";

/// GET /lastmessages/:channel
///
/// Full retained history for the channel, oldest record first.
pub async fn last_messages(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
) -> String {
    history_body(&state.registry, &channel, None).await
}

/// GET /lastmessages/:channel/:since
///
/// History restricted to records stamped strictly later than `since`
/// (`YYYYMMDD-HHMMSS`). An unparsable `since` is treated as absent.
pub async fn last_messages_since(
    State(state): State<Arc<AppState>>,
    Path((channel, since)): Path<(String, String)>,
) -> String {
    let cutoff = protocol::parse_timestamp(&since);
    history_body(&state.registry, &channel, cutoff).await
}

/// Assemble the response body for one channel query
///
/// Records carry their trailing newline, so the body is a straight
/// concatenation. Under a cutoff, records whose stamp cannot be parsed are
/// excluded rather than guessed at.
async fn history_body(
    registry: &ChannelRegistry,
    channel: &str,
    cutoff: Option<NaiveDateTime>,
) -> String {
    let channel = match registry.get(channel).await {
        Some(channel) => channel,
        None => {
            tracing::debug!(channel = %channel, "Query for unknown channel");
            return NOT_FOUND_BODY.to_string();
        }
    };

    let snapshot = channel.ring().snapshot().await;

    let mut body = String::new();
    for record in snapshot.iter_oldest_first() {
        let keep = match cutoff {
            None => true,
            Some(cutoff) => matches!(
                protocol::record_timestamp(record), Some(stamp) if stamp > cutoff
            ),
        };
        if keep {
            body.push_str(record);
        }
    }
    body
}
