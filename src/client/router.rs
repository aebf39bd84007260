//! Inbound line routing
//!
//! Splits each raw line on spaces and decides what it is: the keepalive
//! acknowledgement, content for a registered channel, content for a channel
//! this instance never joined, or noise. Content is stamped with its arrival
//! time and appended to the channel's ring; everything else is dropped
//! without error. The liveness side effect of an acknowledgement is applied
//! by the connection task, not here.

use chrono::{DateTime, Utc};

use crate::protocol::constants::{ACK_KEYWORD, CONTENT_COMMAND};
use crate::protocol::message::prepend_timestamp_tag;
use crate::registry::{canonicalize, ChannelRegistry};

/// What the router did with one inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Keepalive acknowledgement; the caller marks the link alive
    PongAck,
    /// Content stored into the named channel's ring
    Stored(String),
    /// Content for a channel this instance never joined; dropped
    UnknownChannel(String),
    /// Anything else; dropped
    Ignored,
}

/// Route one inbound line, stamping stored records with the current time
pub async fn route(line: &str, registry: &ChannelRegistry) -> Routed {
    route_at(line, registry, Utc::now()).await
}

/// Route with an explicit arrival timestamp
async fn route_at(line: &str, registry: &ChannelRegistry, arrival: DateTime<Utc>) -> Routed {
    let tokens: Vec<&str> = line.split(' ').collect();

    if tokens.first() == Some(&ACK_KEYWORD) {
        return Routed::PongAck;
    }

    // Tagged content lines tokenize as: tags, prefix, command, target, body...
    if tokens.len() > 3 && tokens[2] == CONTENT_COMMAND {
        if let Some(designator) = tokens[3].strip_prefix('#') {
            let name = canonicalize(designator);
            return match registry.get(&name).await {
                Some(channel) => {
                    let mut record = prepend_timestamp_tag(line, arrival);
                    record.push('\n');
                    channel.ring().append(record).await;
                    Routed::Stored(name)
                }
                None => Routed::UnknownChannel(name),
            };
        }
    }

    Routed::Ignored
}
