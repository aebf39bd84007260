//! Wire-format constants for the upstream chat protocol

/// Default upstream chat endpoint (plaintext IRC port)
pub const DEFAULT_UPSTREAM_ADDR: &str = "irc.chat.twitch.tv:6667";

/// Default anonymous read-only nick
///
/// The network accepts any `justinfan<digits>` nick without authentication.
pub const DEFAULT_NICK: &str = "justinfan12345";

/// Capability requests sent after the identity line
///
/// `commands` enables extended server notices, `tags` enables the
/// `@key=value;...` metadata block on content lines. The router's token
/// positions assume the tagged format.
pub const CAPABILITY_REQUESTS: [&str; 2] =
    ["CAP REQ :twitch.tv/commands", "CAP REQ :twitch.tv/tags"];

/// Outbound keepalive probe line
pub const PROBE_LINE: &str = "PING";

/// First token of the probe acknowledgement
pub const ACK_KEYWORD: &str = "PONG";

/// Command token carrying channel content
pub const CONTENT_COMMAND: &str = "PRIVMSG";

/// Join command prefix (`JOIN #<channel>`)
pub const JOIN_COMMAND: &str = "JOIN";

/// Tag key for the synthesized arrival timestamp
pub const TIMESTAMP_TAG: &str = "timestamp-utc";

/// Chrono format string for the timestamp tag (UTC, e.g. `20240131-235959`)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
