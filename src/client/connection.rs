//! Upstream connection management
//!
//! One `ChatClient` owns the single upstream socket for the life of the
//! process. A supervisor task dials, runs the connect sequence, then serves
//! the connection: the read loop and the keepalive timer are interleaved
//! with `select!`, so exactly one reconnect cycle can ever be in flight and
//! a new dial never starts before the previous read loop has fully wound
//! down.
//!
//! Liveness is probe/ack: each keepalive tick first checks that the previous
//! probe was answered, then sends the next probe. A silent interval or a
//! dead read loop tears the connection down and the supervisor redials with
//! bounded exponential backoff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::protocol::constants::{CAPABILITY_REQUESTS, JOIN_COMMAND, PROBE_LINE};
use crate::registry::ChannelRegistry;

use super::config::ClientConfig;
use super::router::{self, Routed};

/// Why a served connection ended
#[derive(Debug)]
enum DisconnectReason {
    /// Upstream closed the stream
    Eof,
    /// Socket read or write failed
    Io(std::io::Error),
    /// A keepalive probe went unacknowledged for a full interval
    KeepaliveTimeout,
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisconnectReason::Eof => write!(f, "upstream closed the connection"),
            DisconnectReason::Io(e) => write!(f, "socket error: {}", e),
            DisconnectReason::KeepaliveTimeout => write!(f, "keepalive probe unacknowledged"),
        }
    }
}

/// Upstream chat client
///
/// Maintains the single persistent connection: anonymous identity,
/// capability negotiation, channel joins, the ingestion read loop and the
/// keepalive probe cycle. All socket writes funnel through one writer lock
/// so concurrent senders never interleave partial lines.
pub struct ChatClient {
    config: ClientConfig,
    registry: Arc<ChannelRegistry>,

    /// Write half of the current socket; `None` while disconnected
    writer: Mutex<Option<BufWriter<OwnedWriteHalf>>>,

    /// Observed by joins and the health surface
    connected: AtomicBool,

    /// Set on `PONG`, cleared when a probe is sent
    pong_received: AtomicBool,
}

impl ChatClient {
    /// Create a client over the given registry; no connection is made until
    /// the supervisor runs
    pub fn new(config: ClientConfig, registry: Arc<ChannelRegistry>) -> Self {
        Self {
            config,
            registry,
            writer: Mutex::new(None),
            connected: AtomicBool::new(false),
            pong_received: AtomicBool::new(false),
        }
    }

    /// The registry this client ingests into
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Whether the upstream connection is currently established
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Spawn the supervisor task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move { client.run().await })
    }

    /// Drive connect/serve/reconnect until the task is dropped
    pub async fn run(&self) {
        let mut delay = self.config.reconnect_initial_delay;

        loop {
            match self.connect().await {
                Ok(reader) => {
                    delay = self.config.reconnect_initial_delay;
                    let reason = self.serve_connection(reader).await;
                    tracing::warn!(reason = %reason, "Connection lost");
                }
                Err(e) => {
                    tracing::warn!(
                        addr = %self.config.upstream_addr,
                        error = %e,
                        "Connect failed"
                    );
                }
            }

            self.disconnect().await;

            tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting before reconnect");
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(self.config.reconnect_max_delay);
        }
    }

    /// Register a channel and join it on the live connection
    ///
    /// While disconnected the join is deferred: the next connect sequence
    /// iterates the registry and joins everything registered.
    pub async fn join_channel(&self, name: &str) {
        let channel = self.registry.ensure(name).await;

        if self.is_connected() {
            let line = format!("{} #{}", JOIN_COMMAND, channel.name());
            if let Err(e) = self.send_line(&line).await {
                // The registry entry survives; the next connect joins it
                tracing::debug!(channel = %channel.name(), error = %e, "Join deferred");
            }
        }
    }

    /// Dial the upstream and run the connect sequence
    ///
    /// Installs the writer, sends identity, capability requests and a join
    /// per registered channel, then hands back the read half for serving.
    async fn connect(&self) -> std::io::Result<BufReader<OwnedReadHalf>> {
        tracing::info!(addr = %self.config.upstream_addr, "Connecting to upstream");

        let stream = TcpStream::connect(&self.config.upstream_addr).await?;
        let (read_half, write_half) = stream.into_split();

        *self.writer.lock().await = Some(BufWriter::new(write_half));

        self.send_line(&format!("NICK {}", self.config.nick)).await?;
        for cap in CAPABILITY_REQUESTS {
            self.send_line(cap).await?;
        }

        let channels = self.registry.channel_names().await;
        for name in &channels {
            self.send_line(&format!("{} #{}", JOIN_COMMAND, name)).await?;
        }

        self.pong_received.store(true, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);

        tracing::info!(
            nick = %self.config.nick,
            channels = channels.len(),
            "Connected to upstream"
        );

        Ok(BufReader::new(read_half))
    }

    /// Drop the socket and mark the client disconnected
    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        *self.writer.lock().await = None;
    }

    /// Serve one established connection until it dies
    async fn serve_connection(&self, reader: BufReader<OwnedReadHalf>) -> DisconnectReason {
        let mut lines = reader.lines();
        let mut keepalive = tokio::time::interval(self.config.keepalive_interval);
        // A probe must get a full interval before its ack check; late ticks
        // firing back-to-back would read as a missed ack
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => self.handle_line(&line).await,
                    Ok(None) => return DisconnectReason::Eof,
                    Err(e) => return DisconnectReason::Io(e),
                },
                _ = keepalive.tick() => {
                    if !self.pong_received.swap(false, Ordering::SeqCst) {
                        return DisconnectReason::KeepaliveTimeout;
                    }
                    if let Err(e) = self.send_line(PROBE_LINE).await {
                        return DisconnectReason::Io(e);
                    }
                    tracing::debug!("Keepalive probe sent");
                }
            }
        }
    }

    async fn handle_line(&self, line: &str) {
        tracing::trace!(raw = %line, "Line received");

        match router::route(line, &self.registry).await {
            Routed::PongAck => {
                self.pong_received.store(true, Ordering::SeqCst);
                tracing::debug!("Keepalive acknowledged");
            }
            Routed::Stored(channel) => {
                tracing::debug!(channel = %channel, "Message stored");
            }
            Routed::UnknownChannel(channel) => {
                tracing::trace!(channel = %channel, "Content for unjoined channel dropped");
            }
            Routed::Ignored => {}
        }
    }

    /// Write one line to the socket
    async fn send_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;

        match writer.as_mut() {
            Some(writer) => {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "not connected to upstream",
            )),
        }
    }
}
