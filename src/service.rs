//! Service assembly
//!
//! Wires the long-lived pieces together: the channel registry, the
//! supervised upstream client and the query API. The registry is populated
//! from the settings before the first dial, so the connect sequence joins
//! every configured channel.

use std::sync::Arc;

use crate::api::{self, AppState};
use crate::client::{ChatClient, ClientConfig};
use crate::config::Settings;
use crate::error::Result;
use crate::registry::ChannelRegistry;

/// The assembled chat history service
pub struct Service {
    settings: Settings,
    registry: Arc<ChannelRegistry>,
    client: Arc<ChatClient>,
}

impl Service {
    /// Assemble a service from loaded settings
    pub fn new(settings: Settings) -> Self {
        let registry = Arc::new(ChannelRegistry::with_capacity(settings.history_capacity));

        let client_config = ClientConfig::with_addr(settings.upstream_addr.clone())
            .nick(settings.nick.clone())
            .keepalive_interval(settings.keepalive_interval());
        let client = Arc::new(ChatClient::new(client_config, Arc::clone(&registry)));

        Self {
            settings,
            registry,
            client,
        }
    }

    /// The registry backing this service
    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// The upstream client
    pub fn client(&self) -> &Arc<ChatClient> {
        &self.client
    }

    /// Run the service
    ///
    /// This method blocks until the process is killed.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the service with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        for name in &self.settings.channels {
            self.registry.ensure(name).await;
        }

        let supervisor = self.client.spawn();

        let state = AppState::new(Arc::clone(&self.registry), Arc::clone(&self.client));
        let result = api::serve(state, &self.settings.listen_addr(), shutdown).await;

        // Stop the upstream client on shutdown
        supervisor.abort();

        result
    }
}
