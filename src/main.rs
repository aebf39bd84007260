//! chattail server binary
//!
//! Run with: `cargo run [config-path]`
//!
//! The config path defaults to `./config.json`. `RUST_LOG` controls log
//! verbosity (default: `chattail=info`).

use chattail::{Service, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chattail=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting chattail v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    let settings = match Settings::load(&config_path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(path = %config_path, error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        channels = settings.channels.len(),
        upstream = %settings.upstream_addr,
        listen = %settings.listen_addr(),
        "Configuration loaded"
    );

    let service = Service::new(settings);

    if let Err(e) = service.run_until(chattail::api::shutdown_signal()).await {
        tracing::error!(error = %e, "Service terminated");
        std::process::exit(1);
    }

    tracing::info!("chattail shutdown complete");
}
