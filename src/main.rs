//! Veilgate binary: flag parsing, startup orchestration.
//!
//! Startup order matters: configuration, logging, transport selection,
//! then the listener. Any failure before the listener binds is fatal; the
//! gateway never serves traffic without a usable transport.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use veilgate::config::loader::{load_config, ConfigError};
use veilgate::config::validation::validate_config;
use veilgate::config::GatewayConfig;
use veilgate::http::GatewayServer;
use veilgate::observability::logging;
use veilgate::transport::TransportConfig;

#[derive(Parser, Debug)]
#[command(name = "veilgate")]
#[command(about = "Clear-web HTTP gateway for a hidden service", long_about = None)]
struct Cli {
    /// Tor SOCKS5 service address
    #[arg(long, value_name = "ADDR")]
    tor: Option<String>,

    /// I2P HTTP proxy service address
    #[arg(long, value_name = "ADDR")]
    i2p: Option<String>,

    /// Skip the Tor reachability probe and always use I2P
    #[arg(long)]
    force_i2p: bool,

    /// HTTP listen address
    #[arg(long, value_name = "ADDR")]
    http: Option<String>,

    /// Optional TOML configuration file; flags override file values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(tor) = self.tor {
            config.overlays.tor_address = tor;
        }
        if let Some(i2p) = self.i2p {
            config.overlays.i2p_address = i2p;
        }
        if self.force_i2p {
            config.overlays.force_i2p = true;
        }
        if let Some(http) = self.http {
            config.listener.bind_address = http;
        }

        // Flags can invalidate a valid file config; check the merged result.
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability.log_level);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tor_address = %config.overlays.tor_address,
        i2p_address = %config.overlays.i2p_address,
        force_i2p = config.overlays.force_i2p,
        "Configuration loaded"
    );

    let transport = TransportConfig::select(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GatewayServer::new(transport.into_shared());
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
