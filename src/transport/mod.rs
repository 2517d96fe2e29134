//! Overlay transport selection.
//!
//! # Responsibilities
//! - Decide, once at startup, which overlay carries outbound traffic
//! - Build the outbound HTTP client wired through that overlay's local proxy
//! - Own the fixed hidden destination identities
//!
//! # Design Decisions
//! - Selection is startup-only: no re-probing, no per-request fallback
//! - Tor is preferred when its SOCKS port answers; I2P is the fallback and
//!   the forced choice under `force_i2p`
//! - The client never follows redirects, so the rewriter sees every
//!   `Location` the destination emits

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::GatewayConfig;

pub mod probe;

/// Hidden destination reached over Tor.
pub const TOR_DESTINATION: &str = "flibustahezeous3.onion";

/// Hidden destination reached over I2P.
pub const I2P_DESTINATION: &str = "flibusta.i2p";

/// Second identity of the I2P destination; redirects may use either form.
pub const I2P_B32_ALIAS: &str =
    "zmw2cyw2vj7f6obx3msmdvdepdhnw2ctc4okza2zjxlukkdfckhq.b32.i2p";

/// Which overlay network the gateway forwards through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Tor,
    I2p,
    /// No overlay; plain TCP to the destination. Used for local testing
    /// against an ordinary HTTP backend.
    Direct,
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overlay::Tor => f.write_str("tor"),
            Overlay::I2p => f.write_str("i2p"),
            Overlay::Direct => f.write_str("direct"),
        }
    }
}

/// Error type for transport construction. Any variant is fatal at startup:
/// the gateway must not serve traffic without a usable transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("can't configure {overlay} proxy at {address}: {source}")]
    Proxy {
        overlay: Overlay,
        address: String,
        source: reqwest::Error,
    },
    #[error("can't build outbound client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The process-wide outbound transport, immutable after selection.
///
/// Shared across request tasks via [`Arc`]; the inner client owns its own
/// connection pool and synchronization.
#[derive(Clone)]
pub struct TransportConfig {
    overlay: Overlay,
    destination: String,
    client: reqwest::Client,
}

impl TransportConfig {
    /// Select the overlay transport. Runs exactly once, before the listener
    /// starts.
    ///
    /// Unless `force_i2p` is set, probes the Tor SOCKS address; a listening
    /// port selects Tor via a `socks5h://` dialer (hostname resolution must
    /// happen inside the overlay). Otherwise the I2P HTTP proxy is used.
    /// I2P construction performs no reachability check of its own; its
    /// failures surface later as per-request transport errors.
    pub async fn select(config: &GatewayConfig) -> Result<Self, TransportError> {
        let overlays = &config.overlays;
        if !overlays.force_i2p
            && probe::accepts_connections(&overlays.tor_address, config.timeouts.probe()).await
        {
            let proxy = reqwest::Proxy::all(format!("socks5h://{}", overlays.tor_address))
                .map_err(|source| TransportError::Proxy {
                    overlay: Overlay::Tor,
                    address: overlays.tor_address.clone(),
                    source,
                })?;
            let client = outbound_client(config.timeouts.connect(), Some(proxy))?;
            tracing::info!(
                overlay = %Overlay::Tor,
                address = %overlays.tor_address,
                destination = TOR_DESTINATION,
                "Overlay transport selected"
            );
            return Ok(Self {
                overlay: Overlay::Tor,
                destination: TOR_DESTINATION.to_string(),
                client,
            });
        }

        let proxy = reqwest::Proxy::all(format!("http://{}", overlays.i2p_address)).map_err(
            |source| TransportError::Proxy {
                overlay: Overlay::I2p,
                address: overlays.i2p_address.clone(),
                source,
            },
        )?;
        let client = outbound_client(config.timeouts.connect(), Some(proxy))?;
        tracing::info!(
            overlay = %Overlay::I2p,
            address = %overlays.i2p_address,
            destination = I2P_DESTINATION,
            "Overlay transport selected"
        );
        Ok(Self {
            overlay: Overlay::I2p,
            destination: I2P_DESTINATION.to_string(),
            client,
        })
    }

    /// Build a proxy-less transport to an arbitrary destination, for running
    /// the gateway against a plain HTTP backend.
    pub fn direct(destination: impl Into<String>) -> Result<Self, TransportError> {
        let client = outbound_client(Duration::from_secs(5), None)?;
        Ok(Self {
            overlay: Overlay::Direct,
            destination: destination.into(),
            client,
        })
    }

    /// Which overlay was selected.
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    /// The hidden hostname every outbound request must target.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The outbound client, wired through the selected overlay.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convenience for sharing across request tasks.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

fn outbound_client(
    connect_timeout: Duration,
    proxy: Option<reqwest::Proxy>,
) -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(connect_timeout);
    builder = match proxy {
        Some(proxy) => builder.proxy(proxy),
        // Also ignore proxy environment variables for the direct case.
        None => builder.no_proxy(),
    };
    Ok(builder.build()?)
}
