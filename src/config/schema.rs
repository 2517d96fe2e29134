//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file, and
//! every field has a default so a missing file or an empty one still yields
//! a runnable gateway.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Overlay proxy endpoints and selection override.
    pub overlays: OverlayConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address for the clear-web side.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:1338".to_string(),
        }
    }
}

/// Overlay proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Local Tor SOCKS5 endpoint.
    pub tor_address: String,

    /// Local I2P HTTP proxy endpoint.
    pub i2p_address: String,

    /// Skip the Tor reachability probe and always use I2P.
    pub force_i2p: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tor_address: "127.0.0.1:9050".to_string(),
            i2p_address: "127.0.0.1:4444".to_string(),
            force_i2p: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Tor reachability probe timeout in milliseconds.
    pub probe_ms: u64,

    /// Outbound connection establishment timeout in seconds. Overlay
    /// circuits are slow to build; keep this generous.
    pub connect_secs: u64,
}

impl TimeoutConfig {
    pub fn probe(&self) -> Duration {
        Duration::from_millis(self.probe_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_ms: 1_000,
            connect_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
