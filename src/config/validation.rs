//! Semantic configuration checks, run after deserialization.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration value.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    Address { field: &'static str, value: String },
    #[error("{field}: must be greater than zero")]
    ZeroTimeout { field: &'static str },
}

/// Check everything and report all problems at once.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("listener.bind_address", &config.listener.bind_address),
        ("overlays.tor_address", &config.overlays.tor_address),
        ("overlays.i2p_address", &config.overlays.i2p_address),
    ] {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::Address {
                field,
                value: value.clone(),
            });
        }
    }

    if config.timeouts.probe_ms == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.probe_ms",
        });
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "timeouts.connect_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
