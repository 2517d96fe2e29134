//! Veilgate: a clear-web gateway for a hidden service.
//!
//! Fronts a single destination site that is only reachable over an
//! anonymity overlay, so ordinary HTTP clients can browse it without
//! running Tor or I2P themselves.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                    VEILGATE                       │
//!  Client Request  │  ┌────────┐   ┌───────────┐   ┌───────────────┐  │
//!  ────────────────┼─▶│  http  │──▶│ translate │──▶│   transport   │──┼──▶ Tor SOCKS ──▶ hidden
//!                  │  │ server │   │ (rewrite  │   │ (selected at  │  │    or I2P proxy   site
//!                  │  └────────┘   │  request) │   │   startup)    │  │
//!                  │               └───────────┘   └───────┬───────┘  │
//!  Client Response │  ┌───────────────────────┐            │          │
//!  ◀───────────────┼──│ rewrite (cookies,     │◀───────────┘          │
//!                  │  │ redirects, hop hdrs)  │                       │
//!                  │  └───────────────────────┘                       │
//!                  └──────────────────────────────────────────────────┘
//! ```
//!
//! Transport selection runs exactly once at startup; every request task
//! shares the resulting immutable [`transport::TransportConfig`].

pub mod config;
pub mod http;
pub mod observability;
pub mod transport;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use transport::{Overlay, TransportConfig};
