//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI flag overrides applied in the binary
//!     → GatewayConfig (validated, immutable)
//!     → consumed once by transport selection and the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; transport selection is startup-only,
//!   so there is nothing for a reload to usefully change
//! - All fields have defaults so the gateway runs with no file at all

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::OverlayConfig;
pub use schema::TimeoutConfig;
