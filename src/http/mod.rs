//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, access log, robots.txt)
//!     → translate.rs (rebuild request against the hidden destination,
//!                     forward over the selected overlay transport)
//!     → rewrite.rs (cookies, redirects, hop headers; stream body)
//!     → Send to client
//! ```

pub mod headers;
pub mod rewrite;
pub mod server;
pub mod translate;

pub use server::GatewayServer;
