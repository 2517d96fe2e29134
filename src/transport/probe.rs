//! Overlay proxy reachability probe.
//!
//! # Responsibilities
//! - Answer "is something listening on this address" with a bounded timeout
//!
//! # Design Decisions
//! - Connect-then-close only; no handshake. This proves the local proxy
//!   port is open, not that the overlay can reach the destination, and the
//!   selection contract depends on exactly that weaker check.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

/// Probe `addr` with a plain TCP connect, closing immediately on success.
pub async fn accepts_connections(addr: &str, timeout: Duration) -> bool {
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(e)) => {
            tracing::debug!(address = %addr, error = %e, "Reachability probe refused");
            false
        }
        Err(_) => {
            tracing::debug!(address = %addr, "Reachability probe timed out");
            false
        }
    }
}
