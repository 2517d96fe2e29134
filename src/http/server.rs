//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the gateway and robots handlers
//! - Wire up middleware (tracing)
//! - Bind the server to a listener, serve until shutdown
//! - Per-request access log, generic error response on transport failure

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderName, Request, Response, StatusCode},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::http::{rewrite, translate};
use crate::transport::TransportConfig;

/// Application state injected into handlers. The transport is the only
/// shared resource across request tasks, and it is read-only.
#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<TransportConfig>,
}

/// The clear-web side of the gateway.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Create a server forwarding through the given transport.
    pub fn new(transport: Arc<TransportConfig>) -> Self {
        let state = AppState { transport };
        let router = Router::new()
            .route("/robots.txt", any(robots_handler))
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Main gateway handler: translate, forward, rewrite, stream back.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response<Body> {
    log_request(&request, peer);

    // The gateway's own public address as the client sees it; the rewriter
    // binds cookies and redirects back to this.
    let inbound_host = inbound_host(&request);

    match translate::forward(request, &state.transport).await {
        Ok(upstream) => {
            rewrite::rewrite_response(upstream, state.transport.destination(), &inbound_host)
        }
        Err(e) => {
            // The cause stays in the logs; clients get a generic failure
            // with no overlay diagnostics in it.
            tracing::error!(error = %e, "Upstream round trip failed");
            internal_error()
        }
    }
}

/// The destination hides behind the gateway; crawlers have no business here.
async fn robots_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

fn inbound_host(request: &Request<Body>) -> String {
    request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        // HTTP/2 carries the authority in the URI instead.
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_owned()))
        .unwrap_or_default()
}

fn internal_error() -> Response<Body> {
    let mut response = Response::new(Body::from("500 Internal Server Error"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

fn log_request(request: &Request<Body>, peer: SocketAddr) {
    tracing::info!(
        client = %peer.ip(),
        method = %request.method(),
        uri = %request.uri(),
        referer = header_str(request, header::REFERER),
        user_agent = header_str(request, header::USER_AGENT),
        "Request"
    );
}

fn header_str<'a>(request: &'a Request<Body>, name: HeaderName) -> &'a str {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn inbound_host_prefers_the_host_header() {
        let mut request = Request::new(Body::empty());
        request
            .headers_mut()
            .insert(header::HOST, HeaderValue::from_static("gateway.example:1338"));
        assert_eq!(inbound_host(&request), "gateway.example:1338");
    }

    #[test]
    fn inbound_host_falls_back_to_the_uri_authority() {
        let request = Request::builder()
            .uri("http://gateway.example/path")
            .body(Body::empty())
            .unwrap();
        assert_eq!(inbound_host(&request), "gateway.example");
    }

    #[test]
    fn error_response_has_the_fixed_body() {
        let response = internal_error();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
