//! Request translation: inbound request → outbound request on the overlay.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the hidden destination
//! - Force identity headers so nothing leaks the gateway hostname upstream
//! - Execute exactly one round trip on the selected transport
//!
//! # Design Decisions
//! - The body is handed over as a stream, never read into memory
//! - No retries: overlay latency makes blind retries unsafe for
//!   non-idempotent methods, so transient failures surface to the caller

use axum::body::{Body, HttpBody};
use axum::http::{header, HeaderMap, HeaderValue, Request};

use crate::http::headers::strip_hop_headers;
use crate::transport::TransportConfig;

/// Translate `request` into a plain-HTTP request against the hidden
/// destination and execute it over the transport.
///
/// Returns the raw upstream response, or the transport error unchanged;
/// never a partially-populated response.
pub async fn forward(
    request: Request<Body>,
    transport: &TransportConfig,
) -> Result<reqwest::Response, reqwest::Error> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    // Plain HTTP on this leg: the overlay itself provides confidentiality.
    let url = format!("http://{}{}", transport.destination(), path_and_query);

    // Ask the body itself rather than sniffing Content-Length or
    // Transfer-Encoding: HTTP/2 requests carry bodies with neither header.
    let has_body = !body.is_end_stream();

    let mut headers = parts.headers;
    prepare_headers(&mut headers, transport.destination());

    let mut outbound = transport
        .client()
        .request(parts.method, url)
        .headers(headers);
    if has_body {
        outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    outbound.send().await
}

/// Strip hop-by-hop headers, then force `Host`, `Referer` and `Origin` to
/// the destination host, overriding whatever the client sent. The
/// destination must present itself to the hidden site; client-supplied
/// values would leak the gateway hostname and trip the site's own
/// referer/origin checks.
pub(crate) fn prepare_headers(headers: &mut HeaderMap, destination: &str) {
    strip_hop_headers(headers);

    headers.remove(header::HOST);
    headers.remove(header::REFERER);
    headers.remove(header::ORIGIN);
    if let Ok(value) = HeaderValue::try_from(destination) {
        headers.insert(header::HOST, value.clone());
        headers.insert(header::REFERER, value.clone());
        headers.insert(header::ORIGIN, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::HOP_HEADERS;

    #[test]
    fn forces_identity_headers_to_destination() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("gateway.example"));
        headers.insert("referer", HeaderValue::from_static("http://gateway.example/a"));
        headers.insert("origin", HeaderValue::from_static("http://gateway.example"));
        headers.insert("user-agent", HeaderValue::from_static("curl/8"));

        prepare_headers(&mut headers, "hidden.onion");

        assert_eq!(headers.get("host").unwrap(), "hidden.onion");
        assert_eq!(headers.get("referer").unwrap(), "hidden.onion");
        assert_eq!(headers.get("origin").unwrap(), "hidden.onion");
        assert_eq!(headers.get("user-agent").unwrap(), "curl/8");
    }

    #[test]
    fn sets_identity_headers_even_when_client_sent_none() {
        let mut headers = HeaderMap::new();
        prepare_headers(&mut headers, "hidden.onion");

        assert_eq!(headers.get("host").unwrap(), "hidden.onion");
        assert_eq!(headers.get("referer").unwrap(), "hidden.onion");
        assert_eq!(headers.get("origin").unwrap(), "hidden.onion");
    }

    #[test]
    fn strips_hop_headers_from_outbound_set() {
        let mut headers = HeaderMap::new();
        headers.append("connection", HeaderValue::from_static("keep-alive"));
        headers.append("connection", HeaderValue::from_static("upgrade"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("proxy-authorization", HeaderValue::from_static("Basic xyz"));
        headers.insert("accept", HeaderValue::from_static("text/html"));

        prepare_headers(&mut headers, "hidden.onion");

        for name in HOP_HEADERS {
            assert!(!headers.contains_key(name), "{name} should be stripped");
        }
        assert_eq!(headers.get("accept").unwrap(), "text/html");
    }
}
