//! Response rewriting: raw upstream response → client response.
//!
//! # Responsibilities
//! - Rebind every cookie to the gateway's own hostname
//! - Point same-site redirects back at the gateway
//! - Strip hop-by-hop headers and stream the body through untouched
//!
//! # Design Decisions
//! - Malformed upstream data is handled permissively: an unparseable
//!   cookie is dropped rather than forwarded with the wrong domain, an
//!   unparseable or third-party `Location` passes through unchanged
//! - The body is never materialized; the upstream stream is moved into the
//!   client response and closes when that stream is dropped

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response};
use url::Url;

use crate::http::headers::{split_host_port, strip_hop_headers};
use crate::transport::I2P_B32_ALIAS;

/// Rewrite the raw upstream response for the client that presented
/// `inbound_host`, streaming the body as it arrives.
pub fn rewrite_response(
    upstream: reqwest::Response,
    destination: &str,
    inbound_host: &str,
) -> Response<Body> {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();

    rewrite_cookies(&mut headers, inbound_host);
    rewrite_location(&mut headers, destination, inbound_host);
    strip_hop_headers(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Replace the `Domain` of every upstream cookie with the host portion of
/// the inbound `Host` header, so the browser binds the cookie to the
/// gateway rather than the hidden destination. Originals are removed
/// first; no destination-domain cookie ever reaches the client.
fn rewrite_cookies(headers: &mut HeaderMap, inbound_host: &str) {
    let raw: Vec<String> = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_owned))
        .collect();
    headers.remove(header::SET_COOKIE);

    let (host, _) = split_host_port(inbound_host);
    for entry in raw {
        match cookie::Cookie::parse(entry) {
            Ok(mut parsed) => {
                parsed.set_domain(host.to_string());
                if let Ok(value) = HeaderValue::try_from(parsed.to_string()) {
                    headers.append(header::SET_COOKIE, value);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Dropping unparseable upstream cookie");
            }
        }
    }
}

/// Rewrite a `Location` that points back at the hidden destination (under
/// either of its identities) to the gateway's own host, preserving path
/// and query. Anything else may legitimately point elsewhere and passes
/// through unmodified.
fn rewrite_location(headers: &mut HeaderMap, destination: &str, inbound_host: &str) {
    if inbound_host.is_empty() {
        return;
    }
    let Some(raw) = headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
    else {
        return;
    };
    let Ok(url) = Url::parse(raw) else {
        // Relative or malformed; leave it alone.
        return;
    };

    let authority = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        _ => return,
    };
    if authority != destination && authority != I2P_B32_ALIAS {
        return;
    }

    // Assemble by hand so the inbound host goes back out verbatim; Url
    // serialization would elide an explicit default port like `:80`.
    let mut location = format!("http://{inbound_host}{}", url.path());
    if let Some(query) = url.query() {
        location.push('?');
        location.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        location.push('#');
        location.push_str(fragment);
    }

    if let Ok(value) = HeaderValue::try_from(location) {
        headers.insert(header::LOCATION, value);
    }
}
