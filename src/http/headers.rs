//! Hop-by-hop header policy and host string helpers.
//!
//! # Responsibilities
//! - Own the fixed set of connection-scoped header names
//! - Strip that set from header maps on both legs
//! - Split `host:port` values with a verbatim fallback
//!
//! # Design Decisions
//! - One constant table, no ad hoc string literals at call sites
//! - Stripping removes every value of a repeated header, not just the first

use axum::http::HeaderMap;

/// Headers that are meaningful for a single connection leg only and must
/// never cross the proxy boundary, in either direction.
pub const HOP_HEADERS: [&str; 9] = [
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove every hop-by-hop header (all values) from the map.
pub fn strip_hop_headers(headers: &mut HeaderMap) {
    for name in HOP_HEADERS {
        headers.remove(name);
    }
}

/// Split a `Host`-style value into host and port.
///
/// Returns the value verbatim with no port when it cannot be split: a bare
/// hostname, or a bare IPv6 literal (multiple colons, no brackets).
pub fn split_host_port(value: &str) -> (&str, Option<u16>) {
    if let Some(rest) = value.strip_prefix('[') {
        // Bracketed IPv6 literal, optionally with a port.
        if let Some(end) = rest.find(']') {
            let host = &value[..end + 2];
            match value[end + 2..].strip_prefix(':') {
                Some(port) => return (host, port.parse().ok()),
                None => return (host, None),
            }
        }
        return (value, None);
    }
    match value.rsplit_once(':') {
        // A second colon means an unbracketed IPv6 literal.
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (value, None),
        },
        _ => (value, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn strips_every_value_of_repeated_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.append("connection", HeaderValue::from_static("keep-alive"));
        headers.append("connection", HeaderValue::from_static("te"));
        headers.append("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.append("upgrade", HeaderValue::from_static("websocket"));
        headers.insert("content-type", HeaderValue::from_static("text/html"));

        strip_hop_headers(&mut headers);

        for name in HOP_HEADERS {
            assert!(!headers.contains_key(name), "{name} should be stripped");
        }
        assert!(headers.contains_key("content-type"));
    }

    #[test]
    fn splits_host_and_port() {
        assert_eq!(split_host_port("gateway.example:1338"), ("gateway.example", Some(1338)));
        assert_eq!(split_host_port("127.0.0.1:80"), ("127.0.0.1", Some(80)));
    }

    #[test]
    fn falls_back_to_verbatim_host() {
        assert_eq!(split_host_port("gateway.example"), ("gateway.example", None));
        assert_eq!(split_host_port("::1"), ("::1", None));
        assert_eq!(split_host_port("gateway.example:http"), ("gateway.example:http", None));
    }

    #[test]
    fn handles_bracketed_ipv6() {
        assert_eq!(split_host_port("[::1]:1338"), ("[::1]", Some(1338)));
        assert_eq!(split_host_port("[::1]"), ("[::1]", None));
    }
}
