//! `Strict-Transport-Security` for requests received over TLS.

use axum::{
    extract::{Request, State},
    http::{header::STRICT_TRANSPORT_SECURITY, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::secure::is_secure_request;
use crate::config::{AppConfig, SecurityConfig};

/// Builds `max-age=<N>` with an optional `; includeSubDomains`.
pub fn sts_header_value(sec: &SecurityConfig) -> String {
    let include_sub = if sec.sts_subdomains { "; includeSubDomains" } else { "" };
    format!("max-age={}{}", sec.sts_max_age, include_sub)
}

/// Sets the HSTS header on responses to secure requests, replacing any value a handler
/// may have set. Insecure requests pass through untouched.
pub async fn strict_transport_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let secure = is_secure_request(
        req.uri(),
        req.headers(),
        req.extensions(),
        cfg.security.trust_forwarded_proto,
    );
    let mut res = next.run(req).await;
    if secure {
        // The value is digits and ASCII only
        if let Ok(value) = HeaderValue::from_str(&sts_header_value(&cfg.security)) {
            res.headers_mut().insert(STRICT_TRANSPORT_SECURITY, value);
        }
    }
    res
}
