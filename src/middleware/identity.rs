use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::AppConfig;

/// The identity attached to a request.
///
/// Applications with their own authentication insert this extension themselves;
/// [`identity_middleware`] covers the single shared bearer token case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    name: Option<String>,
}

impl AuthUser {
    pub fn authenticated(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }

    pub fn anonymous() -> Self {
        Self { name: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.name.is_some()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Attaches an [`AuthUser`] to every request.
///
/// When `auth.token` is configured and the request carries a matching
/// `Authorization: Bearer <token>` header, the user is authenticated; otherwise it is
/// anonymous. Requests are never rejected here. An identity set by an outer layer is
/// kept as is.
pub async fn identity_middleware(
    State(cfg): State<Arc<AppConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<AuthUser>().is_none() {
        let user = match cfg.auth.token.as_deref() {
            Some(expected) if bearer_matches(req.headers(), expected) => AuthUser::authenticated("token"),
            _ => AuthUser::anonymous(),
        };
        req.extensions_mut().insert(user);
    }
    next.run(req).await
}

fn bearer_matches(headers: &axum::http::HeaderMap, expected: &str) -> bool {
    let provided = match headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        Some(p) => p,
        None => return false,
    };
    constant_time_eq(provided.as_bytes(), expected.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

/// Whether the request has an identity and that identity is authenticated.
pub fn is_authenticated(extensions: &axum::http::Extensions) -> bool {
    extensions.get::<AuthUser>().is_some_and(AuthUser::is_authenticated)
}
