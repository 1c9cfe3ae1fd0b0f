use axum::{
    extract::{Path, Request},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};

use crate::middleware::{AuthUser, NoFrameOptions};

pub async fn show_post(Path(slug): Path<String>) -> impl IntoResponse {
    if slug.is_empty() || !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return (StatusCode::NOT_FOUND, "no such post").into_response();
    }
    Html(format!("<h1>{}</h1>", slug)).into_response()
}

/// Meant to be embedded in third-party pages, so it opts out of `X-Frame-Options`.
pub async fn embed() -> impl IntoResponse {
    (NoFrameOptions, Html("<p>embeddable widget</p>"))
}

/// Same-origin framing only.
pub async fn preview() -> impl IntoResponse {
    ([(header::X_FRAME_OPTIONS, "SAMEORIGIN")], Html("<p>preview</p>"))
}

pub async fn whoami(req: Request) -> impl IntoResponse {
    let (authenticated, name) = match req.extensions().get::<AuthUser>() {
        Some(u) => (u.is_authenticated(), u.name().map(str::to_string)),
        None => (false, None),
    };
    Json(serde_json::json!({ "authenticated": authenticated, "name": name }))
}
