//! Router assembly.
//!
//! Layer order, outermost first:
//!
//! 1. `Strict-Transport-Security` (optional)
//! 2. `X-Frame-Options` (optional)
//! 3. request tracing
//! 4. panic to `500` conversion
//! 5. identity
//! 6. status counters
//! 7. view timing
//!
//! The counters sit inside the panic layer so that they observe handler panics, and inside
//! the identity layer so that they can see who made the request.

use axum::middleware::from_fn_with_state;
use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::middleware::{
    frame_options::frame_options_middleware, graphite::graphite_middleware,
    identity::identity_middleware, strict_transport::strict_transport_middleware, timed,
    timing::request_timing_middleware,
};
use crate::routes;
use crate::state::AppState;

/// Wraps `router` in the full middleware stack.
pub fn with_layers(router: Router, state: &AppState) -> Router {
    let app = router
        .layer(from_fn_with_state(state.stats.clone(), request_timing_middleware))
        .layer(from_fn_with_state(state.stats.clone(), graphite_middleware))
        .layer(from_fn_with_state(state.config.clone(), identity_middleware))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http());

    let app = if state.config.security.frame_options {
        app.layer(axum::middleware::from_fn(frame_options_middleware))
    } else {
        app
    };
    if state.config.security.sts {
        app.layer(from_fn_with_state(state.config.clone(), strict_transport_middleware))
    } else {
        app
    }
}

/// The demo application served by the binary.
pub fn build_router(state: &AppState) -> Router {
    let routes = Router::new()
        .route("/healthz", get(routes::health::healthz))
        .route("/version", get(routes::health::version))
        .route("/blog/{slug}", get(timed(routes::pages::show_post)))
        .route("/embed", get(timed(routes::pages::embed)))
        .route("/preview", get(timed(routes::pages::preview)))
        .route("/whoami", get(timed(routes::pages::whoami)));
    with_layers(routes, state)
}
