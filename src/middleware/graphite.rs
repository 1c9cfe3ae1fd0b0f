//! Status-code counters.
//!
//! Every response increments `response.<status>`; responses to authenticated requests also
//! increment `response.auth.<status>`. A handler panic counts as a 500 before the panic is
//! passed on to the outer layers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use std::panic::{resume_unwind, AssertUnwindSafe};

use super::identity::is_authenticated;
use crate::metrics::{Stats, StatsClient};

/// Increments `response.<status>`, plus `response.auth.<status>` for authenticated requests.
pub fn record_status(stats: &dyn StatsClient, status: u16, authenticated: bool) {
    stats.incr(&format!("response.{}", status));
    if authenticated {
        stats.incr(&format!("response.auth.{}", status));
    }
}

/// Counts the status of every response that passes through.
///
/// A panic below this layer is counted as `500` and then re-raised unchanged.
pub async fn graphite_middleware(State(stats): State<Stats>, req: Request, next: Next) -> Response {
    // The request is moved into the handler, so look at the identity up front
    let authenticated = is_authenticated(req.extensions());

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => {
            let authenticated = authenticated || is_authenticated(res.extensions());
            record_status(stats.as_ref(), res.status().as_u16(), authenticated);
            res
        }
        Err(panic) => {
            record_status(stats.as_ref(), 500, authenticated);
            resume_unwind(panic)
        }
    }
}
