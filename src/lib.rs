//! # Headwind
//!
//! Response middleware for axum services: two security headers and statsd request metrics.
//!
//! ## Components
//!
//! - [`middleware::frame_options`]: `X-Frame-Options: DENY` unless the handler set its own
//!   value or returned [`middleware::NoFrameOptions`]
//! - [`middleware::strict_transport`]: `Strict-Transport-Security` on secure requests, from
//!   `security.sts_max_age` / `security.sts_subdomains`
//! - [`middleware::graphite`]: `response.<status>` and `response.auth.<status>` counters
//! - [`middleware::timing`]: `view.<module>.<name>.<METHOD>` timers for handlers wrapped
//!   with [`middleware::timed`]
//!
//! ## Supporting modules
//!
//! - [`config`]: layered configuration (embedded defaults, TOML files, environment)
//! - [`metrics`]: statsd clients with a no-op fallback
//! - [`app`]: the assembled layer stack
//! - [`error`]: setup errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{routing::get, Router};
//! use headwind::{app, config::AppConfig, middleware::timed, state::AppState};
//!
//! async fn show() -> &'static str { "post" }
//!
//! let state = AppState::from_config(AppConfig::default());
//! let router = app::with_layers(Router::new().route("/post", get(timed(show))), &state);
//! # let _ = router;
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
