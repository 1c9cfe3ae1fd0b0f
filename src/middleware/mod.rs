//! Response middleware components.
//!
//! Each component is an axum `from_fn` middleware that runs once per request:
//!
//! - [`frame_options`]: `X-Frame-Options: DENY` unless set or suppressed
//! - [`strict_transport`]: `Strict-Transport-Security` on secure requests
//! - [`graphite`]: `response.<status>` counters, including panics
//! - [`timing`]: per-view timers, fed by [`timing::TimedView`] handlers
//!
//! [`identity`] and [`secure`] provide the request facts the components read.

pub mod frame_options;
pub mod graphite;
pub mod identity;
pub mod secure;
pub mod strict_transport;
pub mod timing;

pub use frame_options::NoFrameOptions;
pub use identity::AuthUser;
pub use secure::SecureTransport;
pub use timing::{timed, timed_as, TimedView, ViewInfo};
