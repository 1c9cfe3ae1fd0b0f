//! Demo HTTP handlers served by the binary.
//!
//! - `health`: liveness and version endpoints (not timed)
//! - `pages`: a small page set exercising the middleware stack

pub mod health;
pub mod pages;
