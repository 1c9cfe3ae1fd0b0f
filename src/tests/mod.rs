//! Router-level tests for the Headwind middleware stack.
//!
//! ## Test Modules
//!
//! - **config_tests**: Configuration loading, layering and validation
//! - **error_tests**: Setup error conversions and messages
//! - **api_tests**: Demo routes through the full stack
//! - **header_tests**: X-Frame-Options and Strict-Transport-Security
//! - **graphite_tests**: Status-code counters, including handler panics
//! - **timing_tests**: Per-view timers
//!
//! Individual modules can be run with:
//! ```bash
//! cargo test header_tests
//! cargo test timing_tests
//! # etc.
//! ```


use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::Request;
use cadence::SpyMetricSink;
use crossbeam_channel::Receiver;

use crate::config::AppConfig;
use crate::metrics::{StatsClient, StatsdStats};
use crate::state::AppState;

/// A real statsd client writing into cadence's `SpyMetricSink`.
///
/// `counters` and `timings` parse the emitted lines back, in send order.
#[derive(Clone)]
pub(crate) struct SpyStats {
    client: Arc<StatsdStats>,
    rx: Receiver<Vec<u8>>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl SpyStats {
    pub(crate) fn new() -> Self {
        let (rx, sink) = SpyMetricSink::new();
        Self {
            client: Arc::new(StatsdStats::from_sink("", sink)),
            rx,
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every statsd line sent so far.
    pub(crate) fn lines(&self) -> Vec<String> {
        let mut lines = self.lines.lock().unwrap();
        lines.extend(self.rx.try_iter().map(|m| String::from_utf8(m).unwrap()));
        lines.clone()
    }

    pub(crate) fn counters(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| line.strip_suffix(":1|c").map(str::to_string))
            .collect()
    }

    pub(crate) fn timings(&self) -> Vec<(String, u64)> {
        self.lines()
            .into_iter()
            .filter_map(|line| {
                let (name, ms) = line.strip_suffix("|ms")?.rsplit_once(':')?;
                Some((name.to_string(), ms.parse().ok()?))
            })
            .collect()
    }
}

impl StatsClient for SpyStats {
    fn incr(&self, name: &str) {
        self.client.incr(name);
    }

    fn timing(&self, name: &str, ms: u64) {
        self.client.timing(name, ms);
    }
}

/// State whose stats client records into a [`SpyStats`].
pub(crate) fn test_state(config: AppConfig) -> (AppState, SpyStats) {
    let stats = SpyStats::new();
    (AppState::new(config, Arc::new(stats.clone())), stats)
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
