//! Statsd metrics client.
//!
//! The middleware only needs two fire-and-forget operations, [`StatsClient::incr`] and
//! [`StatsClient::timing`]. Neither returns anything and neither may fail the request.
//! [`StatsdStats`] implements them on top of a `cadence` client; send errors are logged
//! and dropped.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;

use cadence::prelude::*;
use cadence::{MetricSink, NopMetricSink, QueuingMetricSink, StatsdClient, UdpMetricSink};

use crate::config::StatsdConfig;
use crate::error::{Error, Result};

/// A counter/timer sink.
pub trait StatsClient: Send + Sync {
    /// Increments the counter `name` by one.
    fn incr(&self, name: &str);
    /// Records `ms` milliseconds for the timer `name`.
    fn timing(&self, name: &str, ms: u64);
}

/// Shared handle used by the middleware.
pub type Stats = Arc<dyn StatsClient>;

/// [`StatsClient`] backed by a `cadence` statsd client.
#[derive(Debug)]
pub struct StatsdStats {
    client: StatsdClient,
}

impl StatsdStats {
    /// Wraps any `cadence` sink. An empty `prefix` sends bare metric names.
    pub fn from_sink<T>(prefix: &str, sink: T) -> Self
    where
        T: MetricSink + Sync + Send + std::panic::RefUnwindSafe + 'static,
    {
        Self { client: StatsdClient::from_sink(prefix, sink) }
    }

    /// Sends to `host:port` over UDP. Datagrams are handed to a background queue so the
    /// request path never waits on the socket.
    pub fn udp(host: &str, port: u16, prefix: &str) -> Result<Self> {
        let target = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| Error::Resolve(format!("{}:{}", host, port)))?;
        let bind_addr = if target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_nonblocking(true)?;
        let sink = UdpMetricSink::from(target, socket)?;
        Ok(Self::from_sink(prefix, QueuingMetricSink::from(sink)))
    }

    /// Discards every metric.
    pub fn noop() -> Self {
        Self::from_sink("", NopMetricSink)
    }
}

impl StatsClient for StatsdStats {
    fn incr(&self, name: &str) {
        if let Err(e) = self.client.incr(name) {
            tracing::debug!("statsd counter {} dropped: {}", name, e);
        }
    }

    fn timing(&self, name: &str, ms: u64) {
        if let Err(e) = self.client.time(name, ms) {
            tracing::debug!("statsd timer {} dropped: {}", name, e);
        }
    }
}

/// Builds the process-wide client.
///
/// Falls back to a no-op client when statsd is disabled or the socket cannot be set up,
/// so a missing backend never surfaces as an error.
pub fn from_config(cfg: &StatsdConfig) -> Stats {
    if !cfg.enabled {
        tracing::info!("statsd disabled, metrics are discarded");
        return Arc::new(StatsdStats::noop());
    }
    match StatsdStats::udp(&cfg.host, cfg.port, &cfg.prefix) {
        Ok(client) => {
            tracing::info!("statsd metrics sent to {}:{}", cfg.host, cfg.port);
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!("statsd unavailable ({}), falling back to no-op client", e);
            Arc::new(StatsdStats::noop())
        }
    }
}
