use thiserror::Error;

/// Errors raised while setting the middleware stack up.
///
/// The middleware components themselves never fail a request; everything here
/// happens before the server starts accepting connections.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration sources could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// A configuration value is out of range.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// Dotted path of the offending key, e.g. `server.port`.
        field: String,
        message: String,
    },
    /// Socket setup failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A `host:port` pair did not resolve to any address.
    #[error("could not resolve {0}")]
    Resolve(String),
    /// The statsd sink could not be created.
    #[error("statsd client error: {0}")]
    Metric(#[from] cadence::MetricError),
}

impl Error {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Error::Invalid { field: field.to_string(), message: message.into() }
    }
}

/// A type alias for `Result<T, Error>`, used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
