use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Response header settings.
///
/// `sts_max_age` and `sts_subdomains` can also be set through the bare
/// `STS_MAX_AGE` / `STS_SUBDOMAINS` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Install the X-Frame-Options layer.
    pub frame_options: bool,
    /// Install the Strict-Transport-Security layer.
    pub sts: bool,
    pub sts_max_age: u64,
    pub sts_subdomains: bool,
    /// Treat `X-Forwarded-Proto: https` as a secure request. Only enable behind a proxy
    /// that overwrites the header.
    pub trust_forwarded_proto: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsdConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub statsd: StatsdConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
        {
            Ok(app_cfg) => app_cfg,
            Err(e) => panic!("Failed to load embedded default config: {}", e),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self {
            frame_options: true,
            sts: true,
            sts_max_age: 2_592_000,
            sts_subdomains: false,
            trust_forwarded_proto: false,
        }
    }
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self { enabled: false, host: "127.0.0.1".to_string(), port: 8125, prefix: String::new() }
    }
}

pub fn load() -> Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: headwind.toml (in CWD)
        .add_source(::config::File::with_name("headwind").required(false));

    if let Ok(custom_path) = std::env::var("HEADWIND_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    builder = builder
        .add_source(::config::Environment::with_prefix("HEADWIND").separator("__").try_parsing(true));

    // Bare HSTS variables win over everything else
    builder = builder
        .set_override_option("security.sts_max_age", std::env::var("STS_MAX_AGE").ok())?
        .set_override_option("security.sts_subdomains", std::env::var("STS_SUBDOMAINS").ok())?;

    let app_cfg: AppConfig = builder.build()?.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> Result<()> {
    if cfg.server.port == 0 {
        return Err(Error::invalid("server.port", format!("must be > 0, got {}", cfg.server.port)));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.statsd.enabled {
        if cfg.statsd.host.trim().is_empty() {
            return Err(Error::invalid("statsd.host", "must not be empty when statsd is enabled"));
        }
        if cfg.statsd.port == 0 {
            return Err(Error::invalid("statsd.port", "must be > 0 when statsd is enabled"));
        }
    }

    if let Some(token) = cfg.auth.token.as_deref() {
        if token.trim().is_empty() {
            return Err(Error::invalid("auth.token", "must not be blank when set"));
        }
    }

    Ok(())
}
