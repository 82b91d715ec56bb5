// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use serde::Deserialize;
use std::net::SocketAddr;

/// Application settings
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level / tracing filter directive
    pub log_level: String,
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Bearer token TTL in seconds
    pub token_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            jwt_secret: "taskboard-dev-secret".to_string(),
            session_ttl_secs: 60 * 60 * 24, // 24 hours
            token_ttl_secs: 60 * 60 * 24,   // 24 hours
        }
    }
}

impl Settings {
    /// Load settings from `config/default.toml` and `TASKBOARD_*`
    /// environment variables, falling back to defaults for anything
    /// left unset.
    pub fn load() -> Result<Self> {
        Self::load_from("config/default")
    }

    /// Load settings with an explicit config file path (without the
    /// extension; TOML, YAML and JSON are all accepted).
    pub fn load_from(path: &str) -> Result<Self> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr.to_string())?
            .set_default("log_level", defaults.log_level)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("session_ttl_secs", defaults.session_ttl_secs)?
            .set_default("token_ttl_secs", defaults.token_ttl_secs)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("TASKBOARD"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Sanity-check loaded values.
    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_secs == 0 {
            anyhow::bail!("session_ttl_secs must be greater than 0");
        }
        if self.token_ttl_secs == 0 {
            anyhow::bail!("token_ttl_secs must be greater than 0");
        }
        if self.jwt_secret.is_empty() {
            anyhow::bail!("jwt_secret must not be empty");
        }
        Ok(())
    }
}
