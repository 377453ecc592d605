use serde::{Deserialize, Serialize};
use std::time::Duration;

/// IANA's root whois directory, the entry point for every uncached lookup.
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org:43";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub entry_server: String,
    pub connect_timeout_seconds: u64,
    /// Single deadline covering both the query write and the full response read.
    pub io_timeout_seconds: u64,
    pub max_response_size: usize,
    pub buffer_size: usize,
    pub referral_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigData {
    pub entry_server: String,
    pub connect_timeout_seconds: u64,
    pub io_timeout_seconds: u64,
    pub max_response_size: usize,
    pub buffer_size: usize,
    pub referral_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_server: IANA_WHOIS_SERVER.to_string(),
            connect_timeout_seconds: 10,
            io_timeout_seconds: 5,
            max_response_size: 1024 * 1024,
            buffer_size: 8192,
            referral_cache: false,
        }
    }
}

impl Config {
    /// Defaults overlaid with `WHOIS_*` environment variables.
    ///
    /// Only resource limits and the referral cache switch can be overridden.
    /// The entry point and the protocol timeouts always keep their defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let mut settings = config::Config::builder()
            .set_default("entry_server", defaults.entry_server)?
            .set_default("connect_timeout_seconds", defaults.connect_timeout_seconds)?
            .set_default("io_timeout_seconds", defaults.io_timeout_seconds)?
            .set_default("max_response_size", defaults.max_response_size as i64)?
            .set_default("buffer_size", defaults.buffer_size as i64)?
            .set_default("referral_cache", defaults.referral_cache)?;

        settings = Self::apply_env_overrides(settings)?;

        let config_data: ConfigData = settings.build()?.try_deserialize()?;

        Ok(Config {
            entry_server: config_data.entry_server,
            connect_timeout_seconds: config_data.connect_timeout_seconds,
            io_timeout_seconds: config_data.io_timeout_seconds,
            max_response_size: config_data.max_response_size,
            buffer_size: config_data.buffer_size.max(1),
            referral_cache: config_data.referral_cache,
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_seconds)
    }

    fn apply_env_overrides(
        mut settings: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let env_mappings = [
            ("WHOIS_MAX_RESPONSE_SIZE", "max_response_size"),
            ("WHOIS_BUFFER_SIZE", "buffer_size"),
            ("WHOIS_REFERRAL_CACHE", "referral_cache"),
        ];

        for (env_var, config_key) in env_mappings {
            if let Ok(value) = std::env::var(env_var) {
                settings = settings.set_override(config_key, value)?;
            }
        }

        Ok(settings)
    }
}
