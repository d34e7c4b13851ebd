use std::{fmt::Display, net::SocketAddr, str::FromStr};

use tracing::info;

use super::error::ConfigError;

pub const DEFAULT_ADDR: &str = "127.0.0.1:9999";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: &str = "0.8";
pub const DEFAULT_MAX_TOKENS: &str = "500";

/// Runtime configuration, read once at startup.
///
/// Every value except the API key has a default; a default being applied is
/// logged so misconfigured deployments are visible.
///
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value for a variable name, if set.
    ///
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("GROQ_API_KEY"))?;

        Ok(Self {
            addr: try_load(&lookup, "FORTUNE_ADDR", DEFAULT_ADDR)?,
            api_key,
            base_url: try_load::<String, _>(&lookup, "GROQ_BASE_URL", DEFAULT_BASE_URL)?
                .trim_end_matches('/')
                .to_string(),
            model: try_load(&lookup, "FORTUNE_MODEL", DEFAULT_MODEL)?,
            temperature: try_load(&lookup, "FORTUNE_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: try_load(&lookup, "FORTUNE_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}
