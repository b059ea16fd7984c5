use std::time::Duration;

use anyhow::{Context, Result};

/// Default deadline for a single analysis call, in seconds.
const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 300;

/// Application configuration loaded from environment variables.
///
/// The Gemini API key is optional at startup: the server still boots without it,
/// and every analysis fails with a configuration error before touching the network.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub analysis_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let analysis_timeout_secs = match optional_env("ANALYSIS_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_ANALYSIS_TIMEOUT_SECS,
        };

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY").or_else(|| optional_env("API_KEY")),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            analysis_timeout: Duration::from_secs(analysis_timeout_secs),
        })
    }
}

/// Reads an env var, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
