use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Heuristic,
    Llm,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(ProviderKind::Heuristic),
            "llm" => Ok(ProviderKind::Llm),
            other => bail!("SCORING_PROVIDER must be 'heuristic' or 'llm', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    File,
    Memory,
}

impl FromStr for HistoryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(HistoryBackend::File),
            "memory" => Ok(HistoryBackend::Memory),
            other => bail!("HISTORY_STORE must be 'file' or 'memory', got '{other}'"),
        }
    }
}

/// Headroom above the file limit for the other multipart fields and boundaries,
/// so an oversized resume reaches the extractor and gets a precise 413 message.
pub const MULTIPART_OVERHEAD_BYTES: usize = 256 * 1024;

/// Application configuration loaded from environment variables.
/// Only `ANTHROPIC_API_KEY` is ever required, and only for the LLM provider.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub history_backend: HistoryBackend,
    pub provider: ProviderKind,
    pub anthropic_api_key: Option<String>,
    pub provider_timeout: Duration,
    pub provider_delay: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            rust_log: "info".to_string(),
            data_dir: PathBuf::from("data/sessions"),
            history_backend: HistoryBackend::File,
            provider: ProviderKind::Heuristic,
            anthropic_api_key: None,
            provider_timeout: Duration::from_secs(30),
            provider_delay: Duration::ZERO,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let provider = match lookup("SCORING_PROVIDER") {
            Some(v) => v.parse()?,
            None => defaults.provider,
        };
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if provider == ProviderKind::Llm && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set (SCORING_PROVIDER=llm)");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            history_backend: match lookup("HISTORY_STORE") {
                Some(v) => v.parse()?,
                None => defaults.history_backend,
            },
            provider,
            anthropic_api_key,
            provider_timeout: Duration::from_secs(parse_or(&lookup, "PROVIDER_TIMEOUT_SECS", 30u64)?),
            provider_delay: Duration::from_millis(parse_or(&lookup, "PROVIDER_DELAY_MS", 0u64)?),
            max_upload_bytes: upload_limit(parse_or(&lookup, "MAX_UPLOAD_MB", 5usize)?)?,
        })
    }

    /// Request body cap for upload routes.
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

/// Converts MAX_UPLOAD_MB to bytes, rejecting values whose body limit would overflow.
fn upload_limit(megabytes: usize) -> Result<usize> {
    megabytes
        .checked_mul(1024 * 1024)
        .filter(|bytes| bytes.checked_add(MULTIPART_OVERHEAD_BYTES).is_some())
        .with_context(|| format!("MAX_UPLOAD_MB is too large, got {megabytes}"))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.provider, ProviderKind::Heuristic);
        assert_eq!(config.data_dir, PathBuf::from("data/sessions"));
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.history_backend, HistoryBackend::File);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9090"),
            ("DATA_DIR", "/tmp/evals"),
            ("PROVIDER_TIMEOUT_SECS", "5"),
            ("PROVIDER_DELAY_MS", "250"),
            ("MAX_UPLOAD_MB", "2"),
            ("HISTORY_STORE", "Memory"),
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/evals"));
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert_eq!(config.provider_delay, Duration::from_millis(250));
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
        assert_eq!(config.history_backend, HistoryBackend::Memory);
    }

    #[test]
    fn test_llm_provider_requires_api_key() {
        let err = config_from(&[("SCORING_PROVIDER", "llm")]).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config =
            config_from(&[("SCORING_PROVIDER", "LLM"), ("ANTHROPIC_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.provider, ProviderKind::Llm);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("SCORING_PROVIDER", "random")]).is_err());
        assert!(config_from(&[("HISTORY_STORE", "redis")]).is_err());
    }

    #[test]
    fn test_huge_upload_limit_is_rejected() {
        let huge = usize::MAX.to_string();
        let err = config_from(&[("MAX_UPLOAD_MB", huge.as_str())]).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_MB"));

        let config = config_from(&[("MAX_UPLOAD_MB", "1")]).unwrap();
        assert_eq!(config.body_limit(), 1024 * 1024 + MULTIPART_OVERHEAD_BYTES);
    }
}
