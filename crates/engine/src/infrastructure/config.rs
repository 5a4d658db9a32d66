//! Application configuration

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::infrastructure::mistral::{
    DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_MISTRAL_BASE_URL, DEFAULT_MISTRAL_MODEL,
};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address
    pub host: String,
    /// HTTP/WebSocket server port
    pub port: u16,

    /// CORS allowed origins ("*" for any)
    pub cors_allowed_origins: Vec<String>,

    /// Which responder drives the pet
    pub responder: ResponderConfig,
}

/// Selects the responder implementation.
#[derive(Debug, Clone)]
pub enum ResponderConfig {
    /// Ask the language model, falling back locally on failure
    Llm(LlmConfig),
    /// Offline keyword matching, no network
    Simple,
}

/// Model provider settings
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    /// Full chat completions endpoint URL
    pub base_url: String,
    pub timeout: Duration,
}

// Hand-written so the API key never reaches the logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// A missing `MISTRAL_API_KEY` is fatal unless `SIMPLE_MODE` is on.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let simple_mode = match var("SIMPLE_MODE") {
            Some(value) => parse_flag(&value)
                .with_context(|| format!("SIMPLE_MODE must be a boolean, got {:?}", value))?,
            None => false,
        };

        let responder = if simple_mode {
            ResponderConfig::Simple
        } else {
            let api_key = var("MISTRAL_API_KEY").context(
                "MISTRAL_API_KEY environment variable is required (or set SIMPLE_MODE=true)",
            )?;
            let timeout_secs: u64 = match var("LLM_TIMEOUT_SECS") {
                Some(value) => value
                    .parse()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_LLM_TIMEOUT_SECS,
            };
            if timeout_secs == 0 {
                bail!("LLM_TIMEOUT_SECS must be greater than zero");
            }

            ResponderConfig::Llm(LlmConfig {
                api_key,
                model: var("MISTRAL_MODEL").unwrap_or_else(|| DEFAULT_MISTRAL_MODEL.to_string()),
                base_url: var("MISTRAL_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_MISTRAL_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            })
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            responder,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_api_key() {
        let config = load(&[("MISTRAL_API_KEY", "secret")]).expect("valid config");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.cors_allowed_origins, vec!["*".to_string()]);

        match config.responder {
            ResponderConfig::Llm(llm) => {
                assert_eq!(llm.api_key, "secret");
                assert_eq!(llm.model, DEFAULT_MISTRAL_MODEL);
                assert_eq!(llm.base_url, DEFAULT_MISTRAL_BASE_URL);
                assert_eq!(llm.timeout, Duration::from_secs(15));
            }
            ResponderConfig::Simple => panic!("expected LLM responder"),
        }
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = load(&[]).expect_err("api key required");
        assert!(err.to_string().contains("MISTRAL_API_KEY"));

        let err = load(&[("MISTRAL_API_KEY", "   ")]).expect_err("blank api key");
        assert!(err.to_string().contains("MISTRAL_API_KEY"));
    }

    #[test]
    fn test_simple_mode_needs_no_api_key() {
        let config = load(&[("SIMPLE_MODE", "true")]).expect("valid config");
        assert!(matches!(config.responder, ResponderConfig::Simple));
    }

    #[test]
    fn test_simple_mode_off_still_needs_key() {
        assert!(load(&[("SIMPLE_MODE", "0")]).is_err());
        assert!(load(&[("SIMPLE_MODE", "maybe")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MISTRAL_API_KEY", "k"),
            ("MISTRAL_MODEL", "mistral-small"),
            ("MISTRAL_BASE_URL", "http://localhost:1234/v1/chat/completions"),
            ("LLM_TIMEOUT_SECS", "3"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, http://example.com"),
        ])
        .expect("valid config");

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "http://example.com"]
        );
        let ResponderConfig::Llm(llm) = config.responder else {
            panic!("expected LLM responder");
        };
        assert_eq!(llm.model, "mistral-small");
        assert_eq!(llm.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(load(&[("MISTRAL_API_KEY", "k"), ("PORT", "eighty")]).is_err());
        assert!(load(&[("MISTRAL_API_KEY", "k"), ("LLM_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("MISTRAL_API_KEY", "k"), ("LLM_TIMEOUT_SECS", "-1")]).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = load(&[("MISTRAL_API_KEY", "super-secret")]).expect("valid config");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
