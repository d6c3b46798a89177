use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::{ApiKey, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Only malformed values are errors; every variable has a default or is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Server-side fallback used when a request does not carry its own key.
    pub openai_api_key: Option<ApiKey>,
    pub llm_timeout_secs: u64,
    pub prediction_model_path: Option<PathBuf>,
    pub extraction_trace: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_api_key: var("OPENAI_API_KEY").and_then(ApiKey::new),
            llm_timeout_secs: var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            prediction_model_path: var("PREDICTION_MODEL_PATH").map(PathBuf::from),
            extraction_trace: match var("EXTRACTION_TRACE") {
                Some(flag) => parse_flag("EXTRACTION_TRACE", &flag)?,
                None => false,
            },
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.llm_timeout_secs, 30);
        assert!(config.prediction_model_path.is_none());
        assert!(!config.extraction_trace);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_API_KEY", "sk-env"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("PREDICTION_MODEL_PATH", "models/halfmarathon.json"),
            ("EXTRACTION_TRACE", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_api_key.unwrap().expose(), "sk-env");
        assert_eq!(config.llm_timeout_secs, 5);
        assert_eq!(
            config.prediction_model_path,
            Some(PathBuf::from("models/halfmarathon.json"))
        );
        assert!(config.extraction_trace);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("LLM_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("EXTRACTION_TRACE", "maybe")]).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-very-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("sk-very-secret"));
    }
}
