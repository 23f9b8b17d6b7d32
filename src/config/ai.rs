//! AI provider configuration (OpenRouter)

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// OpenRouter configuration.
///
/// The API key is optional on purpose: without one, every LLM-backed
/// feature still works through its deterministic fallback.
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    /// OpenRouter API key.
    pub openrouter_api_key: Option<Secret<String>>,

    /// Primary model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Fallback models tried when the primary is rate-limited.
    #[serde(default)]
    pub fallback_models: Vec<String>,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.openrouter_api_key.is_some()
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            model: default_model(),
            timeout_secs: default_timeout(),
            fallback_models: Vec::new(),
        }
    }
}

fn default_model() -> String {
    "meta-llama/llama-3.2-3b-instruct:free".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_work_without_a_key() {
        let config = AiConfig::default();
        assert!(!config.has_api_key());
        assert_eq!(config.model, "meta-llama/llama-3.2-3b-instruct:free");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_model_fails_validation() {
        let config = AiConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
