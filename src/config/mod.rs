//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `SIDEO_` prefix and nested values use double underscores
//! as separators.
//!
//! # Example
//!
//! ```no_run
//! use sideo::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod audit;
mod error;

pub use ai::AiConfig;
pub use audit::AuditConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// AI provider configuration (OpenRouter)
    #[serde(default)]
    pub ai: AiConfig,

    /// Audit heuristics configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `SIDEO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SIDEO__AI__OPENROUTER_API_KEY=...` -> `ai.openrouter_api_key`
    /// - `SIDEO__AUDIT__PERSON_COST_CEILING=30000` -> `audit.person_cost_ceiling`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("SIDEO").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}
