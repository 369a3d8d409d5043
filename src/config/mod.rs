//! Configuration module for Carousel
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`CAROUSEL_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)

pub mod error;
pub mod logging;
pub mod selector;
pub mod store;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use selector::SelectorConfig;
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the Carousel daemon.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CarouselConfig {
    /// Backend selector settings
    pub selector: SelectorConfig,
    /// Persisted state location
    pub store: StoreConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl CarouselConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports CAROUSEL_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("CAROUSEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CAROUSEL_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }
        if let Ok(url) = std::env::var("CAROUSEL_OLLAMA_URL") {
            self.selector.ollama_url = url;
        }
        if let Ok(url) = std::env::var("CAROUSEL_TINYLLM_URL") {
            self.selector.tinyllm_url = url;
        }
        if let Ok(url) = std::env::var("CAROUSEL_TINYCHAT_URL") {
            self.selector.tinychat_url = url;
        }
        if let Ok(policy) = std::env::var("CAROUSEL_POLICY") {
            if let Ok(p) = policy.parse() {
                self.selector.policy = p;
            }
        }
        if let Ok(enabled) = std::env::var("CAROUSEL_AI_ENABLED") {
            self.selector.ai_enabled = enabled.to_lowercase() == "true";
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in crate::selector::BackendKind::ALL {
            if self.selector.base_url(kind).is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("selector.{}_url", kind),
                    message: "URL cannot be empty".to_string(),
                });
            }
        }

        if self.selector.fallback_order.is_empty() {
            return Err(ConfigError::Validation {
                field: "selector.fallback_order".to_string(),
                message: "fallback order cannot be empty".to_string(),
            });
        }
        for (i, kind) in self.selector.fallback_order.iter().enumerate() {
            if self.selector.fallback_order[..i].contains(kind) {
                return Err(ConfigError::Validation {
                    field: "selector.fallback_order".to_string(),
                    message: format!("duplicate backend: {}", kind),
                });
            }
        }

        if self.selector.generate_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "selector.generate_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.selector.probe_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "selector.probe_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
