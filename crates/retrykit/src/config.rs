//! Executor configuration loaded from TOML or JSON.
//!
//! ```toml
//! max_retries = 5
//! backoff = "exponential"
//! base_delay_ms = 200
//! max_delay_ms = 10000
//! multiplier = 2.0
//! jitter = 0.1
//! sink = "tracing"
//! ```
//!
//! Every field is optional; missing fields take the process-wide defaults
//! (linear backoff, 10 retries, 1 second unit, stderr summaries).

use crate::executor::RetryExecutor;
use retrykit_core::notify::{SilentSink, StderrSink, TracingSink};
use retrykit_core::retry::{ExponentialBackoff, LinearBackoff};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating a `RetryConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed
    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document could not be parsed
    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid retry configuration: {0}")]
    Invalid(String),
}

/// Backoff formula selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// `attempt * base_delay`
    #[default]
    Linear,
    /// `base_delay * multiplier^(attempt - 1)`, capped and jittered
    Exponential,
}

/// Notification sink selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// One line on stderr per call that needed retries
    #[default]
    Stderr,
    /// The same line as a `tracing` event
    Tracing,
    /// No notifications
    Silent,
}

/// Serializable description of a `RetryExecutor`.
///
/// The classifier is not configurable from a document; executors built
/// from config always use the default application-error classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Backoff formula
    pub backoff: BackoffKind,
    /// Linear unit, or the first exponential delay, in milliseconds
    pub base_delay_ms: u64,
    /// Exponential delay cap in milliseconds
    pub max_delay_ms: u64,
    /// Exponential growth factor
    pub multiplier: f64,
    /// Exponential jitter factor, 0.0 to 1.0
    pub jitter: f64,
    /// Where call summaries go
    pub sink: SinkKind,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: LinearBackoff::DEFAULT_MAX_RETRIES,
            backoff: BackoffKind::Linear,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
            multiplier: 2.0,
            jitter: 0.1,
            sink: SinkKind::Stderr,
        }
    }
}

impl RetryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(document: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// Exponential settings are only checked when exponential backoff is selected.
    pub fn validate(&self) -> Result<()> {
        if self.backoff == BackoffKind::Exponential {
            if !(self.multiplier >= 1.0 && self.multiplier.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "multiplier must be a finite number >= 1.0, got {}",
                    self.multiplier
                )));
            }
            if !(0.0..=1.0).contains(&self.jitter) {
                return Err(ConfigError::Invalid(format!(
                    "jitter must be between 0.0 and 1.0, got {}",
                    self.jitter
                )));
            }
            if self.max_delay_ms < self.base_delay_ms {
                return Err(ConfigError::Invalid(format!(
                    "max_delay_ms ({}) must not be less than base_delay_ms ({})",
                    self.max_delay_ms, self.base_delay_ms
                )));
            }
        }
        Ok(())
    }

    fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl RetryExecutor {
    /// Build an executor from a validated configuration.
    ///
    /// ```rust
    /// use retrykit::{RetryConfig, RetryExecutor};
    ///
    /// let config = RetryConfig::from_toml_str(r#"
    ///     max_retries = 4
    ///     base_delay_ms = 125
    ///     sink = "silent"
    /// "#)?;
    ///
    /// let executor = RetryExecutor::from_config(&config)?;
    /// # let _ = executor;
    /// # Ok::<(), retrykit::ConfigError>(())
    /// ```
    pub fn from_config(config: &RetryConfig) -> Result<Self> {
        config.validate()?;

        let builder = match config.backoff {
            BackoffKind::Linear => {
                RetryExecutor::builder().policy(LinearBackoff::new(config.max_retries, config.base_delay()))
            }
            BackoffKind::Exponential => RetryExecutor::builder().policy(
                ExponentialBackoff::builder()
                    .max_retries(config.max_retries)
                    .initial_delay(config.base_delay())
                    .max_delay(Duration::from_millis(config.max_delay_ms))
                    .multiplier(config.multiplier)
                    .jitter(config.jitter)
                    .build(),
            ),
        };

        let builder = match config.sink {
            SinkKind::Stderr => builder.sink(StderrSink),
            SinkKind::Tracing => builder.sink(TracingSink),
            SinkKind::Silent => builder.sink(SilentSink),
        };

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RetryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RetryConfig::default());
        assert_eq!(config.max_retries, 10);
        assert_eq!(config.backoff, BackoffKind::Linear);
    }

    #[test]
    fn test_toml_selects_exponential_and_tracing() {
        let config = RetryConfig::from_toml_str(
            r#"
            max_retries = 5
            backoff = "exponential"
            base_delay_ms = 200
            max_delay_ms = 10000
            multiplier = 3.0
            jitter = 0.0
            sink = "tracing"
            "#,
        )
        .unwrap();

        assert_eq!(config.backoff, BackoffKind::Exponential);
        assert_eq!(config.sink, SinkKind::Tracing);
        assert_eq!(config.multiplier, 3.0);
        assert!(RetryExecutor::from_config(&config).is_ok());
    }

    #[test]
    fn test_json_document() {
        let config =
            RetryConfig::from_json_str(r#"{"max_retries": 2, "sink": "silent"}"#).unwrap();

        assert_eq!(config.max_retries, 2);
        assert_eq!(config.sink, SinkKind::Silent);
        assert_eq!(config.base_delay_ms, 1_000);
    }

    #[test]
    fn test_invalid_jitter_is_rejected() {
        let err = RetryConfig::from_toml_str(
            r#"
            backoff = "exponential"
            jitter = 1.5
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("jitter"));
    }

    #[test]
    fn test_inverted_delay_bounds_are_rejected() {
        let config = RetryConfig {
            backoff: BackoffKind::Exponential,
            base_delay_ms: 5_000,
            max_delay_ms: 100,
            ..RetryConfig::default()
        };

        assert!(matches!(
            RetryExecutor::from_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = RetryConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_configured_executor_applies_retry_limit() {
        let config = RetryConfig {
            max_retries: 2,
            base_delay_ms: 0,
            sink: SinkKind::Silent,
            ..RetryConfig::default()
        };
        let executor = RetryExecutor::from_config(&config).unwrap();
        let mut calls = 0;

        let result = executor.execute_action(|| {
            calls += 1;
            Err(io::Error::other("unavailable"))
        });

        assert!(result.is_err());
        assert_eq!(calls, 3);
    }
}
