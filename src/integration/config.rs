//! Immutable configuration for the assistant core
//!
//! Constructed once at startup and passed into each component; nothing in
//! the core mutates it afterwards.

use crate::asr::SelectionMode;
use crate::router::ResponseLocale;
use crate::{AssistantError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the complete decision core
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Identifier of the general-purpose engine (logging/diagnostics only)
    pub primary_engine: String,

    /// Identifier of the language-specialized engine
    pub secondary_engine: String,

    /// Engine selection strategy
    pub selection_mode: SelectionMode,

    /// Minimum confidence for accepting a target-language primary result
    pub language_confidence_threshold: f32,

    /// Upper bound for one system query
    pub query_timeout: Duration,

    /// The only directory file queries ever touch
    pub working_directory: PathBuf,

    /// BCP-47-ish locale tag for rendered replies
    pub target_locale: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            primary_engine: "whisper".to_string(),
            secondary_engine: "aishell".to_string(),
            selection_mode: SelectionMode::Auto,
            language_confidence_threshold: 0.6,
            query_timeout: Duration::from_secs(10),
            working_directory: PathBuf::from("."),
            target_locale: "zh-TW".to_string(),
        }
    }
}

impl AssistantConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine identifiers
    pub fn with_engines(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_engine = primary.into();
        self.secondary_engine = secondary.into();
        self
    }

    /// Set the selection mode
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Set the language confidence threshold
    pub fn with_language_confidence_threshold(mut self, threshold: f32) -> Self {
        self.language_confidence_threshold = threshold;
        self
    }

    /// Set the system query timeout
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set the working directory for file queries
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = dir.into();
        self
    }

    /// Set the response locale tag
    pub fn with_target_locale(mut self, locale: impl Into<String>) -> Self {
        self.target_locale = locale.into();
        self
    }

    /// The parsed response locale
    pub fn locale(&self) -> ResponseLocale {
        ResponseLocale::parse(&self.target_locale)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.primary_engine.trim().is_empty() || self.secondary_engine.trim().is_empty() {
            return Err(AssistantError::ConfigError(
                "engine identifiers must not be empty".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.language_confidence_threshold) {
            return Err(AssistantError::ConfigError(format!(
                "language confidence threshold must be in [0, 1], got {}",
                self.language_confidence_threshold
            )));
        }
        if self.query_timeout.is_zero() {
            return Err(AssistantError::ConfigError(
                "query timeout must be positive".to_string(),
            ));
        }
        if !self.working_directory.is_dir() {
            return Err(AssistantError::ConfigError(format!(
                "working directory does not exist: {}",
                self.working_directory.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AssistantConfig::default();
        assert_eq!(config.selection_mode, SelectionMode::Auto);
        assert_eq!(config.language_confidence_threshold, 0.6);
        assert_eq!(config.query_timeout, Duration::from_secs(10));
        assert_eq!(config.target_locale, "zh-TW");
        assert!(config.locale().is_chinese());
    }

    #[test]
    fn test_config_builder() {
        let config = AssistantConfig::new()
            .with_selection_mode(SelectionMode::AlwaysPrimary)
            .with_language_confidence_threshold(0.8)
            .with_query_timeout(Duration::from_secs(5))
            .with_target_locale("en-US");

        assert_eq!(config.selection_mode, SelectionMode::AlwaysPrimary);
        assert_eq!(config.language_confidence_threshold, 0.8);
        assert_eq!(config.query_timeout, Duration::from_secs(5));
        assert!(!config.locale().is_chinese());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_threshold = AssistantConfig::new().with_language_confidence_threshold(1.5);
        assert!(bad_threshold.validate().is_err());

        let bad_timeout = AssistantConfig::new().with_query_timeout(Duration::ZERO);
        assert!(bad_timeout.validate().is_err());

        let bad_dir = AssistantConfig::new().with_working_directory("/nonexistent/parley");
        assert!(bad_dir.validate().is_err());

        let bad_engines = AssistantConfig::new().with_engines("", "aishell");
        assert!(bad_engines.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        // "." always exists
        assert!(AssistantConfig::default().validate().is_ok());
    }
}
