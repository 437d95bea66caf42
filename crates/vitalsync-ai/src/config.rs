//! AI configuration.

use std::time::Duration;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model to use (default: gemini-2.5-flash)
    pub model: String,
    /// API root, without a trailing `/models`
    pub base_url: String,
    /// Upper bound on a whole request, including reading a streamed body
    pub request_timeout: Duration,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AIConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .unwrap_or_default();

        let model = std::env::var("VITALSYNC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            std::env::var("VITALSYNC_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let request_timeout = std::env::var("VITALSYNC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self {
            api_key,
            model,
            base_url,
            request_timeout,
        }
    }

    /// Check if the config is valid (has API key).
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Create a builder for configuration.
    pub fn builder() -> AIConfigBuilder {
        AIConfigBuilder::default()
    }
}

/// Builder for AI configuration.
#[derive(Debug, Default)]
pub struct AIConfigBuilder {
    config: AIConfig,
}

impl AIConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> AIConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AIConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(!config.is_valid());
    }

    #[test]
    fn test_builder() {
        let config = AIConfig::builder()
            .api_key("secret")
            .model("gemini-2.0-flash")
            .base_url("http://localhost:8080")
            .request_timeout(Duration::from_secs(5))
            .build();
        assert!(config.is_valid());
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
