//! Configuration for the audio recognition client
//!
//! Settings come from environment variables (a `.env` file is loaded by the
//! binary at startup) and, optionally, a YAML file. Priority:
//! YAML > ENV vars > .env values > defaults.
//!
//! # Example
//! ```rust,no_run
//! use audio_recognition::config::ClientConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ClientConfig::from_env()?;
//!
//! // Load from YAML file with environment variables as the base
//! let config = ClientConfig::from_file(Path::new("config.yaml"))?;
//!
//! println!("Posting to {}", config.chat_completions_url());
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use url::Url;

mod yaml;

pub use yaml::{AudioYaml, YamlConfig};

use crate::core::recognition::RecognitionError;

/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "AUDIO_API_KEY";
/// Environment variable holding the provider base URL
pub const ENV_BASE_URL: &str = "AUDIO_API_BASE_URL";
/// Environment variable holding the model identifier
pub const ENV_MODEL: &str = "AUDIO_MODEL_NAME";

/// Base URL used when neither YAML nor the environment provides one
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the remote completion service.
///
/// Supplied once when the client is built and never changed afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer token sent with every request
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Model identifier
    pub model: String,
}

/// Zeroize the API key when the configuration is dropped.
impl Drop for ClientConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.api_key.zeroize();
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `AUDIO_API_KEY` and `AUDIO_MODEL_NAME` are required;
    /// `AUDIO_API_BASE_URL` falls back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, RecognitionError> {
        Self::merge(None)
    }

    /// Load configuration from a YAML file with environment variables as the base.
    ///
    /// # Errors
    /// Returns [`RecognitionError::ConfigurationError`] if the file cannot be
    /// read or parsed, a required value is missing, or validation fails.
    pub fn from_file(path: &Path) -> Result<Self, RecognitionError> {
        let yaml = YamlConfig::from_file(path).map_err(RecognitionError::ConfigurationError)?;
        Self::merge(yaml.audio)
    }

    fn merge(yaml: Option<AudioYaml>) -> Result<Self, RecognitionError> {
        let yaml = yaml.unwrap_or_default();

        let api_key = yaml
            .api_key
            .or_else(|| env_var(ENV_API_KEY))
            .ok_or_else(|| {
                RecognitionError::ConfigurationError(format!("{ENV_API_KEY} is required"))
            })?;
        let base_url = yaml
            .base_url
            .or_else(|| env_var(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = yaml
            .model
            .or_else(|| env_var(ENV_MODEL))
            .ok_or_else(|| {
                RecognitionError::ConfigurationError(format!("{ENV_MODEL} is required"))
            })?;

        let config = Self::new(api_key, base_url, model);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), RecognitionError> {
        if self.api_key.trim().is_empty() {
            return Err(RecognitionError::ConfigurationError(
                "API key is required".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(RecognitionError::ConfigurationError(
                "Model is required".to_string(),
            ));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            RecognitionError::ConfigurationError(format!(
                "Invalid base URL '{}': {e}",
                self.base_url
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RecognitionError::ConfigurationError(format!(
                "Base URL scheme must be http or https, got: {}",
                url.scheme()
            )));
        }

        Ok(())
    }

    /// Full URL of the chat-completions endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn clear_env() {
        // SAFETY: env-mutating tests are serialized with #[serial]
        unsafe {
            std::env::remove_var(ENV_API_KEY);
            std::env::remove_var(ENV_BASE_URL);
            std::env::remove_var(ENV_MODEL);
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: env-mutating tests are serialized with #[serial]
        unsafe { std::env::set_var(key, value) }
    }

    #[test]
    fn test_chat_completions_url_trims_trailing_slash() {
        let config = ClientConfig::new("key", "https://api.example.com/v1/", "m");
        assert_eq!(
            config.chat_completions_url(),
            "https://api.example.com/v1/chat/completions"
        );

        let config = ClientConfig::new("key", "https://api.example.com/v1", "m");
        assert_eq!(
            config.chat_completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_validation_valid() {
        let config = ClientConfig::new("key", "http://localhost:8080/v1", "omni");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_api_key() {
        let config = ClientConfig::new("  ", DEFAULT_BASE_URL, "omni");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RecognitionError::ConfigurationError(ref m) if m.contains("API key")));
    }

    #[test]
    fn test_validation_empty_model() {
        let config = ClientConfig::new("key", DEFAULT_BASE_URL, "");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, RecognitionError::ConfigurationError(ref m) if m.contains("Model")));
    }

    #[test]
    fn test_validation_bad_base_url() {
        let config = ClientConfig::new("key", "not a url", "omni");
        assert!(config.validate().is_err());

        let config = ClientConfig::new("key", "ftp://files.example.com", "omni");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("sk-very-secret", DEFAULT_BASE_URL, "omni");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("omni"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        set_env(ENV_API_KEY, "env-key");
        set_env(ENV_MODEL, "env-model");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.model, "env-model");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        set_env(ENV_BASE_URL, "https://proxy.example.com/v1");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://proxy.example.com/v1");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_api_key() {
        clear_env();
        set_env(ENV_MODEL, "env-model");

        let err = ClientConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_API_KEY));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_model() {
        clear_env();
        set_env(ENV_API_KEY, "env-key");

        let err = ClientConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_MODEL));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_file_overrides_env() {
        clear_env();
        set_env(ENV_API_KEY, "env-key");
        set_env(ENV_MODEL, "env-model");
        set_env(ENV_BASE_URL, "https://env.example.com/v1");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "audio:\n  model: \"yaml-model\"\n").unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.base_url, "https://env.example.com/v1");
        assert_eq!(config.model, "yaml-model");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        clear_env();
        let dir = TempDir::new().unwrap();
        let err = ClientConfig::from_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RecognitionError::ConfigurationError(_)));
    }
}
