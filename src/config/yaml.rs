use serde::Deserialize;
use std::path::Path;

/// YAML configuration file structure
///
/// All fields are optional so a file may override only part of the
/// environment-derived configuration.
///
/// # Example YAML structure
/// ```yaml
/// audio:
///   api_key: "sk-..."
///   base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1"
///   model: "qwen-omni-turbo"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub audio: Option<AudioYaml>,
}

/// Recognition service settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AudioYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        serde_yaml::from_str(contents).map_err(|e| format!("Failed to parse YAML config: {e}"))
    }
}
