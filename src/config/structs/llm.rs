//! Local model configuration.

use serde::{Deserialize, Serialize};

use crate::constants::llm::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::error::{Result, TestgenError};

/// LLM configuration.
///
/// All five agents share one model served by a local Ollama instance.
///
/// # Fields
/// - `model`: Ollama model tag (default: `qwen2.5-coder:7b`)
/// - `endpoint`: Ollama base URL (default: `http://localhost:11434`)
/// - `temperature`: sampling temperature in `0.0..=2.0` (default: `0.7`)
/// - `max_tokens`: optional cap on generated tokens (`num_predict`)
///
/// # Example
/// ```toml
/// [llm]
/// model = "llama3.1:8b"
/// endpoint = "http://gpu-box:11434"
/// temperature = 0.2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LLMConfig {
    /// Model tag passed to Ollama.
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama base URL. `None` uses the local default.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum generated token count.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: None,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

impl LLMConfig {
    /// Validates model settings.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(TestgenError::Config("llm.model cannot be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(TestgenError::Config(format!(
                "llm.temperature {} out of range [0.0, 2.0]",
                self.temperature
            )));
        }
        if let Some(ref endpoint) = self.endpoint
            && !endpoint.starts_with("http://")
            && !endpoint.starts_with("https://")
        {
            return Err(TestgenError::Config(format!(
                "llm.endpoint '{}' must start with http:// or https://",
                endpoint
            )));
        }
        Ok(())
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_temperature_bounds() {
        let mut config = LLMConfig::default();
        config.temperature = 2.0;
        assert!(config.validate().is_ok());
        config.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_endpoint_scheme() {
        let config = LLMConfig {
            endpoint: Some("localhost:11434".into()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_validate_empty_model() {
        let config = LLMConfig {
            model: " ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
