use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::retry::RetryPolicy;
use super::base::{api_base, build_endpoint, send_llm_request};
use super::utils::{
    DEFAULT_OLLAMA_BASE, OLLAMA_API_SUFFIX, OLLAMA_TAGS_SUFFIX, complete_endpoint,
    model_base_name,
};
use crate::config::{LLMConfig, NetworkConfig};
use crate::error::{Result, TestgenError};
use crate::llm::{LLMProvider, ProgressReporter};

/// Ollama API provider
///
/// Runs every agent against one locally served model.
///
/// # Configuration example
/// ```toml
/// [llm]
/// model = "qwen2.5-coder:7b"
/// endpoint = "http://localhost:11434" # Optional, default value
/// temperature = 0.7
/// ```
///
/// # Prerequisites for use
/// 1. Install Ollama: <https://ollama.ai>
/// 2. Pull model: `ollama pull qwen2.5-coder:7b`
/// 3. Make sure the Ollama service is running: `ollama serve`
pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaProvider {
    pub fn new(config: &LLMConfig, network_config: &NetworkConfig) -> Result<Self> {
        Ok(Self {
            client: super::create_http_client(network_config)?,
            endpoint: build_endpoint(config, DEFAULT_OLLAMA_BASE, OLLAMA_API_SUFFIX),
            base_url: api_base(config, DEFAULT_OLLAMA_BASE),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            retry: RetryPolicy::from(network_config),
        })
    }

    /// Names of all locally pulled models.
    ///
    /// An unreachable server is reported as [`TestgenError::Prerequisite`].
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let tags_endpoint = complete_endpoint(&self.base_url, OLLAMA_TAGS_SUFFIX);
        tracing::debug!("Listing Ollama models: {}", tags_endpoint);

        let response = self.client.get(&tags_endpoint).send().await.map_err(|e| {
            TestgenError::Prerequisite(format!(
                "Ollama is not running at {} ({})",
                self.base_url, e
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TestgenError::Prerequisite(format!(
                "Ollama is not running correctly at {} (HTTP {}): {}",
                self.base_url,
                status.as_u16(),
                body
            )));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            TestgenError::Llm(format!("Failed to parse Ollama tags response: {}", e))
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn send_prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        let request = OllamaRequest {
            model: &self.model,
            prompt: user_prompt,
            system: system_prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        tracing::debug!(
            "Ollama API request: model={}, temperature={}, system ({} chars), user ({} chars)",
            self.model,
            self.temperature,
            system_prompt.len(),
            user_prompt.len()
        );

        let started = Instant::now();
        let response: OllamaResponse = send_llm_request(
            &self.client,
            &self.endpoint,
            &request,
            "Ollama",
            progress,
            self.retry,
        )
        .await?;

        tracing::debug!(
            "Ollama responded in {:.1}s ({} chars, done={})",
            started.elapsed().as_secs_f64(),
            response.response.len(),
            response.done
        );

        Ok(response.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    async fn validate(&self) -> Result<()> {
        tracing::debug!("Validating Ollama connection...");

        let models = self.list_models().await?;
        let wanted = model_base_name(&self.model);

        if !models.iter().any(|name| name.contains(wanted)) {
            let installed = if models.is_empty() {
                "none".to_string()
            } else {
                models.join(", ")
            };
            return Err(TestgenError::Prerequisite(format!(
                "Model '{}' is not available in Ollama (installed: {})",
                self.model, installed
            )));
        }

        tracing::debug!("Ollama connection validated successfully");
        Ok(())
    }
}
