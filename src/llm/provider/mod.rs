pub mod base;
pub mod ollama;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

use std::sync::{Arc, OnceLock};

use reqwest::Client;

use crate::config::{AppConfig, NetworkConfig};
use crate::error::{Result, TestgenError};
use crate::llm::LLMProvider;

/// 全局 HTTP 客户端（共享连接池）
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// 全局 HTTP 客户端初始化错误信息
///
/// 如果第一次创建失败，保存错误字符串以避免后续重复创建。
static HTTP_CLIENT_ERROR: OnceLock<String> = OnceLock::new();

/// 获取或创建全局 HTTP 客户端
///
/// 使用 OnceLock 确保只创建一次，所有请求共享同一个连接池。
/// 第一次调用时的 NetworkConfig 决定 timeout 配置。
pub(crate) fn create_http_client(network_config: &NetworkConfig) -> Result<Client> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    if let Some(err_msg) = HTTP_CLIENT_ERROR.get() {
        return Err(TestgenError::Llm(format!(
            "HTTP client initialization failed earlier: {}",
            err_msg
        )));
    }

    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    match Client::builder()
        .user_agent(user_agent)
        .timeout(network_config.request_timeout())
        .connect_timeout(network_config.connect_timeout())
        .build()
    {
        Ok(client) => {
            let _ = HTTP_CLIENT.set(client.clone());
            Ok(client)
        }
        Err(e) => {
            let err_msg = e.to_string();
            let _ = HTTP_CLIENT_ERROR.set(err_msg.clone());
            Err(TestgenError::Llm(format!(
                "Failed to create HTTP client: {}",
                err_msg
            )))
        }
    }
}

/// 安装 rustls ring crypto provider
///
/// reqwest 使用 rustls-no-provider，必须在创建客户端之前调用。重复调用会被忽略。
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// 根据配置创建 LLM Provider
///
/// 所有 agent 共享同一个本地 Ollama 模型。
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn LLMProvider>> {
    let provider = ollama::OllamaProvider::new(&config.llm, &config.network)?;
    Ok(Arc::new(provider))
}
