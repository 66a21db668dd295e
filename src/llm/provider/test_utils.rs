//! Test utilities for provider tests

use crate::config::{LLMConfig, NetworkConfig};

/// 在测试中安装 rustls crypto provider
///
/// 生产代码在 main.rs 中完成，测试需要单独调用。多次调用是安全的。
pub fn ensure_crypto_provider() {
    super::install_crypto_provider();
}

/// `NetworkConfig` with retries disabled.
pub fn test_network_config_no_retry() -> NetworkConfig {
    NetworkConfig {
        max_retries: 0,
        ..Default::default()
    }
}

/// `LLMConfig` pointing at a mock server.
pub fn test_llm_config(base_url: String, model: &str) -> LLMConfig {
    LLMConfig {
        model: model.to_string(),
        endpoint: Some(base_url),
        temperature: 0.5,
        max_tokens: None,
    }
}
