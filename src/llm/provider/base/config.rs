//! Extraction helpers for [`LLMConfig`].

use crate::config::LLMConfig;

use super::super::utils::complete_endpoint;

/// Builds a complete endpoint from the configured base URL.
///
/// # Arguments
/// * `config` - LLM configuration
/// * `default_base` - base URL used when `endpoint` is unset
/// * `suffix` - API path suffix
pub fn build_endpoint(config: &LLMConfig, default_base: &str, suffix: &str) -> String {
    let base = config.endpoint.as_deref().unwrap_or(default_base);
    complete_endpoint(base, suffix)
}

/// Base URL with any API path removed, for health and listing calls.
pub fn api_base(config: &LLMConfig, default_base: &str) -> String {
    let base = config
        .endpoint
        .as_deref()
        .unwrap_or(default_base)
        .trim_end_matches('/');
    match base.find("/api/") {
        Some(idx) => base[..idx].to_string(),
        None => base.to_string(),
    }
}
