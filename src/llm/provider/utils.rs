//! Provider utility functions
//!
//! URL processing and endpoint completion.

/// Ollama generate endpoint suffix
pub const OLLAMA_API_SUFFIX: &str = "/api/generate";

/// Ollama model listing suffix
pub const OLLAMA_TAGS_SUFFIX: &str = "/api/tags";

/// Ollama default base URL
pub const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";

/// Smart completion API endpoint
///
/// # Behavior
/// 1. Remove trailing slashes
/// 2. Check whether the URL contains the full path
/// 3. If incomplete, automatically complete suffix
///
/// # Example
/// ```
/// use testgen_rs::llm::provider::utils::complete_endpoint;
///
/// assert_eq!(
///     complete_endpoint("http://localhost:11434", "/api/generate"),
///     "http://localhost:11434/api/generate"
/// );
///
/// assert_eq!(
///     complete_endpoint("http://gpu-box:11434/api/generate", "/api/generate"),
///     "http://gpu-box:11434/api/generate"
/// );
///
/// assert_eq!(
///     complete_endpoint("http://localhost:11434/api", "/api/generate"),
///     "http://localhost:11434/api/generate"
/// );
/// ```
pub fn complete_endpoint(base_url: &str, expected_suffix: &str) -> String {
    let url = base_url.trim_end_matches('/');
    let suffix = expected_suffix.trim_start_matches('/');

    if url.ends_with(suffix) {
        return url.to_string();
    }

    // The URL may already carry a prefix of the suffix, e.g. ".../api"
    let suffix_parts: Vec<&str> = suffix.split('/').collect();
    for i in 0..suffix_parts.len() {
        let partial_suffix = suffix_parts[..=i].join("/");
        if url.ends_with(&partial_suffix) {
            let remaining_suffix = &suffix_parts[i + 1..].join("/");
            if remaining_suffix.is_empty() {
                return url.to_string();
            }
            return format!("{}/{}", url, remaining_suffix);
        }
    }

    if is_complete_api_path(url) {
        return url.to_string();
    }

    format!("{}/{}", url, suffix)
}

/// Path depth >= 2 is treated as a user-supplied complete API path.
fn is_complete_api_path(url: &str) -> bool {
    let path = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, path)| path)
        .unwrap_or("");

    if path.is_empty() {
        return false;
    }

    path.split('/').filter(|s| !s.is_empty()).count() >= 2
}

/// Model family name: the part of a tag before `:`.
///
/// `qwen2.5-coder:7b` → `qwen2.5-coder`
pub fn model_base_name(model: &str) -> &str {
    model.split(':').next().unwrap_or(model)
}
