//! Response handling and JSON cleaning
//!
//! Local models wrap answers in prose and markdown fences more often than hosted
//! ones; these helpers dig the payload out.

use serde::de::DeserializeOwned;

use crate::constants::ui::ERROR_PREVIEW_LENGTH;
use crate::error::{Result, TestgenError};

/// Clean JSON response (remove markdown code block tags)
pub fn clean_json_response(response: &str) -> &str {
    let trimmed = response.trim();

    // Extract content between { to }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
    {
        return &trimmed[start..=end];
    }

    // Backup: Fallback to removing markdown code block tags
    let without_prefix = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|s| s.trim_start())
        .unwrap_or(trimmed);

    without_prefix
        .strip_suffix("```")
        .map(|s| s.trim_end())
        .unwrap_or(without_prefix)
        .trim()
}

/// Truncate string for error preview (safe handling of multibyte characters)
pub fn truncate_for_preview(s: &str) -> String {
    truncate_to(s, ERROR_PREVIEW_LENGTH)
}

/// Truncate to at most `max_len` bytes on a char boundary, appending `...` when cut.
pub fn truncate_to(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let boundary = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_len)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..boundary])
}

/// Parse a JSON object out of a model response.
///
/// `what` names the expected payload in the error message.
pub fn parse_json_response<T: DeserializeOwned>(response: &str, what: &str) -> Result<T> {
    let cleaned = clean_json_response(response);
    serde_json::from_str(cleaned).map_err(|e| {
        let preview = truncate_for_preview(response);
        TestgenError::Llm(format!(
            "Failed to parse {} from LLM response: {}. Response preview: {}",
            what, e, preview
        ))
    })
}

/// Strip a surrounding markdown code fence, if any.
///
/// ````text
/// ```python
/// def test_x(): ...
/// ```
/// ````
/// becomes `def test_x(): ...`. Text without an outer fence is only trimmed.
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();

    // ```<lang>\n...\n``` with an optional language tag
    if let Some(rest) = trimmed.strip_prefix("```") {
        let after_lang = if let Some(newline_pos) = rest.find('\n') {
            let lang_part = &rest[..newline_pos];
            if lang_part.trim().len() <= 20 && !lang_part.contains(' ') {
                &rest[newline_pos + 1..]
            } else {
                rest
            }
        } else {
            rest
        };

        let inner = after_lang.strip_suffix("```").unwrap_or(after_lang);
        return inner.trim().to_string();
    }

    trimmed.to_string()
}
