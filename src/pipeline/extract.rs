//! Recovering the final Python code from model output.

use std::sync::LazyLock;

use regex::Regex;

use crate::llm::provider::base::strip_code_fences;
use crate::models::ReviewOutcome;

static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("valid regex"));

static FINAL_CODE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""final_code"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid regex")
});

static PYTHON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:python|py)[ \t]*\r?\n(.*?)```").expect("valid regex"));

static ANY_JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json.*?```").expect("valid regex"));

/// Where the final code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource {
    /// `final_code` of a JSON object in the reviewer output.
    ReviewerJson,
    /// A `"final_code"` field recovered from broken JSON.
    ReviewerField,
    /// A fenced python block in the reviewer output.
    ReviewerBlock,
    /// The reviewer answered with bare code.
    ReviewerText,
    /// The reviewer gave nothing usable; the generator's code is used.
    Generator,
}

impl CodeSource {
    pub fn from_reviewer(&self) -> bool {
        !matches!(self, CodeSource::Generator)
    }
}

/// Code plus where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCode {
    pub code: String,
    pub source: CodeSource,
}

/// Picks the code to write.
///
/// Tries the reviewer output first, in order: fenced JSON, the already parsed
/// [`ReviewOutcome`], a regex-recovered `final_code` field, a python block and
/// bare code. Falls back to the generator output cleaned the same way.
pub fn select_final_code(
    reviewer_raw: &str,
    reviewer_parsed: Option<&ReviewOutcome>,
    generator_raw: &str,
) -> Option<ExtractedCode> {
    if let Some(code) = from_json_block(reviewer_raw) {
        return Some(found(code, CodeSource::ReviewerJson));
    }

    if let Some(code) = reviewer_parsed
        .and_then(|outcome| outcome.final_code.as_deref())
        .and_then(non_empty_code)
    {
        return Some(found(code, CodeSource::ReviewerJson));
    }

    if let Some((code, source)) = from_text(reviewer_raw) {
        return Some(found(code, source));
    }

    extract_code(generator_raw).map(|code| found(code, CodeSource::Generator))
}

/// Python code in free model output: a `final_code` field, a python block,
/// bare code, or the whole text without fences.
pub fn extract_code(text: &str) -> Option<String> {
    match from_text(text) {
        Some((code, _)) => Some(code),
        None => non_empty_code(&strip_code_fences(text)),
    }
}

/// Code from free text, without the JSON object paths.
fn from_text(text: &str) -> Option<(String, CodeSource)> {
    if let Some(code) = from_final_code_field(text) {
        return Some((code, CodeSource::ReviewerField));
    }
    if let Some(code) = from_python_block(text) {
        return Some((code, CodeSource::ReviewerBlock));
    }
    if let Some(code) = from_bare_code(text) {
        return Some((code, CodeSource::ReviewerText));
    }
    None
}

fn found(code: String, source: CodeSource) -> ExtractedCode {
    ExtractedCode { code, source }
}

fn non_empty_code(code: &str) -> Option<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(unescape_if_flattened(trimmed))
    }
}

fn from_json_block(text: &str) -> Option<String> {
    let captures = JSON_BLOCK.captures(text)?;
    let value: serde_json::Value = serde_json::from_str(captures.get(1)?.as_str()).ok()?;
    value.get("final_code")?.as_str().and_then(non_empty_code)
}

fn from_final_code_field(text: &str) -> Option<String> {
    let captures = FINAL_CODE_FIELD.captures(text)?;
    non_empty_code(&unescape(captures.get(1)?.as_str()))
}

fn from_python_block(text: &str) -> Option<String> {
    let captures = PYTHON_BLOCK.captures(text)?;
    non_empty_code(captures.get(1)?.as_str())
}

fn from_bare_code(text: &str) -> Option<String> {
    if !text.contains("import pytest") && !text.contains("def test_") {
        return None;
    }
    let without_json = ANY_JSON_BLOCK.replace_all(text, "");
    let cleaned = without_json
        .replace("```python", "")
        .replace("```py", "")
        .replace("```", "");
    non_empty_code(&cleaned)
}

/// Undoes JSON string escaping for `\n`, `\t`, `\"`, `\'` and `\\`.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => {}
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Models sometimes double-escape `final_code`, leaving literal `\n` in one long line.
fn unescape_if_flattened(code: &str) -> String {
    if !code.contains('\n') && code.contains("\\n") {
        unescape(code)
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GENERATED: &str = "```python\nimport pytest\n\ndef test_generated():\n    assert True\n```";

    #[test]
    fn test_fenced_json_final_code() {
        let reviewer = "Here is my review:\n```json\n{\"is_valid\": true, \"final_code\": \"import pytest\\n\\ndef test_a():\\n    assert 1\"}\n```";
        let extracted = select_final_code(reviewer, None, GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::ReviewerJson);
        assert_eq!(extracted.code, "import pytest\n\ndef test_a():\n    assert 1");
    }

    #[test]
    fn test_parsed_outcome_used_for_bare_json() {
        let outcome = ReviewOutcome {
            final_code: Some("def test_b():\n    pass\n".into()),
            ..Default::default()
        };
        let extracted = select_final_code("{...}", Some(&outcome), GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::ReviewerJson);
        assert_eq!(extracted.code, "def test_b():\n    pass");
    }

    #[test]
    fn test_double_escaped_final_code() {
        let outcome = ReviewOutcome {
            final_code: Some("import pytest\\ndef test_c():\\n    assert \\\"x\\\"".into()),
            ..Default::default()
        };
        let extracted = select_final_code("", Some(&outcome), GENERATED).unwrap();
        assert_eq!(extracted.code, "import pytest\ndef test_c():\n    assert \"x\"");
    }

    #[test]
    fn test_broken_json_field_recovered_by_regex() {
        // trailing comma makes this invalid JSON
        let reviewer = "{\"is_valid\": false, \"final_code\": \"import pytest\\ndef test_d():\\n    assert 'ok'\", }";
        let extracted = select_final_code(reviewer, None, GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::ReviewerField);
        assert_eq!(extracted.code, "import pytest\ndef test_d():\n    assert 'ok'");
    }

    #[test]
    fn test_broken_json_field_keeps_escaped_quotes() {
        let reviewer = "{\"is_valid\": true, \"final_code\": \"import pytest\\nimport requests\\n\\nHEADERS = {\\\"Content-Type\\\": \\\"application/json\\\"}\\n\\ndef test_a():\\n    assert HEADERS\", }";
        let extracted = select_final_code(reviewer, None, GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::ReviewerField);
        assert_eq!(
            extracted.code,
            "import pytest\nimport requests\n\nHEADERS = {\"Content-Type\": \"application/json\"}\n\ndef test_a():\n    assert HEADERS"
        );
    }

    #[test]
    fn test_python_block() {
        let reviewer = "The code looks good.\n```python\nimport pytest\n\ndef test_e():\n    pass\n```\nDone.";
        let extracted = select_final_code(reviewer, None, GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::ReviewerBlock);
        assert_eq!(extracted.code, "import pytest\n\ndef test_e():\n    pass");
    }

    #[test]
    fn test_bare_code() {
        let reviewer = "import pytest\n\ndef test_f():\n    pass\n";
        let extracted = select_final_code(reviewer, None, GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::ReviewerText);
        assert_eq!(extracted.code, "import pytest\n\ndef test_f():\n    pass");
    }

    #[test]
    fn test_falls_back_to_generator() {
        let extracted = select_final_code("Looks fine to me!", None, GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::Generator);
        assert!(!extracted.source.from_reviewer());
        assert_eq!(extracted.code, "import pytest\n\ndef test_generated():\n    assert True");
    }

    #[test]
    fn test_generator_without_markers_still_used() {
        let extracted = select_final_code("", None, "```\nprint('hello')\n```").unwrap();
        assert_eq!(extracted.code, "print('hello')");
    }

    #[test]
    fn test_extract_code_from_generator_output() {
        assert_eq!(
            extract_code(GENERATED).as_deref(),
            Some("import pytest\n\ndef test_generated():\n    assert True")
        );
        assert_eq!(extract_code("\n\n"), None);
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(select_final_code("no code", None, "   "), None);
    }

    #[test]
    fn test_empty_final_code_is_skipped() {
        let outcome = ReviewOutcome {
            final_code: Some("  ".into()),
            ..Default::default()
        };
        let extracted = select_final_code("", Some(&outcome), GENERATED).unwrap();
        assert_eq!(extracted.source, CodeSource::Generator);
    }

    #[test]
    fn test_unescape_keeps_unknown_sequences() {
        assert_eq!(unescape(r"a\\b\d"), r"a\b\d");
    }
}
