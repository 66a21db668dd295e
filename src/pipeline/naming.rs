//! Names derived from the scenario: feature, file, branch.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::constants::github::MAX_BRANCH_SUFFIX_LENGTH;
use crate::constants::output::{FALLBACK_FILENAME, MAX_FEATURE_NAME_LENGTH};
use crate::models::ParsedScenario;

static FEATURE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Feature:\s*(.+)").expect("valid regex"));

static SCENARIO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*Scenario(?: Outline| Template)?:").expect("valid regex")
});

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Feature name of a scenario.
///
/// The text after the first `Feature:`, else the parser's `feature_name`, else the
/// first non-empty line cut to 50 characters.
pub fn feature_name(scenario_text: &str, parsed: Option<&ParsedScenario>) -> String {
    if let Some(name) = FEATURE_LINE
        .captures(scenario_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
    {
        return name.to_string();
    }

    if let Some(name) = parsed
        .map(|p| p.feature_name.trim())
        .filter(|name| !name.is_empty())
    {
        return name.to_string();
    }

    scenario_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            line.chars()
                .take(MAX_FEATURE_NAME_LENGTH)
                .collect::<String>()
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

/// Number of `Scenario:` blocks, at least one.
pub fn count_scenarios(scenario_text: &str) -> usize {
    SCENARIO_LINE.find_iter(scenario_text).count().max(1)
}

/// Lowercases and collapses every run of characters outside `[a-z0-9]` into `sep`.
fn slug(text: &str, sep: &str) -> String {
    NON_ALNUM
        .replace_all(&text.to_lowercase(), sep)
        .trim_matches(|c| sep.contains(c))
        .to_string()
}

/// `test_<snake>.py`, or `test_generated.py` when nothing usable is left.
pub fn test_filename(feature_name: &str) -> String {
    let name = slug(feature_name, "_");
    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("test_{}.py", name)
    }
}

/// Feature part of a branch name: lowercased, at most 20 characters, non-alphanumerics as `-`.
pub fn branch_suffix(feature_name: &str) -> String {
    let lowered: String = feature_name
        .to_lowercase()
        .chars()
        .take(MAX_BRANCH_SUFFIX_LENGTH)
        .collect();
    slug(&lowered, "-")
}

/// `<prefix>-<suffix>-<YYYYmmdd-HHMMSS>`; the suffix is skipped when empty.
pub fn branch_name(prefix: &str, feature_name: &str, now: NaiveDateTime) -> String {
    let timestamp = now.format("%Y%m%d-%H%M%S");
    let suffix = branch_suffix(feature_name);
    if suffix.is_empty() {
        format!("{}-{}", prefix, timestamp)
    } else {
        format!("{}-{}-{}", prefix, suffix, timestamp)
    }
}

/// Whether `name` is acceptable as a git branch name.
///
/// Mirrors the main rules of `git check-ref-format --branch`.
pub fn is_valid_branch_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.ends_with('.')
        && !name.ends_with(".lock")
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("@{")
        && !name.split('/').any(|part| part.starts_with('.'))
        && !name
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || "~^:?*[\\".contains(c))
}
