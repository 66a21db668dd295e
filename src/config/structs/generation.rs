//! Test generation settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::output::DEFAULT_OUTPUT_DIR;

/// Target style of the generated test file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    /// Browser test using pytest-playwright's `page` fixture and `expect()`.
    Playwright,
    /// HTTP API test using pytest and `requests`.
    #[default]
    Api,
}

impl std::fmt::Display for TestFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestFramework::Playwright => write!(f, "playwright"),
            TestFramework::Api => write!(f, "api"),
        }
    }
}

impl std::str::FromStr for TestFramework {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "playwright" | "ui" | "web" => Ok(TestFramework::Playwright),
            "api" | "pytest" | "requests" => Ok(TestFramework::Api),
            _ => Err(format!(
                "Unknown framework: '{}' (expected 'playwright' or 'api')",
                s
            )),
        }
    }
}

impl TestFramework {
    /// Import lines a generated file is expected to contain.
    pub fn required_imports(&self) -> &'static [&'static str] {
        match self {
            TestFramework::Playwright => &[
                "import pytest",
                "from playwright.sync_api import Page, expect",
            ],
            TestFramework::Api => &["import pytest", "import requests"],
        }
    }
}

/// Generation configuration.
///
/// # Fields
/// - `framework`: `playwright` or `api` (default: `api`)
/// - `output_dir`: directory for generated files (default: `output/generated_tests`)
/// - `syntax_check`: parse the result with `python3` when available (default: `true`)
/// - `base_url`: application URL handed to Playwright prompts
/// - `browser`: browser named in Playwright prompts
///
/// # Example
/// ```toml
/// [generation]
/// framework = "playwright"
/// base_url = "https://staging.example.com"
/// syntax_check = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub framework: TestFramework,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_true")]
    pub syntax_check: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_browser")]
    pub browser: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            framework: TestFramework::default(),
            output_dir: default_output_dir(),
            syntax_check: true,
            base_url: default_base_url(),
            browser: default_browser(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_browser() -> String {
    "chromium".to_string()
}
