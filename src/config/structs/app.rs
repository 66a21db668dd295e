//! Top-level application configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TestgenError};

use super::generation::GenerationConfig;
use super::github::GitHubConfig;
use super::llm::LLMConfig;
use super::network::NetworkConfig;

/// Application configuration.
///
/// Effective configuration is merged from multiple sources (low to high):
/// 1. Rust defaults (`Default` + `serde(default)`)
/// 2. User-level config file (platform-specific config directory)
/// 3. Project-level config (`./testgen.toml`)
/// 4. `TESTGEN__*` environment variables
/// 5. Command-line flags (`--model`, `--output`, `--base-branch`, `--framework`)
///
/// # Configuration File Locations
/// - Linux: `~/.config/testgen/config.toml`
/// - macOS: `~/Library/Application Support/testgen/config.toml`
/// - Windows: `%APPDATA%\testgen\config\config.toml`
/// - Project level (optional): `./testgen.toml`
///
/// # Example
/// ```toml
/// [llm]
/// model = "qwen2.5-coder:7b"
/// endpoint = "http://localhost:11434"
///
/// [generation]
/// framework = "playwright"
/// output_dir = "tests/generated"
///
/// [github]
/// base_branch = "develop"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Local model settings.
    #[serde(default)]
    pub llm: LLMConfig,

    /// HTTP timeout and retry settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// What gets generated and where it is written.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Branch, commit and pull request settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Terminal UI behavior.
    #[serde(default)]
    pub ui: UIConfig,
}

impl AppConfig {
    /// Validates configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.network.validate()?;
        if self.github.branch_prefix.trim().is_empty() {
            return Err(TestgenError::Config(
                "github.branch_prefix cannot be empty".into(),
            ));
        }
        if self.generation.output_dir.as_os_str().is_empty() {
            return Err(TestgenError::Config(
                "generation.output_dir cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// UI configuration.
///
/// # Example
/// ```toml
/// [ui]
/// colored = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UIConfig {
    /// Whether to enable color output.
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self { colored: true }
    }
}

fn default_true() -> bool {
    true
}
