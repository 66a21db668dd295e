//! command option structure
//!
//! Built from the parsed CLI and handed to `commands::generate::run()`.
//!
//! # Example
//! ```no_run
//! use std::path::Path;
//! use testgen_rs::commands::options::GenerateOptions;
//! use testgen_rs::commands::format::OutputFormat;
//!
//! let options = GenerateOptions {
//!     input: Path::new("scenarios/login.feature"),
//!     output: None,
//!     push_pr: false,
//!     base_branch: None,
//!     model: None,
//!     framework: None,
//!     skip_checks: true,
//!     verbose: false,
//!     quiet: false,
//!     format: OutputFormat::Text,
//! };
//! ```

use std::path::Path;

use super::format::OutputFormat;
use crate::cli::Cli;
use crate::config::{AppConfig, TestFramework};
use crate::error::{Result, TestgenError};

/// Generate command options
///
/// `None` fields keep the configured value.
#[derive(Debug, Clone)]
pub struct GenerateOptions<'a> {
    /// Scenario file
    pub input: &'a Path,

    /// Output directory override
    pub output: Option<&'a Path>,

    /// Run the pull request flow after writing the file
    pub push_pr: bool,

    /// Pull request target branch override
    pub base_branch: Option<&'a str>,

    /// Model override
    pub model: Option<&'a str>,

    /// Framework override
    pub framework: Option<TestFramework>,

    /// Skip preflight checks
    pub skip_checks: bool,

    /// Whether to use verbose mode (stage previews)
    pub verbose: bool,

    /// No banner, no step output
    pub quiet: bool,

    /// Output format
    pub format: OutputFormat,
}

impl<'a> GenerateOptions<'a> {
    /// Constructed from CLI parameters
    pub fn from_cli(cli: &'a Cli) -> Result<Self> {
        let input = cli
            .input
            .as_deref()
            .ok_or_else(|| TestgenError::InvalidInput("--input is required".into()))?;

        let format = OutputFormat::from_cli(cli.json);
        Ok(Self {
            input,
            output: cli.output.as_deref(),
            push_pr: cli.push_pr,
            base_branch: cli.base_branch.as_deref(),
            model: cli.model.as_deref(),
            framework: cli.framework,
            skip_checks: cli.skip_checks,
            verbose: cli.verbose,
            quiet: cli.quiet || format.is_json(),
            format,
        })
    }

    /// Whether progress output is shown.
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Configuration values set on the command line
///
/// Unlike [`GenerateOptions`] this does not need `--input`, so `--print-config`
/// can show the effective configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides<'a> {
    pub output: Option<&'a Path>,
    pub model: Option<&'a str>,
    pub framework: Option<TestFramework>,
    pub base_branch: Option<&'a str>,
    pub format: OutputFormat,
}

impl<'a> ConfigOverrides<'a> {
    pub fn from_cli(cli: &'a Cli) -> Self {
        Self {
            output: cli.output.as_deref(),
            model: cli.model.as_deref(),
            framework: cli.framework,
            base_branch: cli.base_branch.as_deref(),
            format: OutputFormat::from_cli(cli.json),
        }
    }

    /// Applies the CLI overrides on top of the loaded configuration.
    ///
    /// CLI flags have the highest priority of all configuration sources.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(output) = self.output {
            config.generation.output_dir = output.to_path_buf();
        }
        if let Some(model) = self.model {
            config.llm.model = model.to_string();
        }
        if let Some(framework) = self.framework {
            config.generation.framework = framework;
        }
        if let Some(base_branch) = self.base_branch {
            config.github.base_branch = base_branch.to_string();
        }
        if self.format.is_json() {
            config.ui.colored = false;
        }
    }
}
