use std::path::PathBuf;

use clap::{Parser, builder::styling};

use crate::config::TestFramework;

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Generate Playwright or pytest API tests from text scenarios with a local LLM
#[derive(Parser, Debug)]
#[command(name = "testgen")]
#[command(author, version, long_about = None)]
#[command(styles = STYLES)]
pub struct Cli {
    /// Scenario file (Gherkin, plain English or user story)
    #[arg(short, long, value_name = "FILE", required_unless_present = "print_config")]
    pub input: Option<PathBuf>,

    /// Output directory for generated tests [default: output/generated_tests]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Commit the generated file on a new branch, push it and open a pull request
    #[arg(long)]
    pub push_pr: bool,

    /// Target branch of the pull request [default: main]
    #[arg(long, value_name = "BRANCH")]
    pub base_branch: Option<String>,

    /// Ollama model [default: qwen2.5-coder:7b]
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Test style: playwright | api [default: api]
    #[arg(long, value_name = "FRAMEWORK")]
    pub framework: Option<TestFramework>,

    /// Skip the Ollama and git/gh checks
    #[arg(long)]
    pub skip_checks: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run result as JSON (implies --quiet)
    #[arg(long)]
    pub json: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
