//! Command implementations.
//!
//! # Modules
//! - `generate` - Scenario to test file flow, optionally followed by a pull request.
//! - `preflight` - Model server and git tooling checks.
//! - `format` - Output format definition.
//! - `options` - Command option structs.
//! - `json` - JSON output helpers.
//!
//! # Architecture
//! ```text
//! CLI (cli.rs)
//!   └── commands/generate.rs
//!         ├── commands/preflight.rs
//!         ├── pipeline::TestPipeline
//!         └── pipeline::publish::Publisher
//! ```

/// Output format types.
pub mod format;
/// Test generation command flow.
pub mod generate;
/// Shared JSON output helpers.
pub mod json;
/// Command option structs.
pub mod options;
/// Checks run before generation.
pub mod preflight;

pub use format::OutputFormat;
pub use options::{ConfigOverrides, GenerateOptions};
