use std::path::Path;
use std::process::Command;

use crate::error::{Result, TestgenError};

/// Runs `git <args>` in `cwd` and returns trimmed stdout.
///
/// All repository writes go through here; git2 is only used for reads.
pub fn run_git(cwd: &Path, args: &[&str]) -> Result<String> {
    tracing::debug!("git {}", args.join(" "));

    let output = Command::new("git").args(args).current_dir(cwd).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_msg = if stderr.trim().is_empty() {
            // Some git errors are output to stdout instead of stderr
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(TestgenError::GitCommand(format!(
            "git {} failed: {}",
            args.first().copied().unwrap_or_default(),
            error_msg
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
