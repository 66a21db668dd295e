//! Python syntax check through the local interpreter.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use which::which;

const PARSE_SCRIPT: &str = "import ast, sys\nast.parse(sys.stdin.read(), '<generated>')";
const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a syntax check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxCheck {
    Valid,
    /// The interpreter rejected the code; holds its error line.
    Invalid(String),
    /// No interpreter on PATH, or it could not be run.
    Unavailable(String),
}

fn find_python() -> Option<PathBuf> {
    which("python3").or_else(|_| which("python")).ok()
}

/// Parses `code` with `ast.parse` without executing it.
pub async fn check_python_syntax(code: &str) -> SyntaxCheck {
    let Some(python) = find_python() else {
        return SyntaxCheck::Unavailable("python3 not found on PATH".to_string());
    };

    match tokio::time::timeout(CHECK_TIMEOUT, run_parser(&python, code)).await {
        Ok(Ok(check)) => check,
        Ok(Err(e)) => SyntaxCheck::Unavailable(format!("failed to run {}: {}", python.display(), e)),
        Err(_) => SyntaxCheck::Unavailable("syntax check timed out".to_string()),
    }
}

async fn run_parser(python: &Path, code: &str) -> std::io::Result<SyntaxCheck> {
    tracing::debug!("Checking syntax with {}", python.display());

    let mut child = Command::new(python)
        .args(["-c", PARSE_SCRIPT])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(code.as_bytes()).await?;
        // dropping stdin closes the pipe so the interpreter sees EOF
    }

    let output = child.wait_with_output().await?;
    if output.status.success() {
        return Ok(SyntaxCheck::Valid);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("syntax error")
        .trim()
        .to_string();
    Ok(SyntaxCheck::Invalid(message))
}
