//! Checks run before the first model call.

use which::which;

use crate::error::Result;
use crate::git::{PullRequestOps, find_git_root};
use crate::llm::LLMProvider;

/// Verifies the model server and, for `--push-pr`, the git tooling.
///
/// An unreachable server or a missing model is an error. Git and GitHub CLI
/// problems only produce warnings, since generation itself does not need them.
pub async fn run(provider: &dyn LLMProvider, pr_ops: Option<&dyn PullRequestOps>) -> Result<Vec<String>> {
    provider.validate().await?;
    tracing::debug!("{} provider is ready", provider.name());

    let Some(pr_ops) = pr_ops else {
        return Ok(Vec::new());
    };

    let mut warnings = Vec::new();
    if which("git").is_err() {
        warnings.push("git is not installed; the pull request step will fail".to_string());
    } else if find_git_root().is_none() {
        warnings.push("Not inside a git repository; the pull request step will fail".to_string());
    }

    if !pr_ops.is_installed().await {
        warnings.push("GitHub CLI (gh) is not installed; install it from https://cli.github.com".to_string());
    } else if !pr_ops.is_authenticated().await {
        warnings.push("GitHub CLI is not authenticated; run 'gh auth login'".to_string());
    }

    Ok(warnings)
}
