//! GitHub CLI (`gh`) wrapper.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::constants::github::GH_TIMEOUT_SECS;
use crate::error::{Result, TestgenError};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

static PR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pull/(\d+)").expect("valid regex"));

/// Arguments of `gh pr create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    pub base: String,
    pub head: String,
    pub title: String,
    pub body: String,
}

/// Pull request operations on the hosting service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PullRequestOps: Send + Sync {
    /// Whether the `gh` binary can be run.
    async fn is_installed(&self) -> bool;

    /// Whether `gh auth status` succeeds.
    async fn is_authenticated(&self) -> bool;

    /// Opens a pull request and returns its URL.
    async fn create_pull_request(&self, request: &PullRequestRequest) -> Result<String>;
}

/// PR number from a pull request URL.
pub fn pr_number_from_url(url: &str) -> Option<u64> {
    PR_NUMBER
        .captures(url)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// [`PullRequestOps`] backed by the `gh` binary.
#[derive(Debug, Clone)]
pub struct GhCli {
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl Default for GhCli {
    fn default() -> Self {
        Self {
            workdir: None,
            timeout: Duration::from_secs(GH_TIMEOUT_SECS),
        }
    }
}

impl GhCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `gh` inside `workdir` instead of the current directory.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Run gh command and return stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("gh {}", args.first().copied().unwrap_or_default());

        let mut command = Command::new("gh");
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.workdir {
            command.current_dir(dir);
        }

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                TestgenError::GitHub(format!(
                    "gh {} timed out after {}s",
                    args.first().copied().unwrap_or_default(),
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TestgenError::GitHub("GitHub CLI (gh) is not installed".into())
                } else {
                    TestgenError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TestgenError::GitHub(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl PullRequestOps for GhCli {
    async fn is_installed(&self) -> bool {
        self.run(&["--version"]).await.is_ok()
    }

    async fn is_authenticated(&self) -> bool {
        self.run(&["auth", "status"]).await.is_ok()
    }

    async fn create_pull_request(&self, request: &PullRequestRequest) -> Result<String> {
        let stdout = self
            .run(&[
                "pr",
                "create",
                "--base",
                &request.base,
                "--head",
                &request.head,
                "--title",
                &request.title,
                "--body",
                &request.body,
            ])
            .await?;

        // gh 会在 URL 之前输出提示信息，取最后一行
        let url = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| line.starts_with("http"))
            .unwrap_or(stdout.as_str())
            .to_string();
        tracing::info!("Created pull request {}", url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pr_number_from_url() {
        assert_eq!(
            pr_number_from_url("https://github.com/acme/shop/pull/42"),
            Some(42)
        );
        assert_eq!(pr_number_from_url("https://github.com/acme/shop/pulls"), None);
        assert_eq!(pr_number_from_url(""), None);
    }

    #[tokio::test]
    async fn test_missing_binary_in_bad_workdir_is_an_error() {
        let gh = GhCli::new().with_workdir("/nonexistent/testgen/dir");
        let result = gh.run(&["--version"]).await;
        assert!(result.is_err());
        assert!(!gh.is_installed().await);
    }

    #[tokio::test]
    async fn test_mock_pull_request_ops() {
        let mut mock = MockPullRequestOps::new();
        mock.expect_create_pull_request()
            .withf(|req| req.base == "main" && req.title.starts_with("[Auto-Generated] "))
            .returning(|_| Ok("https://github.com/acme/shop/pull/7".into()));

        let url = mock
            .create_pull_request(&PullRequestRequest {
                base: "main".into(),
                head: "test/auto-generated-login-20250101-120000".into(),
                title: "[Auto-Generated] Add tests for Login".into(),
                body: "body".into(),
            })
            .await
            .unwrap();
        assert_eq!(pr_number_from_url(&url), Some(7));
    }
}
