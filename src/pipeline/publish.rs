//! Branch, commit, push and pull request for generated files.
//!
//! Nothing here fails the run: every problem ends up in
//! [`PrMetadata::error_message`] with `success == false`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::naming;
use super::{PipelineObserver, Stage};
use crate::agents::github::{self, PrContext, PrProposal};
use crate::config::GitHubConfig;
use crate::git::github::pr_number_from_url;
use crate::git::{GitOperations, PullRequestOps, PullRequestRequest};
use crate::llm::LLMProvider;
use crate::models::PrMetadata;

/// What is being published.
#[derive(Debug, Clone)]
pub struct PublishRequest<'a> {
    /// Written test files, as paths usable from the current directory.
    pub files: &'a [PathBuf],
    pub feature_name: &'a str,
    pub scenarios_count: usize,
    /// Time stamped into the default branch name.
    pub now: NaiveDateTime,
}

/// Runs the pull request flow.
pub struct Publisher<'a> {
    provider: &'a dyn LLMProvider,
    git: &'a dyn GitOperations,
    github: &'a dyn PullRequestOps,
    config: &'a GitHubConfig,
    observer: &'a dyn PipelineObserver,
}

impl<'a> Publisher<'a> {
    pub fn new(
        provider: &'a dyn LLMProvider,
        git: &'a dyn GitOperations,
        github: &'a dyn PullRequestOps,
        config: &'a GitHubConfig,
        observer: &'a dyn PipelineObserver,
    ) -> Self {
        Self {
            provider,
            git,
            github,
            config,
            observer,
        }
    }

    pub async fn publish(&self, request: &PublishRequest<'_>) -> PrMetadata {
        let files = display_paths(request.files, &self.git.workdir());
        let mut meta = PrMetadata {
            branch_name: String::new(),
            title: String::new(),
            body: String::new(),
            base_branch: self.config.base_branch.clone(),
            files: files.clone(),
            commit_hash: None,
            pr_url: None,
            pr_number: None,
            success: false,
            error_message: None,
        };

        match self.git.has_staged_changes() {
            Ok(false) => {}
            Ok(true) => {
                return meta.fail(
                    "The git index already has staged changes; commit or unstage them first",
                );
            }
            Err(e) => return meta.fail(e.to_string()),
        }

        self.observer.stage_started(Stage::Publish);
        let proposal = self.propose(&files, request).await;

        meta.branch_name = self.choose_branch(proposal.branch_name.as_deref(), request);
        let title = non_blank(proposal.pr_title)
            .unwrap_or_else(|| default_title(request.feature_name));
        meta.title = prefixed_title(&self.config.pr_title_prefix, &title);
        meta.body = non_blank(proposal.pr_body).unwrap_or_else(|| {
            default_body(request.feature_name, request.scenarios_count, &files)
        });
        let commit_message = non_blank(proposal.commit_message)
            .map(|m| m.lines().next().unwrap_or_default().trim().to_string())
            .unwrap_or_else(|| default_commit_message(request.feature_name));

        match self.git.current_branch() {
            Ok(Some(from)) => tracing::debug!("Branching {} from {}", meta.branch_name, from),
            Ok(None) => tracing::debug!("Branching {} from a detached HEAD", meta.branch_name),
            Err(e) => tracing::debug!("Current branch unknown: {}", e),
        }
        if let Err(e) = self.git.create_branch(&meta.branch_name) {
            return meta.fail(e.to_string());
        }
        if let Err(e) = self.git.stage_files(request.files) {
            return meta.fail(e.to_string());
        }
        match self.git.commit(&commit_message) {
            Ok(hash) => meta.commit_hash = Some(hash),
            Err(e) => return meta.fail(e.to_string()),
        }
        if let Err(e) = self.git.push(&self.config.remote, &meta.branch_name) {
            return meta.fail(e.to_string());
        }

        if !self.github.is_installed().await {
            return meta.fail("GitHub CLI (gh) is not installed");
        }
        if !self.github.is_authenticated().await {
            return meta.fail("GitHub CLI is not authenticated");
        }

        let pr = PullRequestRequest {
            base: meta.base_branch.clone(),
            head: meta.branch_name.clone(),
            title: meta.title.clone(),
            body: meta.body.clone(),
        };
        match self.github.create_pull_request(&pr).await {
            Ok(url) => {
                meta.pr_number = pr_number_from_url(&url);
                self.observer.stage_finished(Stage::Publish, &url);
                meta.pr_url = Some(url);
                meta.success = true;
                meta
            }
            Err(e) => meta.fail(e.to_string()),
        }
    }

    /// Asks the GitHub agent for names and text; any failure yields an empty proposal.
    async fn propose(&self, files: &[String], request: &PublishRequest<'_>) -> PrProposal {
        let ctx = PrContext {
            files,
            feature_name: request.feature_name,
            scenarios_count: request.scenarios_count,
            base_branch: &self.config.base_branch,
            branch_prefix: &self.config.branch_prefix,
        };
        match github::run(self.provider, &ctx, self.observer.progress()).await {
            Ok(output) => output.parsed.unwrap_or_else(|| {
                tracing::warn!("GitHub agent output is not valid JSON; using defaults");
                PrProposal::default()
            }),
            Err(e) => {
                tracing::warn!("GitHub agent failed, using defaults: {}", e);
                PrProposal::default()
            }
        }
    }

    fn choose_branch(&self, proposed: Option<&str>, request: &PublishRequest<'_>) -> String {
        let prefix = format!("{}-", self.config.branch_prefix);
        match proposed.map(str::trim) {
            Some(name) if name.starts_with(&prefix) && naming::is_valid_branch_name(name) => {
                name.to_string()
            }
            Some(name) => {
                tracing::debug!("Ignoring proposed branch name '{}'", name);
                naming::branch_name(&self.config.branch_prefix, request.feature_name, request.now)
            }
            None => {
                naming::branch_name(&self.config.branch_prefix, request.feature_name, request.now)
            }
        }
    }
}

/// Metadata for a flow that could not start, e.g. outside a repository.
pub fn failed(base_branch: &str, files: &[PathBuf], message: impl Into<String>) -> PrMetadata {
    PrMetadata {
        branch_name: String::new(),
        title: String::new(),
        body: String::new(),
        base_branch: base_branch.to_string(),
        files: files.iter().map(|f| f.display().to_string()).collect(),
        commit_hash: None,
        pr_url: None,
        pr_number: None,
        success: false,
        error_message: None,
    }
    .fail(message)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Paths relative to the repository root when possible.
fn display_paths(files: &[PathBuf], workdir: &Path) -> Vec<String> {
    let cwd = std::env::current_dir().unwrap_or_default();
    let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
    files
        .iter()
        .map(|f| {
            let absolute = if f.is_absolute() { f.clone() } else { cwd.join(f) };
            let absolute = absolute.canonicalize().unwrap_or(absolute);
            absolute
                .strip_prefix(&workdir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| f.clone())
                .display()
                .to_string()
        })
        .collect()
}

pub fn default_title(feature_name: &str) -> String {
    format!("Add tests for {}", feature_name)
}

pub fn default_commit_message(feature_name: &str) -> String {
    format!("Add auto-generated tests for {}", feature_name)
}

/// `prefix + title`, without doubling a prefix the model already added.
pub fn prefixed_title(prefix: &str, title: &str) -> String {
    let title = title.trim();
    if !prefix.trim().is_empty() && title.starts_with(prefix.trim()) {
        title.to_string()
    } else {
        format!("{}{}", prefix, title)
    }
}

/// Markdown body used when the agent gives none.
pub fn default_body(feature_name: &str, scenarios_count: usize, files: &[String]) -> String {
    let files_list = files
        .iter()
        .map(|f| format!("- `{}`", f))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"## Auto-Generated Test Cases

### Summary
- **Feature**: {feature}
- **Scenarios**: {count} test scenario(s)
- **Files Generated**: {file_count}

### Generated Files
{files_list}

### How to Run
```bash
pytest {run_args} -v
```

### Notes
- These tests were generated from text scenarios by a local LLM
- Review selectors, endpoints and test data before merging
"#,
        feature = feature_name,
        count = scenarios_count,
        file_count = files.len(),
        files_list = files_list,
        run_args = files.join(" ")
    )
}
