//! Branch and pull request settings for the `--push-pr` flow.

use serde::{Deserialize, Serialize};

use crate::constants::github::{
    DEFAULT_BASE_BRANCH, DEFAULT_BRANCH_PREFIX, DEFAULT_PR_TITLE_PREFIX,
};

/// GitHub configuration.
///
/// # Example
/// ```toml
/// [github]
/// base_branch = "develop"
/// branch_prefix = "qa/generated"
/// pr_title_prefix = "[QA] "
/// remote = "upstream"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// Target branch of the pull request.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Prefix of every generated branch name.
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// Prepended to the pull request title.
    #[serde(default = "default_pr_title_prefix")]
    pub pr_title_prefix: String,

    /// Remote the branch is pushed to.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            branch_prefix: default_branch_prefix(),
            pr_title_prefix: default_pr_title_prefix(),
            remote: default_remote(),
        }
    }
}

fn default_base_branch() -> String {
    DEFAULT_BASE_BRANCH.to_string()
}

fn default_branch_prefix() -> String {
    DEFAULT_BRANCH_PREFIX.to_string()
}

fn default_pr_title_prefix() -> String {
    DEFAULT_PR_TITLE_PREFIX.to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}
