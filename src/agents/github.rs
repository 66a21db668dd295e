//! Agent 5: branch name, commit message and pull request text.

use serde::{Deserialize, Serialize};

use super::{AgentProfile, run_json_stage};
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};
use crate::models::StageOutput;
use crate::models::lenient_string;

const PROFILE: AgentProfile = AgentProfile {
    name: "GitHub",
    role: "GitHub Release Engineer for Test Code",
    goal: "Propose a branch name, a commit message and a pull request title and body for \
           newly generated test files.",
    backstory: "You keep repositories tidy: short descriptive branch names, commit \
                messages in the imperative mood, and pull request descriptions that tell \
                reviewers what was added and how to run it.",
};

/// Persona of the GitHub agent.
pub fn profile() -> &'static AgentProfile {
    &PROFILE
}

/// What the model suggests. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrProposal {
    #[serde(default, deserialize_with = "lenient_string")]
    pub branch_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub commit_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pr_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pr_body: Option<String>,
}

/// Input of the GitHub agent.
#[derive(Debug, Clone, Copy)]
pub struct PrContext<'a> {
    pub files: &'a [String],
    pub feature_name: &'a str,
    pub scenarios_count: usize,
    pub base_branch: &'a str,
    pub branch_prefix: &'a str,
}

/// Task prompt for the GitHub agent.
pub fn build_prompt(ctx: &PrContext<'_>) -> String {
    let files = ctx
        .files
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Prepare a pull request for the following auto-generated test files.

## Generated Files
{files}

## Context
- Feature: {feature}
- Number of scenarios: {count}
- Target branch: {base}

## Instructions
1. Branch name must start with `{prefix}-` and contain only lowercase letters,
   digits, `-` and `/`
2. Commit message: one imperative line
3. PR title: what tests were added, without a prefix
4. PR body: markdown explaining the tests and how to run them with pytest

## Output
Return only a JSON object:
```json
{{
  "branch_name": "{prefix}-...",
  "commit_message": "...",
  "pr_title": "...",
  "pr_body": "..."
}}
```"#,
        files = files,
        feature = ctx.feature_name,
        count = ctx.scenarios_count,
        base = ctx.base_branch,
        prefix = ctx.branch_prefix
    )
}

/// Runs the GitHub agent.
pub async fn run(
    provider: &dyn LLMProvider,
    ctx: &PrContext<'_>,
    progress: Option<&dyn ProgressReporter>,
) -> Result<StageOutput<PrProposal>> {
    let prompt = build_prompt(ctx);
    run_json_stage(provider, profile(), &prompt, "pull request proposal", progress).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prompt_lists_files_and_prefix() {
        let files = vec!["output/generated_tests/test_login.py".to_string()];
        let prompt = build_prompt(&PrContext {
            files: &files,
            feature_name: "Login",
            scenarios_count: 2,
            base_branch: "develop",
            branch_prefix: "test/auto-generated",
        });
        assert!(prompt.contains("- output/generated_tests/test_login.py"));
        assert!(prompt.contains("- Number of scenarios: 2"));
        assert!(prompt.contains("start with `test/auto-generated-`"));
        assert!(prompt.contains("- Target branch: develop"));
    }

    #[test]
    fn test_partial_proposal() {
        let proposal: PrProposal =
            serde_json::from_str(r#"{"pr_title": "Add login tests", "branch_name": null}"#)
                .unwrap();
        assert_eq!(proposal.pr_title.as_deref(), Some("Add login tests"));
        assert_eq!(proposal.branch_name, None);
        assert_eq!(proposal.pr_body, None);
    }
}
