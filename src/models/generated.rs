//! Reviewer output, written files and the run summary.

use serde::{Deserialize, Serialize};

/// What the reviewer reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    #[serde(default = "default_true")]
    pub is_valid: bool,

    #[serde(default)]
    pub review_notes: Vec<String>,

    #[serde(default)]
    pub improvements_made: Vec<String>,

    #[serde(default)]
    pub final_code: Option<String>,
}

impl Default for ReviewOutcome {
    fn default() -> Self {
        Self {
            is_valid: true,
            review_notes: Vec::new(),
            improvements_made: Vec::new(),
            final_code: None,
        }
    }
}

/// A test file produced by the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTest {
    pub filename: String,
    pub content: String,
    pub test_count: usize,
    pub is_valid: bool,
    #[serde(default)]
    pub review_notes: Vec<String>,
}

impl GeneratedTest {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            filename: filename.into(),
            test_count: count_tests(&content),
            content,
            is_valid: true,
            review_notes: Vec::new(),
        }
    }
}

/// Number of `def test_` functions in `content`, never less than one.
pub fn count_tests(content: &str) -> usize {
    content
        .lines()
        .filter(|line| line.trim_start().starts_with("def test_"))
        .count()
        .max(1)
}

/// Outcome of the pull request flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrMetadata {
    pub branch_name: String,
    pub title: String,
    pub body: String,
    pub base_branch: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PrMetadata {
    /// Marks the flow as failed with `message`, keeping what was done so far.
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(message.into());
        self
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub input_file: String,
    #[serde(default)]
    pub feature_name: String,
    pub scenarios_count: usize,
    #[serde(default)]
    pub generated_tests: Vec<GeneratedTest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_metadata: Option<PrMetadata>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl WorkflowResult {
    pub fn new(input_file: impl Into<String>, scenarios_count: usize) -> Self {
        Self {
            input_file: input_file.into(),
            feature_name: String::new(),
            scenarios_count,
            generated_tests: Vec::new(),
            pr_metadata: None,
            success: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("warning: {}", message);
        self.warnings.push(message);
    }

    /// Records an error and marks the run as failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = false;
        self.errors.push(message.into());
    }

    /// Total number of test functions across all generated files.
    pub fn total_tests(&self) -> usize {
        self.generated_tests.iter().map(|t| t.test_count).sum()
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_count_tests() {
        let code = "import pytest\n\nclass TestX:\n    def test_a(self):\n        pass\n\n    def test_b(self):\n        pass\n\n    def helper(self):\n        pass\n";
        assert_eq!(count_tests(code), 2);
        assert_eq!(count_tests("print('no tests')"), 1);
    }

    #[test]
    fn test_review_outcome_defaults_to_valid() {
        let outcome: ReviewOutcome = serde_json::from_str(r#"{"final_code": "x = 1"}"#).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.final_code.as_deref(), Some("x = 1"));
        assert!(outcome.review_notes.is_empty());
    }

    #[test]
    fn test_workflow_result_fail_and_totals() {
        let mut result = WorkflowResult::new("login.feature", 1);
        result.generated_tests.push(GeneratedTest::new(
            "test_login.py",
            "def test_a():\n    pass\ndef test_b():\n    pass\n",
        ));
        assert_eq!(result.total_tests(), 2);
        assert!(result.success);

        result.fail("boom");
        assert!(!result.success);
        assert_eq!(result.errors, vec!["boom"]);
    }

    #[test]
    fn test_workflow_result_json_omits_missing_pr() {
        let result = WorkflowResult::new("in.txt", 1);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("pr_metadata").is_none());
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_pr_metadata_fail_keeps_branch() {
        let pr = PrMetadata {
            branch_name: "test/auto-generated-login-20260101-000000".into(),
            title: "Add tests for Login".into(),
            body: String::new(),
            base_branch: "main".into(),
            files: vec![],
            commit_hash: Some("abc1234".into()),
            pr_url: None,
            pr_number: None,
            success: true,
            error_message: None,
        }
        .fail("push rejected");

        assert!(!pr.success);
        assert_eq!(pr.error_message.as_deref(), Some("push rejected"));
        assert_eq!(pr.commit_hash.as_deref(), Some("abc1234"));
    }
}
