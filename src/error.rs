use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TestgenError>;

#[derive(Error, Debug)]
pub enum TestgenError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Git command failed: {0}")]
    GitCommand(String),

    #[error("GitHub CLI error: {0}")]
    GitHub(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM provider error: {0}")]
    Llm(String),

    #[error("LLM API error ({status}): {message}")]
    LlmApi { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input scenario is empty")]
    EmptyInput,

    #[error("Prerequisite check failed: {0}")]
    Prerequisite(String),

    #[error("Test generation failed: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 通用错误类型，用于不适合其他分类的错误
    #[error("{0}")]
    Other(String),
}

impl TestgenError {
    /// 获取错误的解决建议
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            TestgenError::InputNotFound(_) => {
                Some("Check the --input path; it is resolved relative to the current directory")
            }
            TestgenError::EmptyInput => {
                Some("Write at least one scenario (Gherkin, plain English or user story) into the input file")
            }
            TestgenError::Prerequisite(msg) if msg.contains("not running") => {
                Some("Start the server with 'ollama serve', or pass --skip-checks to bypass")
            }
            TestgenError::Prerequisite(msg) if msg.contains("not available") => {
                Some("Pull the model first, e.g. 'ollama pull qwen2.5-coder:7b'")
            }
            TestgenError::GitHub(msg) if msg.contains("not authenticated") => {
                Some("Run 'gh auth login' and try again")
            }
            TestgenError::GitHub(msg) if msg.contains("not installed") => {
                Some("Install the GitHub CLI: https://cli.github.com")
            }
            TestgenError::Config(_) | TestgenError::ConfigParse(_) => Some(
                "Check ~/.config/testgen/config.toml, ./testgen.toml and TESTGEN__* environment variables",
            ),
            TestgenError::Network(_) => {
                Some("Check that Ollama is reachable at the configured llm.endpoint")
            }
            TestgenError::Llm(msg) if msg.contains("timeout") => Some(
                "The model took too long. Raise network.request_timeout or use a smaller model",
            ),
            TestgenError::Llm(msg) if msg.contains("connection failed") => {
                Some("Cannot connect to Ollama. Is 'ollama serve' running on the configured endpoint?")
            }
            TestgenError::LlmApi { status: 404, .. } => {
                Some("The model is probably not pulled. Run 'ollama pull <model>'")
            }
            TestgenError::LlmApi { status: 500..=599, .. } => {
                Some("The Ollama server reported an internal error. Check 'ollama serve' logs")
            }
            TestgenError::Llm(msg) if msg.contains("Failed to parse") => {
                Some("Try the --verbose flag to see the full LLM response and debug the issue")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_input_not_found() {
        let err = TestgenError::InputNotFound(PathBuf::from("missing.feature"));
        assert!(err.suggestion().unwrap().contains("--input"));
        assert_eq!(err.to_string(), "Input file not found: missing.feature");
    }

    #[test]
    fn test_suggestion_ollama_not_running() {
        let err = TestgenError::Prerequisite("Ollama is not running at http://localhost:11434".into());
        assert!(err.suggestion().unwrap().contains("ollama serve"));
    }

    #[test]
    fn test_suggestion_model_missing() {
        let err = TestgenError::Prerequisite("Model 'llama3' is not available".into());
        assert!(err.suggestion().unwrap().contains("ollama pull"));
    }

    #[test]
    fn test_suggestion_gh_auth() {
        let err = TestgenError::GitHub("GitHub CLI is not authenticated".into());
        assert_eq!(err.suggestion(), Some("Run 'gh auth login' and try again"));
    }

    #[test]
    fn test_suggestion_llm_api_statuses() {
        let not_found = TestgenError::LlmApi {
            status: 404,
            message: "model not found".into(),
        };
        assert!(not_found.suggestion().unwrap().contains("ollama pull"));

        let server = TestgenError::LlmApi {
            status: 503,
            message: "busy".into(),
        };
        assert!(server.suggestion().unwrap().contains("internal error"));
    }

    #[test]
    fn test_suggestion_llm_timeout_and_connection() {
        let timeout = TestgenError::Llm("Ollama API request timeout: 120s".into());
        assert!(timeout.suggestion().unwrap().contains("request_timeout"));

        let conn = TestgenError::Llm("Ollama API connection failed: refused".into());
        assert!(conn.suggestion().unwrap().contains("ollama serve"));
    }

    #[test]
    fn test_suggestion_returns_none_for_other_errors() {
        let cases = vec![
            TestgenError::InvalidInput("bad".into()),
            TestgenError::Other("random".into()),
            TestgenError::GitCommand("git failed".into()),
            TestgenError::Generation("nothing".into()),
            TestgenError::Llm("some random llm error".into()),
            TestgenError::LlmApi {
                status: 400,
                message: "bad request".into(),
            },
        ];

        for err in cases {
            assert!(
                err.suggestion().is_none(),
                "Expected None for {:?}, got {:?}",
                err,
                err.suggestion()
            );
        }
    }
}
