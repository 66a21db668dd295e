//! Pipeline 集成测试
//!
//! 使用脚本化的 LLM provider 驱动完整的四阶段流程：
//! - 阶段顺序与上下文传递
//! - 代码提取的回退路径
//! - 文件命名与写入

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use testgen_rs::config::{AppConfig, TestFramework};
use testgen_rs::error::{Result, TestgenError};
use testgen_rs::llm::{LLMProvider, ProgressReporter};
use testgen_rs::pipeline::{PipelineObserver, Stage, TestPipeline};

// ========== Scripted LLM Provider ==========

/// 按顺序返回预设响应，并记录每次调用的 prompt
struct ScriptedLLM {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedLLM {
    fn new(responses: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.to_string())).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn with_results(responses: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedLLM {
    async fn send_prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _progress: Option<&dyn ProgressReporter>,
    ) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TestgenError::Llm("script exhausted".into())))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    async fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// 记录阶段事件
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl PipelineObserver for RecordingObserver {
    fn stage_started(&self, stage: Stage) {
        self.events.lock().unwrap().push(format!("start:{}", stage.agent()));
    }

    fn stage_finished(&self, stage: Stage, _output: &str) {
        self.events.lock().unwrap().push(format!("end:{}", stage.agent()));
    }
}

// ========== Fixtures ==========

const SCENARIO: &str = "Feature: User Login\n\n  Scenario: Valid credentials\n    Given I am on the login page\n    When I enter valid credentials\n    Then I see the dashboard\n\n  Scenario: Wrong password\n    Given I am on the login page\n    When I enter a wrong password\n    Then I see an error\n";

const PARSED: &str = r#"```json
{"feature_name": "User Login", "scenario_name": "Valid credentials", "format": "gherkin",
 "steps": [{"step_type": "Given", "description": "I am on the login page", "action": "navigate", "target": "/login"}],
 "tags": []}
```"#;

const BLUEPRINT: &str = r#"{"class_name": "TestUserLogin",
 "test_methods": [{"method_name": "test_valid_login", "test_type": "positive"},
                  {"method_name": "test_wrong_password", "test_type": "negative"}],
 "actions": [], "assertions": []}"#;

const GENERATED: &str = "```python\nimport pytest\nimport requests\n\n\ndef test_valid_login():\n    assert True\n\n\ndef test_wrong_password():\n    assert True\n```";

const REVIEWED: &str = r#"```json
{"is_valid": true, "review_notes": ["Added docstrings"], "improvements_made": ["Used a session fixture"],
 "final_code": "import pytest\nimport requests\n\n\ndef test_valid_login():\n    \"\"\"Valid login.\"\"\"\n    assert True\n\n\ndef test_wrong_password():\n    assert True\n\n\ndef test_locked_account():\n    assert True\n"}
```"#;

fn test_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.generation.output_dir = dir.path().join("generated");
    config.generation.syntax_check = false;
    config
}

// ========== 测试用例 ==========

#[tokio::test]
async fn test_full_run_writes_reviewed_code() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::new(vec![PARSED, BLUEPRINT, GENERATED, REVIEWED]);
    let observer = Arc::new(RecordingObserver::default());

    let pipeline = TestPipeline::new(llm.clone(), test_config(&dir)).with_observer(observer.clone());
    let result = pipeline.run(SCENARIO, "login.feature").await.unwrap();

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.input_file, "login.feature");
    assert_eq!(result.feature_name, "User Login");
    assert_eq!(result.scenarios_count, 2);
    assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);

    let test = &result.generated_tests[0];
    assert_eq!(test.filename, "test_user_login.py");
    assert_eq!(test.test_count, 3);
    assert!(test.is_valid);
    assert_eq!(
        test.review_notes,
        vec![
            "Added docstrings".to_string(),
            "Improved: Used a session fixture".to_string()
        ]
    );

    let written =
        std::fs::read_to_string(dir.path().join("generated").join("test_user_login.py")).unwrap();
    assert!(written.contains("\"\"\"Valid login.\"\"\""));
    assert!(written.contains("def test_locked_account():"));

    assert_eq!(
        *observer.events.lock().unwrap(),
        vec![
            "start:Parser",
            "end:Parser",
            "start:Analyzer",
            "end:Analyzer",
            "start:Generator",
            "end:Generator",
            "start:Reviewer",
            "end:Reviewer"
        ]
    );
}

#[tokio::test]
async fn test_each_stage_receives_previous_output() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::new(vec![PARSED, BLUEPRINT, GENERATED, REVIEWED]);

    TestPipeline::new(llm.clone(), test_config(&dir))
        .run(SCENARIO, "login.feature")
        .await
        .unwrap();

    let calls = llm.calls();
    assert_eq!(calls.len(), 4);

    // Parser sees the scenario
    assert!(calls[0].1.contains("Scenario: Wrong password"));
    // Analyzer sees the parsed scenario
    assert!(calls[1].1.contains("\"feature_name\": \"User Login\""));
    // Generator sees the blueprint and the planned functions
    assert!(calls[2].1.contains("TestUserLogin"));
    assert!(calls[2].1.contains("- test_valid_login\n- test_wrong_password"));
    // Reviewer sees the generated code without fences
    assert!(calls[3].1.contains("def test_wrong_password():"));

    // every agent has its own persona
    let systems: Vec<&str> = calls.iter().map(|(s, _)| s.as_str()).collect();
    for (i, a) in systems.iter().enumerate() {
        for b in &systems[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[tokio::test]
async fn test_unstructured_stages_fall_back_to_raw_text() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::new(vec![
        "The user logs in with a valid account.",
        "Plan: one test that posts credentials.",
        GENERATED,
        "Looks good to me.",
    ]);

    let result = TestPipeline::new(llm.clone(), test_config(&dir))
        .run(SCENARIO, "login.feature")
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.warnings.len(), 3, "warnings: {:?}", result.warnings);
    assert!(result.warnings[0].starts_with("Parser output is not valid JSON"));
    assert!(result.warnings[1].starts_with("Analyzer output is not valid JSON"));
    assert!(result.warnings[2].starts_with("Reviewer returned no usable code"));

    // raw text is forwarded
    let calls = llm.calls();
    assert!(calls[1].1.contains("The user logs in with a valid account."));
    assert!(calls[2].1.contains("Plan: one test that posts credentials."));

    let test = &result.generated_tests[0];
    assert_eq!(test.test_count, 2);
    assert!(test.content.starts_with("import pytest"));
}

#[tokio::test]
async fn test_no_code_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::new(vec![PARSED, BLUEPRINT, "   ", "no code here"]);

    let result = TestPipeline::new(llm, test_config(&dir))
        .run(SCENARIO, "login.feature")
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.errors, vec!["Failed to generate test code".to_string()]);
    assert!(result.generated_tests.is_empty());
    assert!(!dir.path().join("generated").exists());
}

#[tokio::test]
async fn test_empty_input_never_reaches_the_model() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::new(vec![]);

    let err = TestPipeline::new(llm.clone(), test_config(&dir))
        .run(" \n\t ", "empty.txt")
        .await
        .unwrap_err();

    assert!(matches!(err, TestgenError::EmptyInput));
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn test_provider_error_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::with_results(vec![
        Ok(PARSED.to_string()),
        Err(TestgenError::Llm("Ollama API connection failed: refused".into())),
    ]);

    let err = TestPipeline::new(llm.clone(), test_config(&dir))
        .run(SCENARIO, "login.feature")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("connection failed"));
    assert_eq!(llm.calls().len(), 2);
}

#[tokio::test]
async fn test_feature_name_falls_back_to_first_line() {
    let dir = TempDir::new().unwrap();
    let llm = ScriptedLLM::new(vec!["{}", BLUEPRINT, GENERATED, REVIEWED]);

    let result = TestPipeline::new(llm, test_config(&dir))
        .run(
            "As a shopper I want to pay by card so that checkout is fast\nmore text",
            "story.txt",
        )
        .await
        .unwrap();

    assert_eq!(
        result.feature_name,
        "As a shopper I want to pay by card so that checkou"
    );
    assert_eq!(
        result.generated_tests[0].filename,
        "test_as_a_shopper_i_want_to_pay_by_card_so_that_checkou.py"
    );
    assert_eq!(result.scenarios_count, 1);
}

#[tokio::test]
async fn test_playwright_missing_imports_are_reported() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.generation.framework = TestFramework::Playwright;

    let llm = ScriptedLLM::new(vec![PARSED, BLUEPRINT, GENERATED, REVIEWED]);
    let result = TestPipeline::new(llm, config)
        .run(SCENARIO, "login.feature")
        .await
        .unwrap();

    assert!(result.success);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("from playwright.sync_api import Page, expect"))
    );
}

#[tokio::test]
async fn test_syntax_error_marks_file_invalid() {
    if which::which("python3").is_err() && which::which("python").is_err() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.generation.syntax_check = true;

    let broken = "```python\nimport pytest\nimport requests\n\ndef test_broken(:\n    pass\n```";
    let llm = ScriptedLLM::new(vec![PARSED, BLUEPRINT, broken, "ok"]);

    let result = TestPipeline::new(llm, config)
        .run(SCENARIO, "login.feature")
        .await
        .unwrap();

    // the file is still written so it can be fixed by hand
    assert!(result.success);
    let test = &result.generated_tests[0];
    assert!(!test.is_valid);
    assert!(test.review_notes.iter().any(|n| n.starts_with("Syntax error:")));
    assert!(dir.path().join("generated").join("test_user_login.py").exists());
}
