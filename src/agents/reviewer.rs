//! Agent 4: review and fix the generated code.

use super::{AgentProfile, run_json_stage};
use crate::config::TestFramework;
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};
use crate::models::{ReviewOutcome, StageOutput};

const UI_PROFILE: AgentProfile = AgentProfile {
    name: "Reviewer",
    role: "Playwright Test Code Reviewer",
    goal: "Check generated Playwright tests for missing imports, syntax errors, weak \
           selectors and assertions that do not use expect(), and fix what is wrong.",
    backstory: "You are a senior QA engineer who reviews test code before it is merged. \
                You fix problems yourself instead of listing them, and you keep code that \
                is already correct unchanged.",
};

const API_PROFILE: AgentProfile = AgentProfile {
    name: "Reviewer",
    role: "API Test Code Reviewer",
    goal: "Check generated API tests for missing imports, syntax errors, broken \
           authentication and weak assertions, and fix what is wrong.",
    backstory: "You are a senior QA engineer who reviews API test code before it is \
                merged. You make sure tokens are fetched once per test, sessions are \
                closed and every response check says what went wrong.",
};

/// Persona for `framework`.
pub fn profile(framework: TestFramework) -> &'static AgentProfile {
    match framework {
        TestFramework::Playwright => &UI_PROFILE,
        TestFramework::Api => &API_PROFILE,
    }
}

fn checklist(framework: TestFramework) -> &'static str {
    match framework {
        TestFramework::Playwright => {
            "- `import pytest` and `from playwright.sync_api import Page, expect` present\n\
             - class name starts with `Test`, method names start with `test_`\n\
             - every test method takes `page: Page`\n\
             - expect() is used instead of assert\n\
             - selectors are valid Playwright selectors\n\
             - docstrings present, PEP 8 respected"
        }
        TestFramework::Api => {
            "- `import pytest` and `import requests` present\n\
             - class name starts with `Test`, method names start with `test_`\n\
             - the session is created in a fixture and closed afterwards\n\
             - the Authorization header carries the bearer token when auth is used\n\
             - every status code and body check is an assert with a message\n\
             - docstrings present, PEP 8 respected"
        }
    }
}

/// Task prompt for the reviewer. `code` is the generator's output.
pub fn build_prompt(framework: TestFramework, code: &str) -> String {
    format!(
        r#"Review the following generated test code.

## Code
```python
{code}
```

## Checklist
{checklist}
- the code is syntactically valid Python

## Instructions
- Keep correct code as it is
- Fix syntax errors, add missing imports and correct anything on the checklist

## Output
Return only a JSON object. `final_code` holds the complete corrected file
(or the original when nothing changed), with newlines escaped as \n:
```json
{{
  "is_valid": true,
  "review_notes": ["observation"],
  "improvements_made": ["change"],
  "final_code": "complete Python code"
}}
```"#,
        code = code.trim(),
        checklist = checklist(framework)
    )
}

/// Runs the reviewer stage.
pub async fn run(
    provider: &dyn LLMProvider,
    framework: TestFramework,
    code: &str,
    progress: Option<&dyn ProgressReporter>,
) -> Result<StageOutput<ReviewOutcome>> {
    let prompt = build_prompt(framework, code);
    run_json_stage(provider, profile(framework), &prompt, "review result", progress).await
}
