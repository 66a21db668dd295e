//! Agent 3: blueprint to Python test code.

use super::{AgentProfile, run_text_stage};
use crate::config::{GenerationConfig, TestFramework};
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};

const UI_PROFILE: AgentProfile = AgentProfile {
    name: "Generator",
    role: "Playwright Python Test Engineer",
    goal: "Write a complete, runnable pytest-playwright test file that implements the \
           blueprint exactly.",
    backstory: "You write Playwright tests in Python every day. Your tests use the sync \
                API, the `page` fixture, type hints and expect() assertions, and read like \
                the scenario they came from.",
};

const API_PROFILE: AgentProfile = AgentProfile {
    name: "Generator",
    role: "API Test Engineer",
    goal: "Write a complete, runnable pytest file using requests that implements the API \
           test blueprint exactly.",
    backstory: "You write API tests in Python with pytest fixtures and requests sessions. \
                You handle token retrieval in a fixture, keep payload builders separate \
                from tests, and make every assertion explain itself.",
};

/// Persona for `framework`.
pub fn profile(framework: TestFramework) -> &'static AgentProfile {
    match framework {
        TestFramework::Playwright => &UI_PROFILE,
        TestFramework::Api => &API_PROFILE,
    }
}

fn expected_methods_section(methods: &[String]) -> String {
    if methods.is_empty() {
        return String::new();
    }
    let list = methods
        .iter()
        .map(|m| format!("- {}", m))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n## Test Functions To Implement\n{}\n", list)
}

/// Task prompt for the generator. `blueprint` is the analyzer's output.
pub fn build_prompt(
    framework: TestFramework,
    blueprint: &str,
    expected_methods: &[String],
    config: &GenerationConfig,
) -> String {
    let methods = expected_methods_section(expected_methods);
    let imports = framework.required_imports().join("\n");

    match framework {
        TestFramework::Playwright => format!(
            r#"Generate a complete Playwright Python test file from the blueprint below.

## Test Blueprint
```json
{blueprint}
```
{methods}
## Requirements
- Start with these imports:
{imports}
- One test class named after the blueprint, one method per test, each taking `page: Page`
- Navigate relative to the base URL {base_url}
- Use expect() for every assertion, not bare assert
- Add a docstring and Given / When / Then comments to each test
- Follow PEP 8

## Structure
```python
"""Tests for <feature>."""

import pytest
from playwright.sync_api import Page, expect


class TestFeature:
    """Tests for <feature>."""

    def test_scenario(self, page: Page):
        """Verify that ..."""
        # Given
        page.goto("{base_url}/login")

        # When
        page.fill("[data-testid='username']", "user")
        page.click("[data-testid='submit']")

        # Then
        expect(page).to_have_url("{base_url}/dashboard")
```

## Output
Return ONLY the Python code, no explanations."#,
            blueprint = blueprint,
            methods = methods,
            imports = imports,
            base_url = config.base_url.trim_end_matches('/')
        ),
        TestFramework::Api => format!(
            r#"Generate a complete pytest API test file from the blueprint below.

## Test Blueprint
```json
{blueprint}
```
{methods}
## Requirements
- Start with these imports:
{imports}
- One test class with an autouse fixture that opens a requests.Session,
  fetches the access token when the blueprint has authentication, and closes
  the session afterwards
- A helper returning the base payload; each test copies and modifies it
- Mark tests with @pytest.mark.positive or @pytest.mark.negative
- Add a docstring and Given / When / Then comments to each test
- Use plain assert statements with a message

## Structure
```python
"""API tests for <feature>."""

import pytest
import requests


class TestApi:
    """API tests for <feature>."""

    API_BASE_URL = "https://api.example.com"

    @pytest.fixture(autouse=True)
    def setup(self):
        self.session = requests.Session()
        self.headers = {{"Content-Type": "application/json"}}
        yield
        self.session.close()

    def get_base_payload(self) -> dict:
        return {{}}

    @pytest.mark.positive
    def test_scenario(self):
        """Verify that ..."""
        # Given
        payload = self.get_base_payload()

        # When
        response = self.session.post(f"{{self.API_BASE_URL}}/resource", json=payload, headers=self.headers)

        # Then
        assert response.status_code == 201, response.text
```

## Output
Return ONLY the Python code, no explanations."#,
            blueprint = blueprint,
            methods = methods,
            imports = imports
        ),
    }
}

/// Runs the generator stage and returns its raw answer.
pub async fn run(
    provider: &dyn LLMProvider,
    framework: TestFramework,
    blueprint: &str,
    expected_methods: &[String],
    config: &GenerationConfig,
    progress: Option<&dyn ProgressReporter>,
) -> Result<String> {
    let prompt = build_prompt(framework, blueprint, expected_methods, config);
    run_text_stage(provider, profile(framework), &prompt, progress).await
}
