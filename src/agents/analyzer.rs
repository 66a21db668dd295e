//! Agent 2: parsed scenario to [`TestBlueprint`].

use super::{AgentProfile, run_json_stage};
use crate::config::{GenerationConfig, TestFramework};
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};
use crate::models::{StageOutput, TestBlueprint};

const UI_PROFILE: AgentProfile = AgentProfile {
    name: "Analyzer",
    role: "Playwright Test Architect",
    goal: "Map every parsed step to a concrete Playwright action or expect() assertion \
           with a robust selector, and group them into a test blueprint.",
    backstory: "You have built large Playwright suites and know which selectors survive \
                redesigns: data-testid first, then ARIA roles, then visible text, and CSS \
                only as a last resort.",
};

const API_PROFILE: AgentProfile = AgentProfile {
    name: "Analyzer",
    role: "API Test Architect",
    goal: "Design the authentication flow, requests, payloads and response assertions \
           needed to implement the parsed API scenario with pytest and requests.",
    backstory: "You have designed API test suites around OAuth2, JWT, basic auth and API \
                keys, and you know how to cover status codes, response bodies and negative \
                cases without flaky dependencies between tests.",
};

/// Persona for `framework`.
pub fn profile(framework: TestFramework) -> &'static AgentProfile {
    match framework {
        TestFramework::Playwright => &UI_PROFILE,
        TestFramework::Api => &API_PROFILE,
    }
}

/// Task prompt for the analyzer. `parsed` is the parser's output.
pub fn build_prompt(framework: TestFramework, parsed: &str, config: &GenerationConfig) -> String {
    match framework {
        TestFramework::Playwright => format!(
            r#"Create a Playwright test blueprint from the parsed scenario below.

## Parsed Scenario
```json
{parsed}
```

## Application
- Base URL: {base_url}
- Browser: {browser}

## Selector Strategy (in order of preference)
1. `[data-testid="element-name"]`
2. `role=button[name="Submit"]`
3. `text=Login`
4. `.class-name` or `#element-id`

## Action Mapping
- navigate → page.goto()
- click → page.click()
- fill / enter / type → page.fill()
- select → page.select_option()
- verify visible → expect(locator).to_be_visible()
- verify text → expect(locator).to_contain_text()
- verify URL → expect(page).to_have_url()

## Output
Return only a JSON object:
```json
{{
  "class_name": "TestFeatureName",
  "method_name": "test_scenario_name",
  "docstring": "Verify that ...",
  "actions": [
    {{"action_type": "navigate|click|fill|select", "element": {{"name": "...", "selector": "..."}}, "value": null}}
  ],
  "assertions": [
    {{"assertion_type": "visible|text_contains|url_equals", "element": {{"selector": "..."}}, "expected_value": "..."}}
  ],
  "page_elements": [
    {{"name": "...", "selector": "...", "description": "..."}}
  ]
}}
```"#,
            parsed = parsed,
            base_url = config.base_url,
            browser = config.browser
        ),
        TestFramework::Api => format!(
            r#"Create an API test blueprint from the parsed scenario below.

## Parsed Scenario
```json
{parsed}
```

## Instructions
1. Determine the authentication flow (OAuth2, basic auth, API key or none)
2. Map steps to requests.Session calls
3. Pick the expected status code of every positive and negative case
4. List the response fields each test must check

## Action Mapping
- get_token → session.post() to the token endpoint
- send_request → session.get/post/put/patch/delete() to the API endpoint
- verify_status → assert response.status_code == expected
- verify_response → assertions on response.json()

## Output
Return only a JSON object:
```json
{{
  "class_name": "TestApiName",
  "test_methods": [
    {{
      "method_name": "test_scenario_name",
      "test_type": "positive|negative",
      "docstring": "...",
      "payload_modifications": [],
      "expected_status": 200,
      "assertions": []
    }}
  ],
  "authentication": {{"token_url": "...", "username": "...", "password": "..."}},
  "base_payload": {{}}
}}
```"#,
            parsed = parsed
        ),
    }
}

/// Runs the analyzer stage.
pub async fn run(
    provider: &dyn LLMProvider,
    framework: TestFramework,
    parsed: &str,
    config: &GenerationConfig,
    progress: Option<&dyn ProgressReporter>,
) -> Result<StageOutput<TestBlueprint>> {
    let prompt = build_prompt(framework, parsed, config);
    run_json_stage(provider, profile(framework), &prompt, "test blueprint", progress).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playwright_prompt_uses_app_settings() {
        let config = GenerationConfig {
            base_url: "https://staging.example.com".into(),
            browser: "firefox".into(),
            ..Default::default()
        };
        let prompt = build_prompt(TestFramework::Playwright, "{\"steps\": []}", &config);
        assert!(prompt.contains("Base URL: https://staging.example.com"));
        assert!(prompt.contains("Browser: firefox"));
        assert!(prompt.contains("{\"steps\": []}"));
        assert!(prompt.contains("data-testid"));
    }

    #[test]
    fn test_api_prompt_maps_to_requests() {
        let prompt = build_prompt(TestFramework::Api, "{}", &GenerationConfig::default());
        assert!(prompt.contains("requests.Session"));
        assert!(prompt.contains("\"test_methods\""));
        assert!(!prompt.contains("Base URL"));
    }
}
