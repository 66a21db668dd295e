//! Agent 1: scenario text to [`ParsedScenario`].

use super::{AgentProfile, run_json_stage};
use crate::config::TestFramework;
use crate::error::Result;
use crate::llm::{LLMProvider, ProgressReporter};
use crate::models::{ParsedScenario, StageOutput};

const UI_PROFILE: AgentProfile = AgentProfile {
    name: "Parser",
    role: "Test Scenario Parser",
    goal: "Turn test scenarios written as Gherkin, plain English or user stories into a \
           structured list of steps with the page, element and value each step touches.",
    backstory: "You have written and read BDD feature files for many years and can tell \
                what a tester means even when the scenario is informal. You never invent \
                steps that are not in the text.",
};

const API_PROFILE: AgentProfile = AgentProfile {
    name: "Parser",
    role: "API Test Scenario Parser",
    goal: "Turn API test scenarios written as Gherkin, plain English or user stories into \
           a structured form with endpoint, HTTP method, authentication, payload and \
           expected responses.",
    backstory: "You know REST APIs, OpenAPI documents and OAuth2 token flows, and you can \
                read positive and negative API scenarios and list exactly what each step \
                sends and expects.",
};

/// Persona for `framework`.
pub fn profile(framework: TestFramework) -> &'static AgentProfile {
    match framework {
        TestFramework::Playwright => &UI_PROFILE,
        TestFramework::Api => &API_PROFILE,
    }
}

/// Task prompt for the parser.
pub fn build_prompt(framework: TestFramework, scenario_text: &str) -> String {
    match framework {
        TestFramework::Playwright => format!(
            r#"Parse the following UI test scenario.

## Scenario
```
{scenario}
```

## Instructions
1. Identify the format (gherkin, plain_english or user_story)
2. Extract the feature name and scenario name
3. Split the scenario into steps
4. For each step give its type (given/when/then/and/but), the original text,
   the action (navigate, click, fill, select, verify), the target element or URL
   and the value typed or expected

## Output
Return only a JSON object:
```json
{{
  "feature_name": "string",
  "scenario_name": "string",
  "format": "gherkin|plain_english|user_story",
  "steps": [
    {{"step_type": "given", "description": "...", "action": "navigate", "target": "/login", "value": null}}
  ],
  "tags": []
}}
```"#,
            scenario = scenario_text.trim()
        ),
        TestFramework::Api => format!(
            r#"Parse the following API test scenario.

## Scenario
```
{scenario}
```

## Instructions
1. Identify the format (gherkin, plain_english or user_story)
2. Extract the feature name and scenario name
3. Identify the API endpoint URL and HTTP method
4. Extract authentication details (token URL, credentials)
5. Split the scenario into steps; for each step give its type
   (given/when/then/and/but), the original text, the action
   (get_token, send_request, modify_payload, verify_status, verify_response),
   the target endpoint or field and the expected value

## Output
Return only a JSON object:
```json
{{
  "feature_name": "string",
  "scenario_name": "string",
  "format": "gherkin|plain_english|user_story",
  "api_endpoint": "full URL",
  "http_method": "GET|POST|PUT|PATCH|DELETE",
  "authentication": {{"token_url": "...", "username": "...", "password": "..."}},
  "steps": [
    {{"step_type": "when", "description": "...", "action": "send_request", "target": "/policies", "value": null}}
  ],
  "tags": []
}}
```"#,
            scenario = scenario_text.trim()
        ),
    }
}

/// Runs the parser stage.
pub async fn run(
    provider: &dyn LLMProvider,
    framework: TestFramework,
    scenario_text: &str,
    progress: Option<&dyn ProgressReporter>,
) -> Result<StageOutput<ParsedScenario>> {
    let prompt = build_prompt(framework, scenario_text);
    run_json_stage(provider, profile(framework), &prompt, "parsed scenario", progress).await
}
