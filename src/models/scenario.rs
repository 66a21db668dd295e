//! Parser stage output.

use serde::{Deserialize, Serialize};

use super::lenient_string;

/// Gherkin keyword of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    #[serde(alias = "Given", alias = "GIVEN")]
    Given,
    #[serde(alias = "When", alias = "WHEN")]
    When,
    #[serde(alias = "Then", alias = "THEN")]
    Then,
    #[default]
    #[serde(alias = "And", alias = "AND")]
    And,
    #[serde(alias = "But", alias = "BUT")]
    But,
}

/// A single step in a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    #[serde(default)]
    pub step_type: StepType,

    /// Original step text.
    #[serde(default)]
    pub description: String,

    /// Inferred action (`navigate`, `click`, `send_request`, ...).
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: Option<String>,

    /// Element, URL, endpoint or field the step acts on.
    #[serde(default, deserialize_with = "lenient_string")]
    pub target: Option<String>,

    /// Value typed in or expected.
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
}

/// Credentials of a token endpoint, as described in an API scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub grant_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scope: Option<String>,
}

/// Structured reading of the input scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedScenario {
    #[serde(default)]
    pub feature_name: String,

    #[serde(default)]
    pub scenario_name: String,

    /// `gherkin`, `plain_english` or `user_story`, as detected by the model.
    #[serde(default, deserialize_with = "lenient_string")]
    pub format: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub api_endpoint: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub http_method: Option<String>,

    #[serde(default)]
    pub authentication: Option<AuthConfig>,

    #[serde(default)]
    pub steps: Vec<TestStep>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl ParsedScenario {
    /// Scenario name as a pytest function name.
    ///
    /// Lowercases, turns spaces into `_` and drops everything else that is not
    /// alphanumeric.
    pub fn to_test_name(&self) -> String {
        let name: String = self
            .scenario_name
            .to_lowercase()
            .replace(' ', "_")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        format!("test_{}", name)
    }

    /// Feature name as a pytest class name: `Test` + PascalCase words.
    pub fn to_class_name(&self) -> String {
        let name: String = self
            .feature_name
            .split_whitespace()
            .map(capitalize)
            .collect::<String>()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        format!("Test{}", name)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_parser_output() {
        let json = r#"{
            "feature_name": "User Login",
            "scenario_name": "Successful login",
            "format": "gherkin",
            "steps": [
                {"step_type": "Given", "description": "I am on the login page", "action": "navigate", "target": "/login"},
                {"step_type": "when", "description": "I enter my PIN", "action": "fill", "value": 1234},
                {"step_type": "then", "description": "I see the dashboard"}
            ]
        }"#;

        let parsed: ParsedScenario = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.feature_name, "User Login");
        assert_eq!(parsed.steps.len(), 3);
        assert_eq!(parsed.steps[0].step_type, StepType::Given);
        assert_eq!(parsed.steps[1].value.as_deref(), Some("1234"));
        assert_eq!(parsed.steps[2].action, None);
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_deserialize_api_scenario_with_auth() {
        let json = r#"{
            "feature_name": "Create Policy",
            "api_endpoint": "https://api.example.com/policies",
            "http_method": "POST",
            "authentication": {"token_url": "https://auth.example.com/token", "username": "svc"},
            "unexpected": ["ignored"]
        }"#;

        let parsed: ParsedScenario = serde_json::from_str(json).unwrap();
        let auth = parsed.authentication.unwrap();
        assert_eq!(auth.token_url.as_deref(), Some("https://auth.example.com/token"));
        assert_eq!(auth.password, None);
        assert_eq!(parsed.http_method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_to_test_name() {
        let parsed = ParsedScenario {
            scenario_name: "Login with valid credentials!".into(),
            ..Default::default()
        };
        assert_eq!(parsed.to_test_name(), "test_login_with_valid_credentials");
    }

    #[test]
    fn test_to_class_name() {
        let parsed = ParsedScenario {
            feature_name: "user LOGIN-flow page".into(),
            ..Default::default()
        };
        assert_eq!(parsed.to_class_name(), "TestUserLoginflowPage");
    }
}
