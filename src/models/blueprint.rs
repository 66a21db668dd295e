//! Analyzer stage output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient_string;
use super::scenario::AuthConfig;

/// One planned test function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintMethod {
    #[serde(default)]
    pub method_name: String,

    /// `positive` or `negative`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub test_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub docstring: Option<String>,

    #[serde(default)]
    pub payload_modifications: Vec<Value>,

    #[serde(default)]
    pub expected_status: Option<Value>,

    #[serde(default)]
    pub assertions: Vec<Value>,
}

/// Implementation plan for the generator.
///
/// The Playwright variant fills `method_name`, `actions` and `page_elements`;
/// the API variant fills `test_methods`, `authentication` and `base_payload`.
/// Actions and assertions stay untyped JSON since their shape is prompt-driven.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestBlueprint {
    #[serde(default)]
    pub class_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub method_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub docstring: Option<String>,

    #[serde(default)]
    pub test_methods: Vec<BlueprintMethod>,

    #[serde(default)]
    pub actions: Vec<Value>,

    #[serde(default)]
    pub assertions: Vec<Value>,

    #[serde(default)]
    pub authentication: Option<AuthConfig>,

    #[serde(default)]
    pub base_payload: Value,

    #[serde(default)]
    pub page_elements: Vec<Value>,
}

impl TestBlueprint {
    /// Every test function name the blueprint plans, in order, without duplicates.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let candidates = self
            .method_name
            .iter()
            .chain(self.test_methods.iter().map(|m| &m.method_name));
        for name in candidates {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_blueprint() {
        let json = r#"{
            "class_name": "TestCreatePolicy",
            "test_methods": [
                {"method_name": "test_create_policy_ok", "test_type": "positive", "expected_status": 201},
                {"method_name": "test_create_policy_missing_name", "expected_status": "400"}
            ],
            "base_payload": {"name": "p1"}
        }"#;

        let blueprint: TestBlueprint = serde_json::from_str(json).unwrap();
        assert_eq!(blueprint.class_name, "TestCreatePolicy");
        assert_eq!(
            blueprint.method_names(),
            vec!["test_create_policy_ok", "test_create_policy_missing_name"]
        );
        assert_eq!(blueprint.base_payload["name"], "p1");
    }

    #[test]
    fn test_playwright_blueprint() {
        let json = r#"{
            "class_name": "TestLogin",
            "method_name": "test_login_success",
            "actions": [{"action_type": "navigate", "value": "/login"}],
            "page_elements": [{"name": "submit", "selector": "[data-testid='submit']"}]
        }"#;

        let blueprint: TestBlueprint = serde_json::from_str(json).unwrap();
        assert_eq!(blueprint.method_names(), vec!["test_login_success"]);
        assert_eq!(blueprint.actions.len(), 1);
        assert!(blueprint.base_payload.is_null());
    }

    #[test]
    fn test_method_names_dedup() {
        let blueprint = TestBlueprint {
            method_name: Some("test_a".into()),
            test_methods: vec![
                BlueprintMethod {
                    method_name: "test_a".into(),
                    ..Default::default()
                },
                BlueprintMethod {
                    method_name: " ".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(blueprint.method_names(), vec!["test_a"]);
    }
}
