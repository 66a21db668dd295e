//! Data passed between pipeline stages and reported at the end of a run.
//!
//! Model output is loosely structured, so every field that the model fills in
//! has a default and unknown keys are ignored.

pub mod blueprint;
pub mod generated;
pub mod scenario;

pub use blueprint::{BlueprintMethod, TestBlueprint};
pub use generated::{GeneratedTest, PrMetadata, ReviewOutcome, WorkflowResult};
pub use scenario::{AuthConfig, ParsedScenario, StepType, TestStep};

use serde::{Deserialize, Deserializer};

/// Raw text of one stage plus its typed reading, when the text could be parsed.
///
/// The raw text is what the next stage receives either way.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub raw: String,
    pub parsed: Option<T>,
}

impl<T> StageOutput<T> {
    pub fn new(raw: String, parsed: Option<T>) -> Self {
        Self { raw, parsed }
    }

    /// Whether the typed reading succeeded.
    pub fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }
}

/// Accepts strings, numbers and booleans for a text field.
///
/// Models write `"value": 42` as often as `"value": "42"`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
