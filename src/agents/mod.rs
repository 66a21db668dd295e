//! The five agents of the pipeline.
//!
//! An agent is a role profile rendered into a system prompt, plus a task prompt
//! per stage. Each `run` function makes exactly one model call.

pub mod analyzer;
pub mod generator;
pub mod github;
pub mod parser;
pub mod reviewer;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::llm::provider::base::parse_json_response;
use crate::llm::{LLMProvider, ProgressReporter};
use crate::models::StageOutput;

/// Persona of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

impl AgentProfile {
    /// Renders the profile as a system prompt.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {role}.\n\n\
             Goal: {goal}\n\n\
             Background: {backstory}\n\n\
             Follow the output format requested in the task exactly. \
             Do not add explanations outside of it.",
            role = self.role,
            goal = self.goal,
            backstory = self.backstory
        )
    }
}

/// Sends one stage prompt and reads the answer as JSON of type `T`.
///
/// A response that is not valid JSON is not an error: the raw text is kept and
/// `parsed` is `None`.
pub(crate) async fn run_json_stage<T: DeserializeOwned>(
    provider: &dyn LLMProvider,
    profile: &AgentProfile,
    user_prompt: &str,
    what: &str,
    progress: Option<&dyn ProgressReporter>,
) -> Result<StageOutput<T>> {
    let raw = run_text_stage(provider, profile, user_prompt, progress).await?;
    let parsed = match parse_json_response::<T>(&raw, what) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("{} output is not structured: {}", profile.name, e);
            None
        }
    };
    Ok(StageOutput::new(raw, parsed))
}

/// Sends one stage prompt and returns the raw answer.
pub(crate) async fn run_text_stage(
    provider: &dyn LLMProvider,
    profile: &AgentProfile,
    user_prompt: &str,
    progress: Option<&dyn ProgressReporter>,
) -> Result<String> {
    let system = profile.system_prompt();
    tracing::debug!(
        "{} prompt - system ({} chars), user ({} chars)",
        profile.name,
        system.len(),
        user_prompt.len()
    );
    provider.send_prompt(&system, user_prompt, progress).await
}

/// Text handed to the next stage: pretty JSON when parsed, otherwise the raw answer.
pub(crate) fn stage_context<T: serde::Serialize>(output: &StageOutput<T>) -> String {
    output
        .parsed
        .as_ref()
        .and_then(|value| serde_json::to_string_pretty(value).ok())
        .unwrap_or_else(|| output.raw.trim().to_string())
}
