//! LLM abstractions and the provider trait.
//!
//! Every agent talks to the model through [`LLMProvider::send_prompt`]; the
//! pipeline never sees HTTP.

/// Built-in provider implementations and factory helpers.
pub mod provider;

use async_trait::async_trait;

use crate::error::Result;

/// Progress reporting interface for LLM operations.
///
/// The LLM layer reports status changes (retries, rate limits) through this trait
/// instead of depending on a concrete UI implementation.
pub trait ProgressReporter: Send + Sync {
    /// Appends an informative suffix to a progress message.
    fn append_suffix(&self, suffix: &str);
}

/// Interface implemented by model backends.
///
/// # Implementer Notes
/// 1. Implement `Send + Sync` (required in async contexts).
/// 2. Handle network failures, timeouts, and rate limits inside `send_prompt`.
/// 3. `validate` must distinguish an unreachable server from a missing model,
///    so the caller can print the right hint.
///
/// # Custom Provider Example
/// ```no_run
/// use async_trait::async_trait;
/// use testgen_rs::llm::{LLMProvider, ProgressReporter};
/// use testgen_rs::error::Result;
///
/// struct Canned;
///
/// #[async_trait]
/// impl LLMProvider for Canned {
///     async fn send_prompt(
///         &self,
///         _system_prompt: &str,
///         _user_prompt: &str,
///         _progress: Option<&dyn ProgressReporter>,
///     ) -> Result<String> {
///         Ok("def test_ok():\n    assert True\n".to_string())
///     }
///
///     fn name(&self) -> &str {
///         "canned"
///     }
///
///     async fn validate(&self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends a `(system, user)` prompt pair and returns the raw completion.
    ///
    /// # Parameters
    /// - `system_prompt`: agent profile rendered as a system prompt
    /// - `user_prompt`: the stage's task prompt
    /// - `progress`: optional progress reporter for retry feedback
    async fn send_prompt(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<String>;

    /// Provider name (used for logs and error messages).
    fn name(&self) -> &str;

    /// Checks that the backend is reachable and the configured model exists.
    async fn validate(&self) -> Result<()>;
}
