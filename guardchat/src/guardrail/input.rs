//! Input guardrail types and traits.
//!
//! Input guardrails validate the user's text before generation, so an
//! off-topic request is rejected without paying for a model call.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::RunContext;
use crate::error::Result;

use super::GuardrailOutput;

/// Trait for implementing input guardrail check logic.
///
/// The [`check`](InputGuardrailCheck::check) method receives the run context,
/// the name of the agent being guarded, and the raw user text.
#[async_trait]
pub trait InputGuardrailCheck: Send + Sync {
    /// Check the user input and return a guardrail output.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails (e.g., a classifier
    /// model call fails). A failed check is not a tripwire.
    async fn check(
        &self,
        context: &RunContext,
        agent_name: &str,
        input: &str,
    ) -> Result<GuardrailOutput>;
}

/// A named input guardrail attached to an [`Agent`](crate::agent::Agent).
///
/// The [`Runner`](crate::agent::Runner) executes input guardrails in
/// attachment order before generation. If one triggers, the model is not called.
#[derive(Clone)]
pub struct InputGuardrail {
    /// Name of this guardrail (used in tracing and error messages).
    name: String,

    /// The guardrail check implementation.
    check: Arc<dyn InputGuardrailCheck>,
}

impl InputGuardrail {
    /// Create a new input guardrail with the given name and check logic.
    #[must_use]
    pub fn new(name: impl Into<String>, check: impl InputGuardrailCheck + 'static) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Returns the name of this guardrail.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute this guardrail check.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by the check implementation.
    pub async fn run(
        &self,
        context: &RunContext,
        agent_name: &str,
        input: &str,
    ) -> Result<InputGuardrailResult> {
        let output = self.check.check(context, agent_name, input).await?;
        Ok(InputGuardrailResult {
            guardrail_name: self.name.clone(),
            output,
        })
    }
}

impl std::fmt::Debug for InputGuardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputGuardrail")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The result of running an input guardrail.
#[derive(Debug, Clone)]
pub struct InputGuardrailResult {
    /// Name of the guardrail that produced this result.
    pub guardrail_name: String,

    /// The guardrail check output.
    pub output: GuardrailOutput,
}

impl InputGuardrailResult {
    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.output.tripwire_triggered
    }
}
