//! Output guardrail types and traits.
//!
//! Output guardrails validate the agent's candidate answer after generation.
//! A tripped output guardrail means the answer is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::agent::RunContext;
use crate::error::Result;

use super::GuardrailOutput;

/// Trait for implementing output guardrail check logic.
///
/// The [`check`](OutputGuardrailCheck::check) method receives the run
/// context, agent name, and the candidate output value. For free-text agents
/// the value is a JSON string.
#[async_trait]
pub trait OutputGuardrailCheck: Send + Sync {
    /// Check the agent's candidate output and return a guardrail output.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails.
    async fn check(
        &self,
        context: &RunContext,
        agent_name: &str,
        output: &Value,
    ) -> Result<GuardrailOutput>;
}

/// A named output guardrail attached to an [`Agent`](crate::agent::Agent).
///
/// Output guardrails run in attachment order after generation. If any
/// trips, the run returns an error and the output is not delivered.
#[derive(Clone)]
pub struct OutputGuardrail {
    /// Name of this guardrail (used in tracing and error messages).
    name: String,

    /// The guardrail check implementation.
    check: Arc<dyn OutputGuardrailCheck>,
}

impl OutputGuardrail {
    /// Create a new output guardrail with the given name and check logic.
    #[must_use]
    pub fn new(name: impl Into<String>, check: impl OutputGuardrailCheck + 'static) -> Self {
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
        output: &Value,
    ) -> Result<OutputGuardrailResult> {
        let guardrail_output = self.check.check(context, agent_name, output).await?;
        Ok(OutputGuardrailResult {
            guardrail_name: self.name.clone(),
            output: guardrail_output,
        })
    }
}

impl std::fmt::Debug for OutputGuardrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputGuardrail")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The result of running an output guardrail.
///
/// Never carries the checked output: a blocked answer stays inside the runner.
#[derive(Debug, Clone)]
pub struct OutputGuardrailResult {
    /// Name of the guardrail that produced this result.
    pub guardrail_name: String,

    /// The guardrail check output.
    pub output: GuardrailOutput,
}

impl OutputGuardrailResult {
    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.output.tripwire_triggered
    }
}
