//! Guardrail module: gates around an agent's input and output.
//!
//! A guardrail is a check that may veto a run based on what it sees:
//!
//! - **[`InputGuardrail`]** inspects the raw user text before generation.
//!   If it trips, the model is never called.
//! - **[`OutputGuardrail`]** inspects the candidate answer after generation.
//!   If it trips, the answer is discarded and never surfaced.
//!
//! # Tripwire Mechanism
//!
//! Each check returns a [`GuardrailOutput`] with a `tripwire_triggered` flag.
//! Guardrails run one after another in the order they were attached; the
//! first tripwire halts the run with
//! [`AgentError::InputGuardrailTriggered`](crate::agent::AgentError) or
//! [`AgentError::OutputGuardrailTriggered`](crate::agent::AgentError).
//!
//! # Model-backed Checks
//!
//! [`TopicClassifier`] runs a classifier agent that answers with a
//! structured [`Verdict`], and trips when the verdict says off-topic.
//!
//! ```rust,ignore
//! use guardchat::prelude::*;
//!
//! let classifier = TopicClassifier::new(
//!     Agent::new("Input Guardrail")
//!         .instructions("Check if the user's question is about Python.")
//!         .model(model.clone()),
//! );
//!
//! let agent = Agent::new("PythonExpert")
//!     .instructions("You are a Python expert.")
//!     .model(model)
//!     .input_guardrail(InputGuardrail::new("python_guardrail", classifier));
//! ```

mod classifier;
mod input;
mod output;

pub use classifier::{TopicClassifier, Verdict};
pub use input::{InputGuardrail, InputGuardrailCheck, InputGuardrailResult};
pub use output::{OutputGuardrail, OutputGuardrailCheck, OutputGuardrailResult};

use serde_json::Value;

/// Which gate of the pipeline a guardrail guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardrailStage {
    /// Before generation, on the user's text.
    Input,
    /// After generation, on the candidate answer.
    Output,
}

impl std::fmt::Display for GuardrailStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Output => "output",
        })
    }
}

/// The output of a guardrail check function.
///
/// Contains a boolean tripwire flag and optional structured information
/// about the check that was performed.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailOutput {
    /// Whether the tripwire was triggered.
    pub tripwire_triggered: bool,

    /// Structured information about the check, such as a classifier verdict.
    pub output_info: Value,
}

impl GuardrailOutput {
    /// Create a passing guardrail output (tripwire not triggered).
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            tripwire_triggered: false,
            output_info: Value::Null,
        }
    }

    /// Create a failing guardrail output (tripwire triggered).
    #[must_use]
    pub fn tripwire(info: impl Into<Value>) -> Self {
        Self {
            tripwire_triggered: true,
            output_info: info.into(),
        }
    }

    /// Create a passing output with additional diagnostic information.
    #[must_use]
    pub fn pass_with_info(info: impl Into<Value>) -> Self {
        Self {
            tripwire_triggered: false,
            output_info: info.into(),
        }
    }

    /// Returns `true` if the tripwire was triggered.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.tripwire_triggered
    }
}

impl From<&str> for GuardrailOutput {
    fn from(reason: &str) -> Self {
        Self::tripwire(Value::String(reason.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_guardrail_output_constructors() {
        assert!(!GuardrailOutput::pass().is_triggered());
        assert_eq!(GuardrailOutput::pass().output_info, Value::Null);

        let tripped = GuardrailOutput::tripwire(json!({"reason": "off topic"}));
        assert!(tripped.is_triggered());
        assert_eq!(tripped.output_info["reason"], "off topic");

        let passed = GuardrailOutput::pass_with_info(json!({"score": 0.9}));
        assert!(!passed.is_triggered());

        let from_str = GuardrailOutput::from("blocked");
        assert!(from_str.is_triggered());
        assert_eq!(from_str.output_info, json!("blocked"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(GuardrailStage::Input.to_string(), "input");
        assert_eq!(GuardrailStage::Output.to_string(), "output");
    }
}
