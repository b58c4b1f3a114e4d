//! Run results and the gated run state machine.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::guardrail::GuardrailStage;
use crate::providers::TokenUsage;

/// Phase of a gated run.
///
/// ```text
/// Start ──input gates pass──▶ Generating ──output gates pass──▶ Done
///   │                             │
///   └────────▶ Blocked(Input)     └────────▶ Blocked(Output)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    /// Input gates are being evaluated.
    #[default]
    Start,
    /// Input gates passed; the model is generating or output gates are running.
    Generating,
    /// All gates passed and the output was released.
    Done,
    /// A gate vetoed the run.
    Blocked(GuardrailStage),
}

impl RunPhase {
    /// Returns `true` for `Done` and `Blocked`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Blocked(_))
    }
}

/// The result of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final output: a JSON string for free-text agents, a JSON document
    /// for agents with an output schema.
    pub output: Value,
    /// Token usage of the generation call, when the backend reports it.
    pub usage: Option<TokenUsage>,
    /// Name of the agent that produced the output.
    pub agent_name: String,
}

impl RunResult {
    /// The output as text, for free-text agents.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.output.as_str()
    }

    /// Consume the result, returning free-text output.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self.output {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Deserialize structured output into `T`.
    ///
    /// # Errors
    ///
    /// Returns a response-format error if the output does not match `T`.
    pub fn final_output_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.output.clone()).map_err(|e| {
            LlmError::response_format(std::any::type_name::<T>(), e.to_string()).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrail::Verdict;
    use serde_json::json;

    fn result(output: Value) -> RunResult {
        RunResult {
            output,
            usage: None,
            agent_name: "agent".into(),
        }
    }

    #[test]
    fn test_text_accessors() {
        let r = result(json!("Use reversed()."));
        assert_eq!(r.text(), Some("Use reversed()."));
        assert_eq!(r.into_text().as_deref(), Some("Use reversed()."));
        assert_eq!(result(json!({"a": 1})).text(), None);
    }

    #[test]
    fn test_final_output_as() {
        let r = result(json!({"on_topic": true, "reasoning": "python"}));
        let verdict: Verdict = r.final_output_as().unwrap();
        assert!(verdict.on_topic);

        let wrong = result(json!({"is_python": true}));
        assert!(wrong.final_output_as::<Verdict>().is_err());
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!RunPhase::Start.is_terminal());
        assert!(!RunPhase::Generating.is_terminal());
        assert!(RunPhase::Done.is_terminal());
        assert!(RunPhase::Blocked(GuardrailStage::Output).is_terminal());
    }
}
