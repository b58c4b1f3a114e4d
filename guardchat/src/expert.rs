//! The Python expert preset.
//!
//! One responder agent gated by two topic classifiers, all bound to the same
//! model backend.

use std::sync::Arc;

use crate::agent::Agent;
use crate::guardrail::{InputGuardrail, OutputGuardrail, TopicClassifier};
use crate::providers::SharedModel;

/// Name of the input classifier agent.
pub const INPUT_CLASSIFIER_NAME: &str = "Input Guardrail";
/// Instructions of the input classifier agent.
pub const INPUT_CLASSIFIER_INSTRUCTIONS: &str = "Check if the user's question is related to Python programming. Only return true if it is about Python.";

/// Name of the output classifier agent.
pub const OUTPUT_CLASSIFIER_NAME: &str = "Output Guardrail";
/// Instructions of the output classifier agent.
pub const OUTPUT_CLASSIFIER_INSTRUCTIONS: &str =
    "Check if the output includes any Python related response.";

/// Name of the responder agent.
pub const EXPERT_NAME: &str = "PythonExpert";
/// Instructions of the responder agent.
pub const EXPERT_INSTRUCTIONS: &str =
    "You are a Python expert. Only respond to Python programming questions.";

/// Registration name of the input guardrail.
pub const INPUT_GUARDRAIL: &str = "python_guardrail";
/// Registration name of the output guardrail.
pub const OUTPUT_GUARDRAIL: &str = "output_python_guardrail";

/// Classifier judging whether a user question is about Python.
#[must_use]
pub fn input_classifier(model: SharedModel) -> TopicClassifier {
    TopicClassifier::new(
        Agent::new(INPUT_CLASSIFIER_NAME)
            .instructions(INPUT_CLASSIFIER_INSTRUCTIONS)
            .model(model),
    )
}

/// Classifier judging whether a candidate answer is about Python.
#[must_use]
pub fn output_classifier(model: SharedModel) -> TopicClassifier {
    TopicClassifier::new(
        Agent::new(OUTPUT_CLASSIFIER_NAME)
            .instructions(OUTPUT_CLASSIFIER_INSTRUCTIONS)
            .model(model),
    )
}

/// Build the gated `PythonExpert` agent.
///
/// ```rust,ignore
/// let agent = guardchat::expert::python_expert(model);
/// let answer = agent.run("How do I reverse a list in Python?").await?;
/// ```
#[must_use]
pub fn python_expert(model: SharedModel) -> Agent {
    Agent::new(EXPERT_NAME)
        .instructions(EXPERT_INSTRUCTIONS)
        .model(Arc::clone(&model))
        .input_guardrail(InputGuardrail::new(
            INPUT_GUARDRAIL,
            input_classifier(Arc::clone(&model)),
        ))
        .output_guardrail(OutputGuardrail::new(
            OUTPUT_GUARDRAIL,
            output_classifier(model),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockModel;

    #[test]
    fn test_preset_wiring() {
        let agent = python_expert(Arc::new(MockModel::new("gemini-1.5-flash")));

        assert_eq!(agent.name(), "PythonExpert");
        assert_eq!(agent.get_instructions(), EXPERT_INSTRUCTIONS);
        assert_eq!(agent.get_model_id(), Some("gemini-1.5-flash"));
        assert!(agent.get_output_schema().is_none());

        assert_eq!(agent.input_guardrails().len(), 1);
        assert_eq!(agent.input_guardrails()[0].name(), "python_guardrail");
        assert_eq!(agent.output_guardrails().len(), 1);
        assert_eq!(agent.output_guardrails()[0].name(), "output_python_guardrail");
    }

    #[test]
    fn test_classifiers_are_structured() {
        let model: SharedModel = Arc::new(MockModel::new("m"));
        let input = input_classifier(Arc::clone(&model));
        let output = output_classifier(model);

        assert_eq!(input.agent().name(), "Input Guardrail");
        assert_eq!(output.agent().name(), "Output Guardrail");
        assert_eq!(
            input.agent().get_output_schema().map(|s| s.name()),
            Some("Verdict")
        );
        assert_eq!(
            output.agent().get_output_schema().map(|s| s.name()),
            Some("Verdict")
        );
    }
}
