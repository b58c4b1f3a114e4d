//! Model-backed topic classification.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::agent::{Agent, OutputSchema, RunContext, Runner};
use crate::error::Result;

use super::{GuardrailOutput, InputGuardrailCheck, OutputGuardrailCheck};

/// A classifier's structured judgment of a piece of text.
///
/// Produced fresh for every check and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    /// Whether the text is on the allowed topic.
    pub on_topic: bool,
    /// A short explanation of the judgment.
    pub reasoning: String,
}

impl Verdict {
    /// Convert into a guardrail output: off-topic trips the wire.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the verdict cannot be serialized.
    pub fn into_guardrail_output(self) -> Result<GuardrailOutput> {
        let tripped = !self.on_topic;
        let info = serde_json::to_value(self)?;
        Ok(if tripped {
            GuardrailOutput::tripwire(info)
        } else {
            GuardrailOutput::pass_with_info(info)
        })
    }
}

/// A guardrail check that asks a classifier agent for a [`Verdict`].
///
/// The wrapped agent is forced to answer with the [`Verdict`] schema. The
/// same classifier can guard inputs and outputs.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    agent: Agent,
}

impl TopicClassifier {
    /// Wrap a classifier agent, binding its output schema to [`Verdict`].
    #[must_use]
    pub fn new(agent: Agent) -> Self {
        Self {
            agent: agent.output_schema(OutputSchema::of::<Verdict>()),
        }
    }

    /// The underlying classifier agent.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Run the classifier on `text` and return its verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if the model call fails or the answer does not
    /// match the [`Verdict`] schema.
    pub async fn classify(&self, text: &str) -> Result<Verdict> {
        let result = Runner::run(&self.agent, text).await?;
        let verdict: Verdict = result.final_output_as()?;
        debug!(
            classifier = %self.agent.name(),
            on_topic = verdict.on_topic,
            reasoning = %verdict.reasoning,
            "Classifier verdict"
        );
        Ok(verdict)
    }
}

#[async_trait]
impl InputGuardrailCheck for TopicClassifier {
    async fn check(
        &self,
        _context: &RunContext,
        _agent_name: &str,
        input: &str,
    ) -> Result<GuardrailOutput> {
        self.classify(input).await?.into_guardrail_output()
    }
}

#[async_trait]
impl OutputGuardrailCheck for TopicClassifier {
    async fn check(
        &self,
        _context: &RunContext,
        _agent_name: &str,
        output: &Value,
    ) -> Result<GuardrailOutput> {
        let text = output
            .as_str()
            .map_or_else(|| output.to_string(), str::to_owned);
        self.classify(&text).await?.into_guardrail_output()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;
    use crate::providers::MockModel;
    use serde_json::json;

    const ON_TOPIC: &str = r#"{"on_topic": true, "reasoning": "asks about Python"}"#;
    const OFF_TOPIC: &str = r#"{"on_topic": false, "reasoning": "geography"}"#;

    fn classifier(model: Arc<MockModel>) -> TopicClassifier {
        TopicClassifier::new(
            Agent::new("Input Guardrail")
                .instructions("Check if the text is about Python.")
                .model(model),
        )
    }

    #[test]
    fn test_verdict_into_output() {
        let tripped = Verdict {
            on_topic: false,
            reasoning: "cooking".into(),
        }
        .into_guardrail_output()
        .unwrap();
        assert!(tripped.is_triggered());
        assert_eq!(tripped.output_info["reasoning"], "cooking");

        let passed = Verdict {
            on_topic: true,
            reasoning: "python".into(),
        }
        .into_guardrail_output()
        .unwrap();
        assert!(!passed.is_triggered());
        assert_eq!(passed.output_info["on_topic"], true);
    }

    #[test]
    fn test_new_binds_verdict_schema() {
        let c = classifier(Arc::new(MockModel::always(ON_TOPIC)));
        let schema = c.agent().get_output_schema().unwrap();
        assert_eq!(schema.name(), "Verdict");
        assert!(schema.schema()["properties"].get("on_topic").is_some());
    }

    #[tokio::test]
    async fn test_classify_requests_structured_output() {
        let model = Arc::new(
            MockModel::new("mock")
                .when_user_contains("Python", ON_TOPIC)
                .with_fallback(OFF_TOPIC),
        );
        let c = classifier(Arc::clone(&model));

        assert!(c.classify("How do I reverse a list in Python?").await.unwrap().on_topic);
        assert!(!c.classify("What's the capital of France?").await.unwrap().on_topic);

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.structured));
    }

    #[tokio::test]
    async fn test_output_check_reads_string_value() {
        let model = Arc::new(
            MockModel::new("mock")
                .when_user_contains("decorator", ON_TOPIC)
                .with_fallback(OFF_TOPIC),
        );
        let c = classifier(Arc::clone(&model));
        let ctx = RunContext::new("PythonExpert");

        let out = OutputGuardrailCheck::check(
            &c,
            &ctx,
            "PythonExpert",
            &json!("A decorator wraps a function."),
        )
        .await
        .unwrap();
        assert!(!out.is_triggered());
        assert_eq!(model.calls()[0].user, "A decorator wraps a function.");
    }

    #[tokio::test]
    async fn test_malformed_verdict_is_error_not_trip() {
        let c = classifier(Arc::new(MockModel::always("definitely python")));
        let err = c.classify("anything").await.unwrap_err();
        assert!(err.guardrail_stage().is_none());
        assert!(matches!(err, Error::Llm(_)));
    }
}
