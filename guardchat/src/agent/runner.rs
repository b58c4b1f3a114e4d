//! Runner — the gated agent execution engine.
//!
//! The [`Runner`] drives an [`Agent`] through one gated turn:
//!
//! 1. Run the input guardrails on the raw user text, in order
//! 2. Call the model with the agent's instructions and the user text
//! 3. Parse the answer (JSON for agents with an output schema)
//! 4. Run the output guardrails on the candidate answer, in order
//!
//! The first tripwire halts the run. An input trip means the model is never
//! called; an output trip means the candidate answer is dropped.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{Error, LlmError, Result};
use crate::guardrail::GuardrailStage;
use crate::message::ChatMessage;
use crate::providers::{GenerateOptions, ModelResponse};

use super::config::Agent;
use super::context::RunContext;
use super::error::AgentError;
use super::result::{RunPhase, RunResult};

/// Stateless execution engine for [`Agent`] runs.
///
/// `Runner` owns no state; all per-run state lives in a [`RunContext`] local
/// to [`Runner::run`], so concurrent runs of the same agent are independent.
#[derive(Debug, Clone, Copy)]
pub struct Runner;

impl Runner {
    /// Execute one gated run of `agent` on `input`.
    ///
    /// Guardrail checks may themselves run agents (see
    /// [`TopicClassifier`](crate::guardrail::TopicClassifier)), so the future
    /// is boxed.
    ///
    /// # Errors
    ///
    /// - [`AgentError::InputGuardrailTriggered`] if an input guardrail trips
    /// - [`AgentError::OutputGuardrailTriggered`] if an output guardrail trips
    /// - [`Error::Agent`] if no model is bound to the agent
    /// - any model, check, or response-format error, unchanged
    pub fn run<'a>(
        agent: &'a Agent,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>> {
        Box::pin(Self::run_inner(agent, input))
    }

    #[instrument(skip_all, fields(agent = %agent.name))]
    async fn run_inner(agent: &Agent, input: &str) -> Result<RunResult> {
        let model = agent.model.as_deref().ok_or_else(|| {
            Error::agent(format!(
                "Agent '{}' has no model configured. Call .model() before running.",
                agent.name
            ))
        })?;

        let mut context = RunContext::new(&agent.name);

        Self::run_input_guardrails(agent, &mut context, input).await?;

        context.transition(RunPhase::Generating);
        let messages = Self::build_messages(agent, input);
        let options = Self::build_options(agent);
        let response = model.generate(messages, options).await?;
        if let Some(usage) = response.token_usage {
            context.add_usage(usage);
        }

        let output = Self::parse_output(agent, &response)?;

        Self::run_output_guardrails(agent, &mut context, &output).await?;

        context.transition(RunPhase::Done);
        Ok(RunResult {
            output,
            usage: response.token_usage,
            agent_name: agent.name.clone(),
        })
    }

    async fn run_input_guardrails(
        agent: &Agent,
        context: &mut RunContext,
        input: &str,
    ) -> Result<()> {
        for guardrail in &agent.input_guardrails {
            let result = guardrail.run(context, &agent.name, input).await?;
            if result.is_triggered() {
                context.transition(RunPhase::Blocked(GuardrailStage::Input));
                warn!(
                    agent = %agent.name,
                    guardrail = %result.guardrail_name,
                    "Input guardrail tripwire triggered"
                );
                return Err(AgentError::input_guardrail_triggered(
                    result.guardrail_name,
                    result.output.output_info,
                )
                .into());
            }
            debug!(guardrail = %result.guardrail_name, "Input guardrail passed");
        }
        Ok(())
    }

    async fn run_output_guardrails(
        agent: &Agent,
        context: &mut RunContext,
        output: &Value,
    ) -> Result<()> {
        for guardrail in &agent.output_guardrails {
            let result = guardrail.run(context, &agent.name, output).await?;
            if result.is_triggered() {
                context.transition(RunPhase::Blocked(GuardrailStage::Output));
                warn!(
                    agent = %agent.name,
                    guardrail = %result.guardrail_name,
                    "Output guardrail tripwire triggered"
                );
                return Err(AgentError::output_guardrail_triggered(
                    result.guardrail_name,
                    result.output.output_info,
                )
                .into());
            }
            debug!(guardrail = %result.guardrail_name, "Output guardrail passed");
        }
        Ok(())
    }

    fn build_messages(agent: &Agent, input: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if !agent.instructions.is_empty() {
            messages.push(ChatMessage::system(&agent.instructions));
        }
        messages.push(ChatMessage::user(input));
        messages
    }

    fn build_options(agent: &Agent) -> GenerateOptions {
        let mut options = GenerateOptions::default();
        if let Some(temperature) = agent.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(schema) = &agent.output_schema {
            options = options.with_response_format(schema.response_format());
        }
        options
    }

    fn parse_output(agent: &Agent, response: &ModelResponse) -> Result<Value> {
        let text = response.text().ok_or_else(|| {
            Error::from(LlmError::response_format(
                "text content",
                "completion carried no content",
            ))
        })?;

        let Some(schema) = &agent.output_schema else {
            return Ok(Value::String(text.to_owned()));
        };

        serde_json::from_str(strip_code_fence(text)).map_err(|e| {
            LlmError::response_format(schema.name(), format!("{e}: {text}")).into()
        })
    }
}

/// Strip a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::OutputSchema;
    use crate::guardrail::{InputGuardrail, OutputGuardrail, Verdict};
    use crate::providers::MockModel;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_missing_model_is_agent_error() {
        let agent = Agent::new("bare");
        let err = Runner::run(&agent, "hi").await.unwrap_err();
        assert!(matches!(err, Error::Agent(AgentError::Runtime(_))));
    }

    #[tokio::test]
    async fn test_free_text_run() {
        let model = Arc::new(MockModel::always("Use my_list[::-1]."));
        let agent = Agent::new("PythonExpert")
            .instructions("You are a Python expert.")
            .model(model.clone());

        let result = Runner::run(&agent, "Reverse a list?").await.unwrap();
        assert_eq!(result.text(), Some("Use my_list[::-1]."));
        assert_eq!(result.agent_name, "PythonExpert");
        assert!(result.usage.is_some());

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system.as_deref(), Some("You are a Python expert."));
        assert_eq!(calls[0].user, "Reverse a list?");
        assert!(!calls[0].structured);
    }

    #[tokio::test]
    async fn test_structured_run_accepts_fenced_json() {
        let model = Arc::new(MockModel::always(
            "```json\n{\"on_topic\": true, \"reasoning\": \"python\"}\n```",
        ));
        let agent = Agent::new("clf")
            .model(model.clone())
            .output_schema(OutputSchema::of::<Verdict>());

        let verdict: Verdict = agent.run("x").await.unwrap().final_output_as().unwrap();
        assert!(verdict.on_topic);
        assert!(model.calls()[0].structured);
    }

    #[tokio::test]
    async fn test_first_trip_halts_remaining_guardrails() {
        let gate = Arc::new(
            MockModel::new("gate")
                .when_system_contains("first", r#"{"on_topic": false, "reasoning": "no"}"#)
                .with_fallback(r#"{"on_topic": true, "reasoning": "yes"}"#),
        );
        let first = crate::guardrail::TopicClassifier::new(
            Agent::new("first").instructions("first").model(gate.clone()),
        );
        let second = crate::guardrail::TopicClassifier::new(
            Agent::new("second").instructions("second").model(gate.clone()),
        );
        let main = Arc::new(MockModel::always("answer"));
        let agent = Agent::new("main")
            .model(main.clone())
            .input_guardrail(InputGuardrail::new("first_gate", first))
            .input_guardrail(InputGuardrail::new("second_gate", second.clone()))
            .output_guardrail(OutputGuardrail::new("out_gate", second));

        let err = agent.run("question").await.unwrap_err();
        match err {
            Error::Agent(AgentError::InputGuardrailTriggered { name, info }) => {
                assert_eq!(name, "first_gate");
                assert_eq!(info["reasoning"], "no");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(gate.call_count(), 1);
        assert_eq!(main.call_count(), 0);
    }
}
