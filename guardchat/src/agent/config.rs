//! Agent configuration.
//!
//! An [`Agent`] is static configuration: identity, instructions, model
//! binding, optional structured-output schema and guardrails. It is built
//! once, never mutated afterwards, and shared read-only by every run.

use std::sync::Arc;

use schemars::JsonSchema;
use serde_json::{Value, json};

use crate::error::Result;
use crate::guardrail::{InputGuardrail, OutputGuardrail};
use crate::providers::{Model, SharedModel};

use super::result::RunResult;
use super::runner::Runner;

/// The structured-output shape an agent must answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    name: String,
    schema: Value,
}

impl OutputSchema {
    /// Derive the schema of `T` with `schemars`.
    #[must_use]
    pub fn of<T: JsonSchema>() -> Self {
        let mut schema = schemars::schema_for!(T).as_value().clone();
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }
        Self {
            name: T::schema_name().into_owned(),
            schema,
        }
    }

    /// Schema name (the Rust type name by default).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The JSON schema document.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// The Chat Completions `response_format` payload for this schema.
    #[must_use]
    pub fn response_format(&self) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": self.name,
                "schema": self.schema,
            }
        })
    }
}

/// A configured agent.
///
/// # Example
///
/// ```rust,ignore
/// use guardchat::agent::Agent;
///
/// let agent = Agent::new("PythonExpert")
///     .instructions("You are a Python expert.")
///     .model(model);
///
/// assert_eq!(agent.name(), "PythonExpert");
/// ```
#[derive(Clone)]
pub struct Agent {
    pub(crate) name: String,
    pub(crate) instructions: String,
    pub(crate) model: Option<SharedModel>,
    pub(crate) temperature: Option<f32>,
    pub(crate) output_schema: Option<OutputSchema>,
    pub(crate) input_guardrails: Vec<InputGuardrail>,
    pub(crate) output_guardrails: Vec<OutputGuardrail>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.get_model_id())
            .field("output_schema", &self.output_schema.as_ref().map(OutputSchema::name))
            .field("input_guardrails", &self.input_guardrails)
            .field("output_guardrails", &self.output_guardrails)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create an agent with the given name and no model bound yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            model: None,
            temperature: None,
            output_schema: None,
            input_guardrails: Vec::new(),
            output_guardrails: Vec::new(),
        }
    }

    /// Set the natural-language instructions sent as the system prompt.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Bind the model backend this agent generates with.
    #[must_use]
    pub fn model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Require a structured answer matching `schema`.
    #[must_use]
    pub fn output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Append an input guardrail. Guardrails run in the order added.
    #[must_use]
    pub fn input_guardrail(mut self, guardrail: InputGuardrail) -> Self {
        self.input_guardrails.push(guardrail);
        self
    }

    /// Append an output guardrail. Guardrails run in the order added.
    #[must_use]
    pub fn output_guardrail(mut self, guardrail: OutputGuardrail) -> Self {
        self.output_guardrails.push(guardrail);
        self
    }

    /// Agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// System instructions.
    #[must_use]
    pub fn get_instructions(&self) -> &str {
        &self.instructions
    }

    /// Identifier of the bound model, if any.
    #[must_use]
    pub fn get_model_id(&self) -> Option<&str> {
        self.model.as_deref().map(Model::model_id)
    }

    /// Structured-output schema, if any.
    #[must_use]
    pub const fn get_output_schema(&self) -> Option<&OutputSchema> {
        self.output_schema.as_ref()
    }

    /// Attached input guardrails, in execution order.
    #[must_use]
    pub fn input_guardrails(&self) -> &[InputGuardrail] {
        &self.input_guardrails
    }

    /// Attached output guardrails, in execution order.
    #[must_use]
    pub fn output_guardrails(&self) -> &[OutputGuardrail] {
        &self.output_guardrails
    }

    /// Run this agent on `input`. Shorthand for [`Runner::run`].
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub async fn run(&self, input: &str) -> Result<RunResult> {
        Runner::run(self, input).await
    }
}
