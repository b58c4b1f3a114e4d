//! Commonly used types, re-exported for glob import.

pub use crate::agent::{Agent, AgentError, OutputSchema, RunContext, RunPhase, RunResult, Runner};
pub use crate::chat::{
    ChatEvent, ChatHandler, GREETING, INPUT_BLOCKED_REPLY, MemoryTransport, OUTPUT_BLOCKED_REPLY,
    Reply, ReplyKind, Transport,
};
pub use crate::config::ModelConfig;
pub use crate::error::{Error, LlmError, LlmErrorKind, Result};
pub use crate::expert::python_expert;
pub use crate::guardrail::{
    GuardrailOutput, GuardrailStage, InputGuardrail, InputGuardrailCheck, OutputGuardrail,
    OutputGuardrailCheck, TopicClassifier, Verdict,
};
pub use crate::message::{ChatMessage, MessageRole};
pub use crate::providers::{
    GenerateOptions, MockModel, Model, ModelResponse, OpenAIClient, SharedModel, TokenUsage,
};
