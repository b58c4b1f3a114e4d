//! Chat session handling.
//!
//! A [`ChatHandler`] sits between a chat front-end and a gated agent. It
//! reacts to two events, session start and incoming message, and answers
//! through a [`Transport`]:
//!
//! | Run outcome            | Message sent             |
//! |------------------------|--------------------------|
//! | answer released        | the answer, unmodified   |
//! | blocked by input gate  | [`INPUT_BLOCKED_REPLY`]  |
//! | blocked by output gate | [`OUTPUT_BLOCKED_REPLY`] |
//!
//! Each message is handled independently; no history is kept between turns.

mod transport;

pub use transport::{MemoryTransport, Transport};

use tracing::{debug, info, instrument};

use crate::agent::{Agent, Runner};
use crate::error::{Error, Result};
use crate::guardrail::GuardrailStage;

/// Greeting sent when a session starts.
pub const GREETING: &str =
    "👋 I’m a Python Expert Assistant. Ask me anything about Python programming!";

/// Reply sent when the input gate blocks a question.
pub const INPUT_BLOCKED_REPLY: &str =
    "⚠️ Sorry, I can only help with Python programming questions.";

/// Reply sent when the output gate blocks an answer.
pub const OUTPUT_BLOCKED_REPLY: &str =
    "⚠️ Output blocked: Your question was Python-related, but the response violated policy.";

/// An event delivered by the chat front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A new session was opened.
    SessionStarted,
    /// The user sent a message.
    MessageReceived(String),
}

/// How a message was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    /// Both gates passed; the content is the agent's answer.
    Answer,
    /// The input gate vetoed the question.
    InputBlocked,
    /// The output gate vetoed the answer.
    OutputBlocked,
}

impl From<GuardrailStage> for ReplyKind {
    fn from(stage: GuardrailStage) -> Self {
        match stage {
            GuardrailStage::Input => Self::InputBlocked,
            GuardrailStage::Output => Self::OutputBlocked,
        }
    }
}

/// The user-visible reply to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// How the message was resolved.
    pub kind: ReplyKind,
    /// Text to show the user.
    pub content: String,
}

impl Reply {
    /// The fixed refusal for a gate.
    #[must_use]
    pub fn blocked(stage: GuardrailStage) -> Self {
        let content = match stage {
            GuardrailStage::Input => INPUT_BLOCKED_REPLY,
            GuardrailStage::Output => OUTPUT_BLOCKED_REPLY,
        };
        Self {
            kind: stage.into(),
            content: content.to_owned(),
        }
    }

    /// Returns `true` if a gate blocked the message.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.kind != ReplyKind::Answer
    }
}

/// Handles chat events for one gated agent.
#[derive(Debug, Clone)]
pub struct ChatHandler {
    agent: Agent,
}

impl ChatHandler {
    /// Create a handler answering with `agent`.
    #[must_use]
    pub const fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// The agent answering messages.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Run the agent on `text` and map the outcome to a [`Reply`].
    ///
    /// # Errors
    ///
    /// Guardrail trips become blocked replies. Any other error (model
    /// unreachable, malformed classifier output) is returned unchanged.
    #[instrument(skip_all, fields(agent = %self.agent.name()))]
    pub async fn reply(&self, text: &str) -> Result<Reply> {
        match Runner::run(&self.agent, text).await {
            Ok(result) => {
                let content = result.into_text().ok_or_else(|| {
                    Error::agent("Responder produced structured output instead of text")
                })?;
                debug!(chars = content.len(), "Answer released");
                Ok(Reply {
                    kind: ReplyKind::Answer,
                    content,
                })
            }
            Err(err) => match err.guardrail_stage() {
                Some(stage) => {
                    info!(%stage, "Message blocked");
                    Ok(Reply::blocked(stage))
                }
                None => Err(err),
            },
        }
    }

    /// Send the greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn on_chat_start(&self, transport: &dyn Transport) -> Result<()> {
        transport.send(GREETING).await
    }

    /// Answer one message and send the reply.
    ///
    /// # Errors
    ///
    /// See [`reply`](Self::reply); transport failures are returned too.
    pub async fn on_message(&self, transport: &dyn Transport, text: &str) -> Result<Reply> {
        let reply = self.reply(text).await?;
        transport.send(&reply.content).await?;
        Ok(reply)
    }

    /// Dispatch a [`ChatEvent`].
    ///
    /// Returns the reply for [`ChatEvent::MessageReceived`], `None` for
    /// [`ChatEvent::SessionStarted`].
    ///
    /// # Errors
    ///
    /// See [`on_message`](Self::on_message).
    pub async fn handle(&self, transport: &dyn Transport, event: ChatEvent) -> Result<Option<Reply>> {
        match event {
            ChatEvent::SessionStarted => {
                self.on_chat_start(transport).await?;
                Ok(None)
            }
            ChatEvent::MessageReceived(text) => self.on_message(transport, &text).await.map(Some),
        }
    }
}
