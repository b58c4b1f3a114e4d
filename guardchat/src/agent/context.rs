//! Per-run context handed to guardrail checks.

use tracing::debug;

use crate::providers::TokenUsage;

use super::result::RunPhase;

/// Per-run state visible to guardrails.
///
/// Created fresh by the [`Runner`](super::Runner) for every run and dropped
/// when the run ends.
#[derive(Debug, Clone)]
pub struct RunContext {
    agent_name: String,
    phase: RunPhase,
    usage: TokenUsage,
}

impl RunContext {
    /// Create a context for a run of `agent_name`, in [`RunPhase::Start`].
    #[must_use]
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            phase: RunPhase::Start,
            usage: TokenUsage::default(),
        }
    }

    /// Name of the agent being run.
    #[must_use]
    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    /// Current phase of the run.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Token usage accumulated so far.
    #[must_use]
    pub const fn usage(&self) -> TokenUsage {
        self.usage
    }

    pub(crate) fn transition(&mut self, next: RunPhase) {
        debug!(agent = %self.agent_name, from = ?self.phase, to = ?next, "Run phase");
        self.phase = next;
    }

    pub(crate) fn add_usage(&mut self, usage: TokenUsage) {
        self.usage += usage;
    }
}
