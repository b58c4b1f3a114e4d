//! Agent module: configured agents and the gated runner.
//!
//! - **[`Agent`]** is static configuration: name, instructions, a bound
//!   model, an optional structured-output schema and guardrails.
//! - **[`Runner`]** is a stateless engine that drives one gated turn:
//!   input gates, generation, output gates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use guardchat::agent::Agent;
//! use guardchat::providers::MockModel;
//!
//! let agent = Agent::new("assistant")
//!     .instructions("You are a helpful assistant.")
//!     .model(Arc::new(MockModel::always("Hello!")));
//!
//! let result = agent.run("Hi").await?;
//! assert_eq!(result.text(), Some("Hello!"));
//! ```

mod config;
mod context;
pub mod error;
pub mod result;
mod runner;

pub use config::{Agent, OutputSchema};
pub use context::RunContext;
pub use error::AgentError;
pub use result::{RunPhase, RunResult};
pub use runner::Runner;
