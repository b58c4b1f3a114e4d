#![cfg_attr(docsrs, feature(doc_cfg))]
//! Guardchat is a small library for guardrail-gated chat agents.
//!
//! A responder [`Agent`](agent::Agent) is wrapped by input and output
//! guardrails. The input gate runs before generation and can stop the model
//! from being called at all; the output gate runs after generation and can
//! drop the answer. A [`ChatHandler`](chat::ChatHandler) turns the outcome
//! into the message shown to the user.
//!
//! ```rust,ignore
//! use guardchat::prelude::*;
//!
//! let model = ModelConfig::from_env()?.build_model()?;
//! let handler = ChatHandler::new(python_expert(model));
//! let reply = handler.reply("How do I reverse a list in Python?").await?;
//! println!("{}", reply.content);
//! ```
extern crate self as guardchat;

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod expert;
pub mod guardrail;
pub mod message;
pub mod prelude;
pub mod providers;

pub use error::{Error, LlmError, LlmErrorKind, Result};
