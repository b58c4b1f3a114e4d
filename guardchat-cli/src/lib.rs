//! Terminal front-end for the guardchat Python expert.
//!
//! This crate hosts the chat session on stdin/stdout.

pub mod chatbot;

pub use chatbot::{ChatBot, FAILURE_NOTICE, StdoutTransport};
