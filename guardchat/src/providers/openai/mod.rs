//! `OpenAI`-compatible Chat Completions provider.

mod client;
mod completion;

pub use client::{GEMINI_OPENAI_BASE_URL, OPENAI_API_BASE_URL, OpenAIClient, OpenAIClientBuilder};
pub use completion::CompletionModel;
