//! Outbound side of a chat session.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::Result;

/// Trait for delivering messages to the user of a chat session.
///
/// Implementations render the text in whatever front-end hosts the session:
/// a terminal, a web socket, a test buffer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one text message to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be delivered.
    async fn send(&self, text: &str) -> Result<()>;
}

/// A transport that keeps every sent message in memory.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<String>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_owned());
        Ok(())
    }
}
