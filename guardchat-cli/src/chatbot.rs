//! CLI chatbot module: the chat session on a terminal.
//!
//! Each line typed by the user is one independent message. Guardrail refusals
//! are ordinary replies; any other failure is logged and the session goes on.

#![allow(clippy::print_stdout)]

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use guardchat::chat::{ChatEvent, ChatHandler, Reply, Transport};
use guardchat::error::Result;
use tracing::error;

/// Shown in place of an answer when a message fails for a reason other
/// than a guardrail.
pub const FAILURE_NOTICE: &str =
    "⚠️ Something went wrong while answering. Please try again in a moment.";

/// Writes each message to stdout, followed by a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutTransport;

#[async_trait]
impl Transport for StdoutTransport {
    async fn send(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        writeln!(stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

/// An interactive chat session over a [`Transport`].
#[derive(Debug)]
pub struct ChatBot<T = StdoutTransport> {
    handler: ChatHandler,
    transport: T,
}

impl ChatBot<StdoutTransport> {
    /// Create a chatbot printing to stdout.
    #[must_use]
    pub const fn new(handler: ChatHandler) -> Self {
        Self::with_transport(handler, StdoutTransport)
    }
}

impl<T: Transport> ChatBot<T> {
    /// Create a chatbot sending through `transport`.
    #[must_use]
    pub const fn with_transport(handler: ChatHandler, transport: T) -> Self {
        Self { handler, transport }
    }

    /// The transport replies are sent through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Answer a single message.
    ///
    /// Returns `None` when the message failed; the failure is logged and
    /// [`FAILURE_NOTICE`] is sent instead.
    ///
    /// # Errors
    ///
    /// Returns an error only if the transport itself fails.
    pub async fn ask(&self, text: &str) -> Result<Option<Reply>> {
        match self
            .handler
            .handle(&self.transport, ChatEvent::MessageReceived(text.to_owned()))
            .await
        {
            Ok(reply) => Ok(reply),
            Err(err) => {
                error!(error = %err, "Failed to answer message");
                self.transport.send(FAILURE_NOTICE).await?;
                Ok(None)
            }
        }
    }

    /// Run the session: greet, then answer lines from `input` until EOF or
    /// `exit`/`quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `input` or sending fails.
    pub async fn run_with<R: BufRead>(&self, mut input: R) -> Result<()> {
        self.handler
            .handle(&self.transport, ChatEvent::SessionStarted)
            .await?;

        let mut line = String::new();
        loop {
            print!("> ");
            io::stdout().flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            let text = line.trim();
            match text {
                "" => continue,
                "exit" | "quit" => break,
                _ => {}
            }

            println!();
            self.ask(text).await?;
        }

        Ok(())
    }

    /// Run the session on stdin.
    ///
    /// # Errors
    ///
    /// See [`run_with`](Self::run_with).
    pub async fn run(&self) -> Result<()> {
        self.run_with(io::stdin().lock()).await
    }
}
