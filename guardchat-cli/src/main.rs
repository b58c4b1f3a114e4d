//! Guardchat CLI - chat with the gated Python expert in a terminal.

#![allow(clippy::print_stdout)]

use anyhow::{Context, bail};
use clap::Parser;
use guardchat::chat::ChatHandler;
use guardchat::config::{API_KEY_ENV, DEFAULT_MODEL, ModelConfig};
use guardchat::expert::python_expert;
use guardchat::providers::GEMINI_OPENAI_BASE_URL;
use guardchat_cli::ChatBot;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Guardchat CLI - a Python expert that only talks about Python
#[derive(Parser, Debug)]
#[command(name = "guardchat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// API key for the model endpoint
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, env = "GEMINI_BASE_URL", default_value = GEMINI_OPENAI_BASE_URL)]
    base_url: String,

    /// Model name
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Request timeout in seconds (waits indefinitely if unset)
    #[arg(long, env = "GEMINI_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Ask a single question and exit
    #[arg(long)]
    message: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("guardchat=debug,guardchat_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("guardchat=warn,guardchat_cli=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the shell.
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let Some(api_key) = args.api_key.filter(|key| !key.trim().is_empty()) else {
        bail!("{API_KEY_ENV} is not set; export it, put it in a .env file, or pass --api-key");
    };

    let config = ModelConfig {
        base_url: args.base_url,
        model: args.model,
        timeout_secs: args.timeout_secs,
        ..ModelConfig::new(api_key)
    };
    tracing::debug!(?config, "Model configuration");

    let model = config
        .build_model()
        .context("failed to build the model client")?;
    let chatbot = ChatBot::new(ChatHandler::new(python_expert(model)));

    if let Some(message) = args.message {
        if chatbot.ask(&message).await?.is_none() {
            bail!("the message could not be answered");
        }
        return Ok(());
    }

    println!("Guardchat (type 'exit' or Ctrl+D to quit)");
    println!();
    chatbot.run().await?;

    Ok(())
}
