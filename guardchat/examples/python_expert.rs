//! The gated Python expert, offline.
//!
//! A scripted backend stands in for Gemini so every path of the pipeline can
//! be seen without an API key: an answered question, a question blocked by
//! the input gate, and an answer blocked by the output gate. A second agent
//! shows a hand-written input check stacked in front of the classifier.
//!
//! ```bash
//! cargo run --example python_expert
//! ```

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use async_trait::async_trait;
use guardchat::expert::{
    EXPERT_INSTRUCTIONS, INPUT_CLASSIFIER_INSTRUCTIONS, OUTPUT_CLASSIFIER_INSTRUCTIONS,
    input_classifier, python_expert,
};
use guardchat::prelude::*;

const YES: &str = r#"{"on_topic": true, "reasoning": "About Python."}"#;
const NO: &str = r#"{"on_topic": false, "reasoning": "Not about Python."}"#;

/// Rejects questions longer than a fixed number of characters.
struct LengthLimit(usize);

#[async_trait]
impl InputGuardrailCheck for LengthLimit {
    async fn check(
        &self,
        _context: &RunContext,
        _agent_name: &str,
        input: &str,
    ) -> Result<GuardrailOutput> {
        let chars = input.chars().count();
        if chars > self.0 {
            return Ok(GuardrailOutput::tripwire(format!(
                "question is {chars} characters, limit is {}",
                self.0
            )));
        }
        Ok(GuardrailOutput::pass())
    }
}

fn scripted_backend() -> Arc<MockModel> {
    Arc::new(
        MockModel::new("gemini-1.5-flash")
            .when(
                |call| {
                    call.system.as_deref() == Some(INPUT_CLASSIFIER_INSTRUCTIONS)
                        && call.user.contains("Python")
                },
                YES,
            )
            .when_system_contains(INPUT_CLASSIFIER_INSTRUCTIONS, NO)
            .when(
                |call| {
                    call.system.as_deref() == Some(OUTPUT_CLASSIFIER_INSTRUCTIONS)
                        && call.user.contains("def ")
                },
                YES,
            )
            .when_system_contains(OUTPUT_CLASSIFIER_INSTRUCTIONS, NO)
            .when_user_contains(
                "decorators",
                "Decorators are lovely in spring, much like tulips.",
            )
            .when_system_contains(
                EXPERT_INSTRUCTIONS,
                "A list comprehension builds a list inline:\n\n    def squares(n):\n        return [i * i for i in range(n)]",
            ),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let model = scripted_backend();
    let handler = ChatHandler::new(python_expert(model.clone()));
    let transport = MemoryTransport::new();

    handler.on_chat_start(&transport).await?;
    for question in [
        "What is a list comprehension in Python?",
        "What's the capital of France?",
        "Explain Python decorators",
    ] {
        let reply = handler.on_message(&transport, question).await?;
        println!("> {question}\n[{:?}]", reply.kind);
    }

    println!();
    for message in transport.sent() {
        println!("{message}\n");
    }
    println!("backend calls: {}", model.call_count());

    // A cheap local check runs before the model-backed classifier.
    let strict = Agent::new("StrictExpert")
        .instructions(EXPERT_INSTRUCTIONS)
        .model(model.clone())
        .input_guardrail(InputGuardrail::new("length_limit", LengthLimit(40)))
        .input_guardrail(InputGuardrail::new(
            "python_guardrail",
            input_classifier(model.clone()),
        ));

    let before = model.call_count();
    match strict
        .run("In Python, how would I write a function that memoizes results?")
        .await
    {
        Err(Error::Agent(AgentError::InputGuardrailTriggered { name, info })) => {
            println!("Blocked by '{name}': {info}");
        }
        other => println!("Unexpected: {other:?}"),
    }
    println!("backend calls for the strict run: {}", model.call_count() - before);

    Ok(())
}
