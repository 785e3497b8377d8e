//! Streaming chat example with tool-protocol resolution.
//!
//! This example shows how to:
//! - Load handler configuration and provider settings from the environment
//! - Resolve the tool protocol for a resumed conversation
//! - Stream normalized reasoning, text and usage events
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export LLM_MODEL_ID="gpt-5-mini"
//! cargo run --example stream_chat
//! ```

use futures_util::StreamExt;
use multi_llm_stream::{
    ApiHandler, ConversationMessage, HandlerConfig, ModelInfo, OpenAICompatibleHandler,
    ProtocolLock, ProviderSettings, StaticModelCatalog, StreamEvent,
};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HandlerConfig::from_env()?;
    let settings = ProviderSettings::from_env();

    // Only the limits we actually know; unknown models get no limit at all
    let catalog = StaticModelCatalog::new().with_model(
        config.model_id.clone(),
        ModelInfo {
            max_tokens: Some(4096),
            ..ModelInfo::default()
        },
    );

    let history = vec![ConversationMessage::user(
        "What is the capital of France? Answer in one sentence.",
    )
    .stamped()];

    let lock = ProtocolLock::from_history(&history);
    println!("Tool protocol: {}", lock.resolve(&settings, None));

    let handler = OpenAICompatibleHandler::new(config, Arc::new(catalog))?;
    println!("Streaming from {}...\n", handler.model_id());

    let mut events = handler
        .create_message("You are a helpful assistant. Be concise.", &history)
        .await?;

    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::Reasoning { text } => eprint!("{text}"),
            StreamEvent::Text { text } => {
                print!("{text}");
                std::io::stdout().flush()?;
            }
            StreamEvent::Usage(usage) => println!(
                "\n\nToken usage: {} input + {} output",
                usage.input_tokens, usage.output_tokens
            ),
        }
    }

    Ok(())
}
