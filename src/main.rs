//! Story Backend
//!
//! Entry point: loads configuration, wires the Ollama provider, narrator,
//! session store and profanity proxy together, then serves HTTP.

use anyhow::{Context, Result};
use ollama_rs::Ollama;
use std::sync::Arc;
use tracing::info;

use story_backend::server::{run_server, AppState};
use story_backend::services::ProfanityClient;
use story_backend::utils::{otel, SystemHardening};
use story_backend::{Narrator, OllamaProvider, SessionStore, StoryConfig, ThoughtSplitter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = StoryConfig::from_env().context("Failed to load configuration")?;

    // Initialize logging
    let _otel_guard = if config.otlp_enabled {
        Some(otel::init_telemetry("story_backend").map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?)
    } else {
        otel::init_logging().map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
        None
    };

    info!("Story backend v{} using model '{}'", env!("CARGO_PKG_VERSION"), config.model);

    let provider = Arc::new(OllamaProvider::new(
        Ollama::new(config.ollama_host.clone(), config.ollama_port),
        config.model.clone(),
    ));
    SystemHardening::verify_environment(&provider).await;

    let narrator = Narrator::new(provider)
        .with_splitter(ThoughtSplitter::new(config.think_open.clone(), config.think_close.clone()))
        .with_timeout(config.model_timeout);

    let profanity = ProfanityClient::new(
        config.profanity_url.clone(),
        config.profanity_api_key.clone(),
        config.profanity_timeout,
    )
    .context("Failed to build profanity client")?;

    let state = AppState {
        narrator: Arc::new(narrator),
        sessions: Arc::new(SessionStore::with_max_sessions(
            config.initial_message.clone(),
            config.max_sessions,
        )),
        profanity: Arc::new(profanity),
    };

    run_server(state, &config.bind_addr).await
}
