//! HVAC Diagnostic Assistant daemon.
//!
//! Accepts technician submissions, classifies symptoms with a fixed rule
//! engine, and optionally asks a text-generation backend for a long-form
//! writeup. The backend is best-effort: when it is absent or failing, every
//! submission still gets the deterministic rule-based diagnosis.

use anyhow::Result;
use hvac_common::llm::{LlmError, OpenAiBackend, TextGenerator};
use hvacd::config::Config;
use hvacd::server::{self, AppState};
use std::sync::Arc;
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("hvacd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();

    let generator: Option<Arc<dyn TextGenerator>> = match OpenAiBackend::from_config(&config.llm) {
        Ok(backend) => {
            info!(
                "LLM enhancement enabled: {} at {}",
                config.llm.model, config.llm.base_url
            );
            Some(Arc::new(backend))
        }
        Err(LlmError::Disabled) => {
            info!("LLM enhancement disabled in configuration");
            None
        }
        Err(e) => {
            warn!("LLM backend unavailable, running rule-based only: {}", e);
            None
        }
    };

    server::run(AppState::new(config, generator)).await
}
