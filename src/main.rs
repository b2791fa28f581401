//! Benefit consolidation server.
//!
//! ```bash
//! GOOGLE_API_KEY=... cargo run
//!
//! curl -X POST http://127.0.0.1:3000/chat \
//!   -H "Content-Type: application/json" \
//!   -d '{"message": "gerar planilha"}'
//! curl http://127.0.0.1:3000/health
//! ```
//!
//! `BENEFIT_ENGINE_CONFIG` points at a configuration directory
//! (default `./config/default`); `BENEFIT_ENGINE_ADDR` sets the bind address.

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use benefit_engine::api::{AppState, create_router};
use benefit_engine::config::ConfigLoader;
use benefit_engine::llm::{GeminiClient, LanguageModel};

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

fn load_config() -> Result<ConfigLoader, Box<dyn std::error::Error>> {
    let dir = std::env::var("BENEFIT_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    if Path::new(&dir).is_dir() {
        info!(dir = %dir, "Loading configuration");
        Ok(ConfigLoader::load(&dir)?)
    } else {
        warn!(dir = %dir, "Configuration directory not found, using built-in defaults");
        Ok(ConfigLoader::default())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("benefit-engine v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    let model: Option<Arc<dyn LanguageModel>> = match GeminiClient::from_env(&config.config().ai) {
        Ok(client) => {
            info!(model = %client.name(), "Language model configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(error = %e, "Running without a language model; consolidations use the deterministic path");
            None
        }
    };

    let app = create_router(AppState::new(config, model));

    let addr = std::env::var("BENEFIT_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
