mod access;
mod app_state;
mod auth;
mod config;
mod defaults;
mod error;
mod generator;
mod handlers;
mod store;

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app_state::AppState;
use config::Config;
use generator::{ClockSeededGenerator, CredentialGenerator};
use store::{MemoryStore, seed::load_demo_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardbank_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration
    let config = Config::parse();

    // Initialize the in-memory store
    let store = Arc::new(MemoryStore::new());
    let generator: Arc<dyn CredentialGenerator> = Arc::new(ClockSeededGenerator);
    if config.seed_demo_data {
        load_demo_data(&store, generator.as_ref());
    }

    // Create shared state
    let state = AppState::new(store, generator, config.session_ttl());

    // Build router
    let app = handlers::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.socket_addr()).await?;

    tracing::info!("Server running on {}", config.socket_addr());
    tracing::info!("Login: POST /auth/login");
    tracing::info!("Cards: /api/cards/{{credit,debit,virtual}}, settings: /api/cards/settings");
    if config.seed_demo_data {
        tracing::info!("Demo users: testuser/password123, demouser/password456");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
