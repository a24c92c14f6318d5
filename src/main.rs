use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tugscore::{api, auth::AuthConfig, config::ServerConfig, state::AppState, store::GameStore};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tugscore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TUG Rummy scorekeeper...");

    let config = ServerConfig::from_env();
    let auth = AuthConfig::from_env();
    let store = GameStore::new(&config.state_file, &config.auth_file);

    let game = store.load().await;
    if game.is_setup() {
        tracing::info!(
            "Resuming game with {} players and {} rounds from {}",
            game.players.len(),
            game.rounds.len(),
            config.state_file.display()
        );
    } else {
        tracing::info!("No saved game, waiting for admin setup");
    }

    let state = Arc::new(AppState::new(store, auth));
    let app = api::router(state);

    tracing::info!("Listening on http://{}", config.bind_addr);
    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
