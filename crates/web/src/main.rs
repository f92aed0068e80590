use std::{sync::Arc, time::Duration};

use anyhow::Context;
use storage::{
    Store,
    kv::{HttpKvStore, KvStore, MemoryKvStore},
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod routes;
mod state;

use config::{Config, KvBackend};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::leaderboard::handlers::get_leaderboard,
        features::leaderboard::handlers::submit_game,
    ),
    components(
        schemas(
            storage::dto::leaderboard::SubmitGameRequest,
            storage::dto::leaderboard::SubmitGameResponse,
            storage::models::PlayerStats,
            storage::models::PlayerProfile,
            storage::models::LeaderboardEntry,
            storage::models::Leaderboard,
            storage::models::GameResult,
        )
    ),
    tags(
        (name = "leaderboard", description = "Player stats and ranking endpoints"),
    )
)]
struct ApiDoc;

fn build_store(config: &Config) -> anyhow::Result<Store> {
    let kv: Arc<dyn KvStore> = match config.kv_backend {
        KvBackend::Http => {
            let store = HttpKvStore::new(
                &config.kv_base_url,
                &config.kv_namespace_id,
                config.kv_timeout,
            )
            .context("Failed to initialize KV client")?;
            tracing::info!(
                "Using KV store at {} (timeout {:?})",
                store.base_url(),
                config.kv_timeout
            );
            Arc::new(store)
        }
        KvBackend::Memory => {
            tracing::warn!("Using in-memory KV store, data will not survive a restart");
            Arc::new(MemoryKvStore::new())
        }
    };

    Ok(Store::from_arc(kv))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting leaderboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let store = build_store(&config)?;
    let state = AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
