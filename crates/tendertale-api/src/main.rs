//! Tendertale API server entry point.

use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{HeaderValue, Method, header};
use tendertale_api::config::{ServerConfig, origin_matches};
use tendertale_api::error::AppError;
use tendertale_api::state::AppState;
use tendertale_core::clock::SystemClock;
use tendertale_store::{FsSaveRepository, FsSceneRepository};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config.allowed_origins();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request: &Parts| {
                origin.to_str().is_ok_and(|origin| {
                    origins
                        .iter()
                        .any(|pattern| origin_matches(pattern, origin))
                })
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Tendertale API server");

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;
    tracing::info!(
        scenes_dir = %config.scenes_dir.display(),
        saves_dir = %config.saves_dir.display(),
        "using filesystem stores"
    );

    // Build application state.
    let app_state = AppState::new(
        Arc::new(FsSceneRepository::new(&config.scenes_dir)),
        Arc::new(FsSaveRepository::new(&config.saves_dir)),
        Arc::new(SystemClock),
    );

    // Build router.
    let app = tendertale_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    // Start server.
    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
