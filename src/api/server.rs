//! Axum API server for the codes endpoints.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::error::Result;
use crate::orchestrator::CodeFinder;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator every endpoint delegates to.
    pub finder: Arc<CodeFinder>,
}

impl AppState {
    pub fn new(finder: Arc<CodeFinder>) -> Self {
        Self { finder }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    // The endpoints serve non-browser clients (mobile app, share extension,
    // test scripts); CORS stays permissive for the occasional web caller.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([HeaderName::from_static("content-type")]);

    Router::new()
        .route("/", get(super::routes::health::root))
        .route("/codes", post(super::routes::codes::get_codes))
        .route(
            "/codes-detailed",
            post(super::routes::codes::get_detailed_codes),
        )
        .route(
            "/codes-detailed-chatgpt",
            post(super::routes::codes::get_detailed_codes_chatgpt),
        )
        // Prompts are short; reject oversized payloads before JSON parsing.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the API server and serve until shutdown.
pub async fn start_server(settings: &Settings, state: AppState) -> Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("codes API server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
