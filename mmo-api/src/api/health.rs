//! Health check endpoint
//!
//! Reports which vendor integrations can be used and how many library roots
//! are registered, so a client can hide features that would only fail.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Vendor integrations with usable configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    /// Spotify OAuth client id and secret present
    pub spotify: bool,
    /// YouTube OAuth client id and secret present
    pub youtube: bool,
    /// Public YouTube Data API key present
    pub youtube_api_key: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub providers: ProviderStatus,
    pub library_roots: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: "mmo-api",
        version: env!("CARGO_PKG_VERSION"),
        providers: ProviderStatus {
            spotify: state.spotify.is_configured(),
            youtube: state.youtube.is_configured(),
            youtube_api_key: state.youtube_api_key.is_some(),
        },
        library_roots: state.library.roots().await.len(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
