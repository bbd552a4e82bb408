//! Settings actions

use axum::{extract::State, Json};
use mmo_common::storage::{reset_all_markers, ResetSummary};
use std::path::PathBuf;

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/settings/reset-markers
///
/// Empties every stored marker state: sidecars and audio metadata of every
/// registered root, plus all YouTube and Spotify entries.
pub async fn reset_markers(State(state): State<AppState>) -> ApiResult<Json<ResetSummary>> {
    let mut roots: Vec<PathBuf> = state
        .library
        .roots()
        .await
        .into_iter()
        .map(|root| root.path)
        .collect();
    roots.sort();
    roots.dedup();
    let summary = reset_all_markers(
        &roots,
        &state.audio,
        &state.youtube_markers,
        &state.spotify_markers,
    )
    .await?;
    Ok(Json(summary))
}
