//! Marker states of streamed content (YouTube videos, Spotify tracks)

use axum::extract::{Path, State};
use mmo_common::MarkerState;
use serde::Deserialize;

use super::blocking;
use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Query};
use crate::AppState;

fn validate_video_id(video_id: &str) -> ApiResult<()> {
    let valid = !video_id.is_empty()
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ApiError::BadRequest(format!("Invalid video id: {}", video_id)));
    }
    Ok(())
}

/// GET /api/youtube/markers/:video_id
pub async fn get_youtube_markers(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<MarkerState>> {
    validate_video_id(&video_id)?;
    let store = state.youtube_markers.clone();
    Ok(Json(blocking(move || store.load(&video_id)).await?))
}

/// PUT /api/youtube/markers/:video_id
pub async fn put_youtube_markers(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Json(markers): Json<MarkerState>,
) -> ApiResult<Json<MarkerState>> {
    validate_video_id(&video_id)?;
    markers.validate()?;
    let store = state.youtube_markers.clone();
    blocking(move || store.save(&video_id, &markers).map(|()| markers))
        .await
        .map(Json)
}

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    /// Spotify track URI, e.g. `spotify:track:<id>`
    pub uri: Option<String>,
}

impl TrackQuery {
    fn require(self) -> ApiResult<String> {
        self.uri
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Missing uri query parameter".to_string()))
    }
}

/// GET /api/spotify/markers?uri=
pub async fn get_spotify_markers(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> ApiResult<Json<MarkerState>> {
    let uri = query.require()?;
    let store = state.spotify_markers.clone();
    Ok(Json(blocking(move || store.load(&uri)).await?))
}

/// PUT /api/spotify/markers?uri=
pub async fn put_spotify_markers(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
    Json(markers): Json<MarkerState>,
) -> ApiResult<Json<MarkerState>> {
    let uri = query.require()?;
    markers.validate()?;
    let store = state.spotify_markers.clone();
    blocking(move || store.save(&uri, &markers).map(|()| markers))
        .await
        .map(Json)
}
