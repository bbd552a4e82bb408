//! Root folders, file listings and per-root marker persistence

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use mmo_common::library::{resolve_relative, MediaFile, MediaKind, RootEntry};
use mmo_common::models::SavedPlaylist;
use mmo_common::storage::audio_metadata::AudioMetadataDocument;
use mmo_common::storage::{playlists, sidecar};
use mmo_common::{AudioMetadata, MarkerState};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Query};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddRootRequest {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// `?path=` naming a media file relative to its root
#[derive(Debug, Deserialize)]
pub struct MediaPathQuery {
    pub path: Option<String>,
}

impl MediaPathQuery {
    /// The relative path, rejected when missing or escaping `root`
    fn require(self, root: &RootEntry) -> ApiResult<String> {
        let path = self
            .path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Missing path query parameter".to_string()))?;
        resolve_relative(&root.path, &path)?;
        Ok(path)
    }
}

/// GET /api/library/roots
pub async fn list_roots(State(state): State<AppState>) -> Json<Vec<RootEntry>> {
    Json(state.library.roots().await)
}

/// POST /api/library/roots
pub async fn add_root(
    State(state): State<AppState>,
    Json(request): Json<AddRootRequest>,
) -> ApiResult<(StatusCode, Json<RootEntry>)> {
    let entry = state.library.add_root(&request.path, request.kind).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/library/roots/:id
pub async fn remove_root(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    match state.library.remove_root(&id).await {
        Some(entry) => {
            info!(id = %entry.id, path = %entry.path.display(), "Removed root folder");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("Root not found: {}", id))),
    }
}

/// GET /api/library/roots/:id/files
pub async fn list_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MediaFile>>> {
    Ok(Json(state.library.scan(&id).await?))
}

/// GET /api/library/roots/:id/markers?path=
///
/// `null` when the video has never been saved.
pub async fn get_markers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MediaPathQuery>,
) -> ApiResult<Json<Option<MarkerState>>> {
    let root = state.library.root(&id).await?;
    let path = query.require(&root)?;
    Ok(Json(sidecar::load_markers(&root.path, &path).await?))
}

/// PUT /api/library/roots/:id/markers?path=
pub async fn put_markers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MediaPathQuery>,
    Json(markers): Json<MarkerState>,
) -> ApiResult<Json<MarkerState>> {
    let root = state.library.root(&id).await?;
    let path = query.require(&root)?;
    markers.validate()?;
    sidecar::save_markers(&root.path, &path, &markers).await?;
    Ok(Json(markers))
}

/// GET /api/library/roots/:id/audio-metadata?path=
pub async fn get_audio_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MediaPathQuery>,
) -> ApiResult<Json<AudioMetadata>> {
    let root = state.library.root(&id).await?;
    let path = query.require(&root)?;
    Ok(Json(state.audio.get_audio_metadata(&root.path, &path).await?))
}

/// PUT /api/library/roots/:id/audio-metadata?path=
pub async fn put_audio_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MediaPathQuery>,
    Json(metadata): Json<AudioMetadata>,
) -> ApiResult<Json<AudioMetadata>> {
    let root = state.library.root(&id).await?;
    let path = query.require(&root)?;
    metadata.marker_state.validate()?;
    let saved = state
        .audio
        .save_audio_metadata(&root.path, &path, metadata)
        .await?;
    Ok(Json(saved))
}

/// GET /api/library/roots/:id/audio-metadata/all
pub async fn get_all_audio_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AudioMetadataDocument>> {
    let root = state.library.root(&id).await?;
    Ok(Json(state.audio.get_all(&root.path).await?))
}

/// GET /api/library/roots/:id/youtube-playlists
pub async fn get_playlists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SavedPlaylist>>> {
    let root = state.library.root(&id).await?;
    Ok(Json(playlists::load_playlists(&root.path).await?))
}

/// PUT /api/library/roots/:id/youtube-playlists
pub async fn put_playlists(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(list): Json<Vec<SavedPlaylist>>,
) -> ApiResult<Json<Vec<SavedPlaylist>>> {
    let root = state.library.root(&id).await?;
    Ok(Json(playlists::save_playlists(&root.path, &list).await?))
}
