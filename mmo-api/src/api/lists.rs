//! Favorites, recently viewed and saved tag lists

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use mmo_common::models::{FavoriteItem, FavoriteKind, RecentItem};
use mmo_common::time::now_millis;
use serde::{Deserialize, Serialize};

use super::blocking;
use crate::error::{ApiError, ApiResult};
use crate::extract::Json;
use crate::AppState;

/// Body identifying a media item by path or content id
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ItemRequest {
    fn require_id(&self) -> ApiResult<()> {
        if self.id.trim().is_empty() {
            return Err(ApiError::BadRequest("Missing item id".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: String,
    pub favorite: bool,
}

/// GET /api/favorites/:kind
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<FavoriteItem>>> {
    let kind: FavoriteKind = kind.parse()?;
    let favorites = state.favorites.clone();
    Ok(Json(blocking(move || favorites.list(kind)).await?))
}

/// POST /api/favorites/:kind/toggle
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<ItemRequest>,
) -> ApiResult<Json<ToggleResponse>> {
    let kind: FavoriteKind = kind.parse()?;
    request.require_id()?;
    let item = FavoriteItem {
        id: request.id.clone(),
        title: request.title,
        added_at: now_millis(),
    };
    let favorites = state.favorites.clone();
    let favorite = blocking(move || favorites.toggle(kind, item)).await?;
    Ok(Json(ToggleResponse {
        id: request.id,
        favorite,
    }))
}

/// GET /api/recent
pub async fn list_recent(State(state): State<AppState>) -> ApiResult<Json<Vec<RecentItem>>> {
    let recent = state.recent.clone();
    Ok(Json(blocking(move || recent.list()).await?))
}

/// POST /api/recent
pub async fn record_recent(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> ApiResult<Json<Vec<RecentItem>>> {
    request.require_id()?;
    let item = RecentItem {
        id: request.id,
        title: request.title,
        viewed_at: now_millis(),
    };
    let recent = state.recent.clone();
    Ok(Json(blocking(move || recent.record(item)).await?))
}

/// DELETE /api/recent
pub async fn clear_recent(State(state): State<AppState>) -> ApiResult<StatusCode> {
    let recent = state.recent.clone();
    blocking(move || recent.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let tags = state.tags.clone();
    Ok(Json(blocking(move || tags.list()).await?))
}

/// POST /api/tags
pub async fn add_tag(
    State(state): State<AppState>,
    Json(request): Json<TagRequest>,
) -> ApiResult<Json<Vec<String>>> {
    let tags = state.tags.clone();
    Ok(Json(blocking(move || tags.add(&request.tag)).await?))
}

/// DELETE /api/tags/:tag
pub async fn remove_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let tags = state.tags.clone();
    Ok(Json(blocking(move || tags.remove(&tag)).await?))
}
