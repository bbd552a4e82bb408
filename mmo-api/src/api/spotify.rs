//! Spotify Web API proxy routes
//!
//! Each route resolves the Spotify session from cookies (refreshing once if
//! needed), forwards one call to the Web API and passes vendor failures
//! through with their status.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Query};
use crate::oauth::{Credential, VendorRequest};
use crate::AppState;

/// Resolve the session, send `request`, and attach refreshed cookies
async fn forward(state: &AppState, headers: &HeaderMap, request: VendorRequest, empty: Value) -> Response {
    let provider = &state.spotify;
    let session = match provider.authorize(&state.http, headers).await {
        Ok(session) => session,
        Err(e) => return e.into_response(),
    };

    let response = match provider
        .call(&state.http, Credential::Bearer(&session.access_token), request)
        .await
    {
        Ok(body) => Json(body.unwrap_or(empty)).into_response(),
        Err(e) => e.into_response(),
    };
    session.finish(provider, state.secure_cookies, response)
}

fn success() -> Value {
    json!({ "success": true })
}

/// Spotify ids are base-62
fn validate_id(id: &str, what: &str) -> ApiResult<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::BadRequest(format!("Invalid {}", what)));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct DeviceQuery {
    pub device_id: Option<String>,
}

/// PUT /api/spotify/player/pause
pub async fn pause(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DeviceQuery>,
) -> Response {
    let request = VendorRequest::put("/me/player/pause").query_opt("device_id", query.device_id);
    forward(&state, &headers, request, success()).await
}

/// PUT /api/spotify/player/play
///
/// An optional JSON body (`uris`, `context_uri`, `position_ms`, ...) is passed through.
pub async fn play(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DeviceQuery>,
    body: Bytes,
) -> Response {
    let mut request = VendorRequest::put("/me/player/play").query_opt("device_id", query.device_id);
    if !body.is_empty() {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => request = request.json(value),
            Err(e) => {
                return ApiError::BadRequest(format!("Invalid play request body: {}", e)).into_response()
            }
        }
    }
    forward(&state, &headers, request, success()).await
}

#[derive(Debug, Deserialize)]
pub struct SeekQuery {
    pub position_ms: Option<i64>,
    pub device_id: Option<String>,
}

/// PUT /api/spotify/player/seek?position_ms=
pub async fn seek(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SeekQuery>,
) -> Response {
    let position = match query.position_ms {
        Some(ms) if ms >= 0 => ms,
        _ => return ApiError::BadRequest("position_ms must be a non-negative integer".into()).into_response(),
    };
    let request = VendorRequest::put("/me/player/seek")
        .query("position_ms", position)
        .query_opt("device_id", query.device_id);
    forward(&state, &headers, request, success()).await
}

/// GET /api/spotify/player/state
///
/// `null` when nothing is playing on any device.
pub async fn player_state(State(state): State<AppState>, headers: HeaderMap) -> Response {
    forward(&state, &headers, VendorRequest::get("/me/player"), Value::Null).await
}

/// GET /api/spotify/player/devices
pub async fn devices(State(state): State<AppState>, headers: HeaderMap) -> Response {
    forward(
        &state,
        &headers,
        VendorRequest::get("/me/player/devices"),
        json!({ "devices": [] }),
    )
    .await
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/spotify/playlists
pub async fn playlists(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let request = VendorRequest::get("/me/playlists")
        .query("limit", query.limit.unwrap_or(50).clamp(1, 50))
        .query("offset", query.offset.unwrap_or(0));
    forward(&state, &headers, request, json!({ "items": [] })).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTracksQuery {
    pub playlist_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/spotify/playlist/tracks?playlistId&limit&offset
pub async fn playlist_tracks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PlaylistTracksQuery>,
) -> Response {
    let Some(playlist_id) = query.playlist_id.filter(|id| !id.is_empty()) else {
        return ApiError::BadRequest("Missing playlistId".into()).into_response();
    };
    if let Err(e) = validate_id(&playlist_id, "playlistId") {
        return e.into_response();
    }
    let request = VendorRequest::get(format!("/playlists/{}/tracks", playlist_id))
        .query("limit", query.limit.unwrap_or(100).clamp(1, 100))
        .query("offset", query.offset.unwrap_or(0));
    forward(&state, &headers, request, json!({ "items": [] })).await
}

/// Item types accepted by the search endpoint
const SEARCH_TYPES: &[&str] = &["album", "artist", "playlist", "track", "show", "episode", "audiobook"];

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/spotify/search?q&type&limit
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let Some(q) = query.q.filter(|q| !q.trim().is_empty()) else {
        return ApiError::BadRequest("Missing search query".into()).into_response();
    };
    let kind = query.kind.unwrap_or_else(|| "track".to_string());
    if !kind.split(',').all(|k| SEARCH_TYPES.contains(&k)) {
        return ApiError::BadRequest(format!("Invalid search type: {}", kind)).into_response();
    }
    let request = VendorRequest::get("/search")
        .query("q", q)
        .query("type", kind)
        .query("limit", query.limit.unwrap_or(20).clamp(1, 50));
    forward(&state, &headers, request, json!({})).await
}
