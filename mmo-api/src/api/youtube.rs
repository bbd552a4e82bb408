//! YouTube Data API proxy routes

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Query};
use crate::oauth::{Credential, Session, SessionCookies, SessionState, VendorRequest};
use crate::AppState;

/// Upper bound on `playlistItems` pages fetched for one request
pub const MAX_PLAYLIST_PAGES: usize = 20;

/// Items per `playlistItems` page (API maximum)
const PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistQuery {
    pub playlist_id: Option<String>,
    #[serde(default)]
    pub include_items: Option<bool>,
}

/// How a YouTube request is authorized
enum Access {
    OAuth(Session),
    ApiKey(String),
}

impl Access {
    fn credential(&self) -> Credential<'_> {
        match self {
            Access::OAuth(session) => Credential::Bearer(&session.access_token),
            Access::ApiKey(key) => Credential::ApiKey(key),
        }
    }
}

/// Prefer the user's OAuth session, fall back to the public API key
async fn resolve_access(state: &AppState, headers: &HeaderMap) -> ApiResult<Access> {
    let provider = &state.youtube;
    let cookies = SessionCookies::from_headers(provider, headers);
    if cookies.state(mmo_common::time::now_millis()) != SessionState::Unauthenticated {
        return provider.authorize(&state.http, headers).await.map(Access::OAuth);
    }

    match &state.youtube_api_key {
        Some(key) => Ok(Access::ApiKey(key.clone())),
        None if provider.is_configured() => Err(ApiError::Unauthorized(
            "Not authenticated with YouTube".to_string(),
        )),
        None => Err(ApiError::Config(
            "YouTube API key or OAuth credentials not configured".to_string(),
        )),
    }
}

async fn fetch_playlist(
    state: &AppState,
    credential: Credential<'_>,
    playlist_id: &str,
    include_items: bool,
) -> ApiResult<Value> {
    let provider = &state.youtube;
    let request = VendorRequest::get("/playlists")
        .query("part", "snippet,contentDetails")
        .query("id", playlist_id);
    let body = provider.call(&state.http, credential, request).await?;

    let playlist = body
        .as_ref()
        .and_then(|b| b.get("items"))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Playlist not found: {}", playlist_id)))?;

    if !include_items {
        return Ok(json!({ "playlist": playlist }));
    }

    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    for page in 0..MAX_PLAYLIST_PAGES {
        let request = VendorRequest::get("/playlistItems")
            .query("part", "snippet,contentDetails")
            .query("playlistId", playlist_id)
            .query("maxResults", PAGE_SIZE)
            .query_opt("pageToken", page_token.take());
        let body = provider.call(&state.http, credential, request).await?.unwrap_or(Value::Null);

        if let Some(page_items) = body.get("items").and_then(Value::as_array) {
            items.extend(page_items.iter().cloned());
        }
        page_token = body
            .get("nextPageToken")
            .and_then(Value::as_str)
            .map(str::to_string);

        if page_token.is_none() {
            break;
        }
        if page + 1 == MAX_PLAYLIST_PAGES {
            warn!(playlist_id, pages = MAX_PLAYLIST_PAGES, "Playlist truncated at page limit");
        }
    }
    debug!(playlist_id, items = items.len(), "Fetched playlist items");

    Ok(json!({ "playlist": playlist, "items": items }))
}

/// GET /api/youtube/playlist?playlistId&includeItems
pub async fn playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PlaylistQuery>,
) -> Response {
    let Some(playlist_id) = query.playlist_id.filter(|id| !id.trim().is_empty()) else {
        return ApiError::BadRequest("Missing playlistId".into()).into_response();
    };

    let access = match resolve_access(&state, &headers).await {
        Ok(access) => access,
        Err(e) => return e.into_response(),
    };

    let result = fetch_playlist(
        &state,
        access.credential(),
        &playlist_id,
        query.include_items.unwrap_or(false),
    )
    .await;
    let response = match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    };

    match &access {
        Access::OAuth(session) => session.finish(&state.youtube, state.secure_cookies, response),
        Access::ApiKey(_) => response,
    }
}
