//! OAuth login, callback, status and logout routes
//!
//! The same flow serves both providers; the thin handlers at the bottom only
//! pick which provider from [`AppState`] to use.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cookies::{self, append_cookies};
use crate::error::{ApiError, ApiResult};
use crate::extract::{Json, Query};
use crate::oauth::{OAuthProvider, SessionCookies, SessionState};
use crate::AppState;

/// Query of `GET /api/{provider}/login`
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Local path to return to after the callback
    pub redirect: Option<String>,
}

/// Query of `GET /api/{provider}/callback`
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Response of `GET /api/{provider}/status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub configured: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Accept only local, cookie-safe redirect targets
fn sanitize_redirect(redirect: Option<&str>) -> Option<&str> {
    redirect.filter(|r| r.starts_with('/') && !r.starts_with("//") && cookies::is_cookie_safe(r))
}

async fn login(state: &AppState, provider: &OAuthProvider, query: LoginQuery) -> ApiResult<Response> {
    let csrf_state = Uuid::new_v4().simple().to_string();
    let url = provider.authorize_url(&csrf_state)?;
    let redirect = sanitize_redirect(query.redirect.as_deref());

    info!(provider = provider.kind.name(), "Starting OAuth login");
    Ok(append_cookies(
        found(&url),
        &provider.login_cookies(&csrf_state, redirect, state.secure_cookies),
    ))
}

async fn callback(
    state: &AppState,
    provider: &OAuthProvider,
    headers: &HeaderMap,
    query: CallbackQuery,
) -> ApiResult<Response> {
    provider.credentials()?;

    if let Some(error) = query.error {
        warn!(provider = provider.kind.name(), %error, "Authorization denied");
        return Err(ApiError::BadRequest(format!("Authorization failed: {}", error)));
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".to_string()))?;

    let expected = cookies::read_cookie(headers, &provider.cookies.state);
    match (query.state.as_deref(), expected.as_deref()) {
        (Some(received), Some(expected)) if !received.is_empty() && received == expected => {}
        _ => {
            warn!(provider = provider.kind.name(), "OAuth state mismatch");
            return Err(ApiError::BadRequest("Invalid OAuth state".to_string()));
        }
    }

    let tokens = provider.exchange_code(&state.http, &code).await?;
    info!(provider = provider.kind.name(), "OAuth login complete");

    let redirect = cookies::read_cookie(headers, &provider.cookies.redirect);
    let location = sanitize_redirect(redirect.as_deref()).unwrap_or("/");

    let secure = state.secure_cookies;
    let mut set = tokens.cookies(provider, secure);
    set.push(cookies::clear_cookie(&provider.cookies.state, secure));
    set.push(cookies::clear_cookie(&provider.cookies.redirect, secure));
    Ok(append_cookies(found(location), &set))
}

fn status(provider: &OAuthProvider, headers: &HeaderMap) -> StatusResponse {
    let session = SessionCookies::from_headers(provider, headers);
    match session.state(mmo_common::time::now_millis()) {
        SessionState::Authenticated { expires_at, .. } => StatusResponse {
            configured: provider.is_configured(),
            authenticated: true,
            expires_at: Some(expires_at),
        },
        SessionState::ExpiredRefreshable { .. } => StatusResponse {
            configured: provider.is_configured(),
            authenticated: true,
            expires_at: session.expires_at,
        },
        SessionState::Unauthenticated => StatusResponse {
            configured: provider.is_configured(),
            authenticated: false,
            expires_at: None,
        },
    }
}

fn logout(state: &AppState, provider: &OAuthProvider) -> Response {
    info!(provider = provider.kind.name(), "Logged out");
    append_cookies(
        Json(json!({ "success": true })).into_response(),
        &provider.clear_cookies(state.secure_cookies),
    )
}

/// GET /api/spotify/login
pub async fn spotify_login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> ApiResult<Response> {
    login(&state, &state.spotify, query).await
}

/// GET /api/spotify/callback
pub async fn spotify_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Response> {
    callback(&state, &state.spotify, &headers, query).await
}

/// GET /api/spotify/status
pub async fn spotify_status(State(state): State<AppState>, headers: HeaderMap) -> Json<StatusResponse> {
    Json(status(&state.spotify, &headers))
}

/// POST /api/spotify/logout
pub async fn spotify_logout(State(state): State<AppState>) -> Response {
    logout(&state, &state.spotify)
}

/// GET /api/youtube/login
pub async fn youtube_login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> ApiResult<Response> {
    login(&state, &state.youtube, query).await
}

/// GET /api/youtube/callback
pub async fn youtube_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Response> {
    callback(&state, &state.youtube, &headers, query).await
}

/// GET /api/youtube/status
pub async fn youtube_status(State(state): State<AppState>, headers: HeaderMap) -> Json<StatusResponse> {
    Json(status(&state.youtube, &headers))
}

/// POST /api/youtube/logout
pub async fn youtube_logout(State(state): State<AppState>) -> Response {
    logout(&state, &state.youtube)
}
