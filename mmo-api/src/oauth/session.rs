//! Per-provider session state carried in cookies
//!
//! A request is in one of three states:
//! - **Unauthenticated**: no usable access token and no refresh token
//! - **Authenticated**: access token valid until `expires_at - 60s`
//! - **ExpiredRefreshable**: access token missing or past the buffer, refresh token present
//!
//! Resolving an ExpiredRefreshable session performs exactly one refresh call;
//! the new tokens go back to the client as `Set-Cookie` headers on whatever
//! response the request produces. A failed refresh is a 401 and leaves the
//! client's cookies untouched.

use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::provider::{OAuthProvider, ProviderKind};
use crate::cookies::{self, LOGIN_MAX_AGE_SECS, REFRESH_MAX_AGE_SECS};
use crate::error::{ApiError, ApiResult};

/// Access tokens are treated as expired this long before their stated expiry
pub const EXPIRY_BUFFER_MS: i64 = 60_000;

/// Assumed token lifetime when the provider omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Token cookies sent with a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Unix epoch milliseconds
    pub expires_at: Option<i64>,
}

/// Where a request stands with one provider
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { access_token: String, expires_at: i64 },
    ExpiredRefreshable { refresh_token: String },
}

impl SessionCookies {
    pub fn from_headers(provider: &OAuthProvider, headers: &HeaderMap) -> Self {
        Self {
            access_token: cookies::read_cookie(headers, &provider.cookies.access_token),
            refresh_token: cookies::read_cookie(headers, &provider.cookies.refresh_token),
            expires_at: cookies::read_cookie(headers, &provider.cookies.expires_at)
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Classify the cookies at time `now_ms`
    pub fn state(&self, now_ms: i64) -> SessionState {
        if let (Some(token), Some(expires_at)) = (&self.access_token, self.expires_at) {
            if now_ms < expires_at - EXPIRY_BUFFER_MS {
                return SessionState::Authenticated {
                    access_token: token.clone(),
                    expires_at,
                };
            }
        }
        match &self.refresh_token {
            Some(refresh) => SessionState::ExpiredRefreshable {
                refresh_token: refresh.clone(),
            },
            None => SessionState::Unauthenticated,
        }
    }
}

/// Token endpoint response body
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Tokens to hand back to the client
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSet {
    pub access_token: String,
    /// Only set when the provider issued a (new) refresh token
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    /// Unix epoch milliseconds
    pub expires_at: i64,
}

impl TokenSet {
    fn from_response(response: TokenResponse, now_ms: i64) -> Self {
        let expires_in = response
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            expires_in,
            expires_at: now_ms + expires_in * 1000,
        }
    }

    /// `Set-Cookie` values storing these tokens
    pub fn cookies(&self, provider: &OAuthProvider, secure: bool) -> Vec<String> {
        let names = &provider.cookies;
        let mut out = vec![
            cookies::set_cookie(&names.access_token, &self.access_token, self.expires_in, secure),
            cookies::set_cookie(
                &names.expires_at,
                &self.expires_at.to_string(),
                self.expires_in,
                secure,
            ),
        ];
        if let Some(refresh) = &self.refresh_token {
            out.push(cookies::set_cookie(
                &names.refresh_token,
                refresh,
                REFRESH_MAX_AGE_SECS,
                secure,
            ));
        }
        out
    }
}

/// A usable access token, plus refreshed tokens to write back
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refreshed: Option<TokenSet>,
}

impl Session {
    /// Attach refreshed-token cookies (if any) to a response
    pub fn finish(&self, provider: &OAuthProvider, secure: bool, response: Response) -> Response {
        match &self.refreshed {
            Some(tokens) => cookies::append_cookies(response, &tokens.cookies(provider, secure)),
            None => response,
        }
    }
}

impl OAuthProvider {
    /// Resolve the request's session, refreshing once when needed
    pub async fn authorize(&self, http: &reqwest::Client, headers: &HeaderMap) -> ApiResult<Session> {
        let now = mmo_common::time::now_millis();
        match SessionCookies::from_headers(self, headers).state(now) {
            SessionState::Authenticated { access_token, .. } => Ok(Session {
                access_token,
                refreshed: None,
            }),
            SessionState::ExpiredRefreshable { refresh_token } => {
                debug!(provider = self.kind.name(), "Access token expired, refreshing");
                match self.refresh(http, &refresh_token).await {
                    Ok(tokens) => {
                        info!(provider = self.kind.name(), "Refreshed access token");
                        Ok(Session {
                            access_token: tokens.access_token.clone(),
                            refreshed: Some(tokens),
                        })
                    }
                    Err(e @ ApiError::Config(_)) => Err(e),
                    Err(e) => {
                        warn!(provider = self.kind.name(), error = %e, "Token refresh failed");
                        Err(ApiError::Unauthorized(format!(
                            "{} session expired and could not be refreshed",
                            self.kind.name()
                        )))
                    }
                }
            }
            SessionState::Unauthenticated => Err(ApiError::Unauthorized(format!(
                "Not authenticated with {}",
                self.kind.name()
            ))),
        }
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, http: &reqwest::Client, code: &str) -> ApiResult<TokenSet> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        self.token_request(http, &params).await
    }

    /// Trade a refresh token for a new access token
    pub async fn refresh(&self, http: &reqwest::Client, refresh_token: &str) -> ApiResult<TokenSet> {
        let params = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];
        self.token_request(http, &params).await
    }

    async fn token_request(&self, http: &reqwest::Client, params: &[(&str, &str)]) -> ApiResult<TokenSet> {
        let (client_id, client_secret) = self.credentials()?;

        let request = http.post(&self.token_url);
        let request = match self.kind {
            // Spotify takes client credentials as HTTP Basic auth
            ProviderKind::Spotify => request
                .basic_auth(client_id, Some(client_secret))
                .form(params),
            ProviderKind::YouTube => {
                let mut form = params.to_vec();
                form.push(("client_id", client_id));
                form.push(("client_secret", client_secret));
                request.form(&form)
            }
        };

        let response = request.send().await.map_err(|e| ApiError::TokenExchange {
            message: format!("{} token request failed", self.kind.name()),
            details: Value::String(e.to_string()),
        })?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::TokenExchange {
                message: format!("{} token exchange failed", self.kind.name()),
                details: serde_json::from_str(&body).unwrap_or(Value::String(body)),
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::TokenExchange {
                message: format!("{} token response was not understood", self.kind.name()),
                details: Value::String(e.to_string()),
            })?;
        Ok(TokenSet::from_response(parsed, mmo_common::time::now_millis()))
    }

    /// `Set-Cookie` values removing every cookie of this provider
    pub fn clear_cookies(&self, secure: bool) -> Vec<String> {
        self.cookies
            .all()
            .iter()
            .map(|name| cookies::clear_cookie(name, secure))
            .collect()
    }

    /// `Set-Cookie` values starting a login
    pub fn login_cookies(&self, state: &str, redirect: Option<&str>, secure: bool) -> Vec<String> {
        let mut out = vec![cookies::set_cookie(&self.cookies.state, state, LOGIN_MAX_AGE_SECS, secure)];
        if let Some(redirect) = redirect {
            out.push(cookies::set_cookie(
                &self.cookies.redirect,
                redirect,
                LOGIN_MAX_AGE_SECS,
                secure,
            ));
        }
        out
    }
}
