//! OAuth provider configuration (Spotify, YouTube via Google)

use mmo_common::config::ProviderSettings;
use reqwest::Url;

use crate::error::{ApiError, ApiResult};

/// Which vendor a provider talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Spotify,
    YouTube,
}

impl ProviderKind {
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Spotify => "spotify",
            ProviderKind::YouTube => "youtube",
        }
    }

    /// Prefix of every cookie this provider sets
    pub fn cookie_prefix(self) -> &'static str {
        match self {
            ProviderKind::Spotify => "SP_",
            ProviderKind::YouTube => "YT_",
        }
    }

    fn default_auth_url(self) -> &'static str {
        match self {
            ProviderKind::Spotify => "https://accounts.spotify.com/authorize",
            ProviderKind::YouTube => "https://accounts.google.com/o/oauth2/v2/auth",
        }
    }

    fn default_token_url(self) -> &'static str {
        match self {
            ProviderKind::Spotify => "https://accounts.spotify.com/api/token",
            ProviderKind::YouTube => "https://oauth2.googleapis.com/token",
        }
    }

    fn default_api_base(self) -> &'static str {
        match self {
            ProviderKind::Spotify => "https://api.spotify.com/v1",
            ProviderKind::YouTube => "https://www.googleapis.com/youtube/v3",
        }
    }

    fn default_scopes(self) -> &'static [&'static str] {
        match self {
            ProviderKind::Spotify => &[
                "streaming",
                "user-read-email",
                "user-read-private",
                "user-read-playback-state",
                "user-modify-playback-state",
                "user-read-currently-playing",
                "playlist-read-private",
                "playlist-read-collaborative",
            ],
            ProviderKind::YouTube => &["https://www.googleapis.com/auth/youtube.readonly"],
        }
    }
}

/// Names of the cookies one provider uses
#[derive(Debug, Clone)]
pub struct CookieNames {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
    pub state: String,
    pub redirect: String,
}

impl CookieNames {
    fn for_prefix(prefix: &str) -> Self {
        Self {
            access_token: format!("{}ACCESS_TOKEN", prefix),
            refresh_token: format!("{}REFRESH_TOKEN", prefix),
            expires_at: format!("{}EXPIRES_AT", prefix),
            state: format!("{}STATE", prefix),
            redirect: format!("{}REDIRECT", prefix),
        }
    }

    pub fn all(&self) -> [&str; 5] {
        [
            self.access_token.as_str(),
            self.refresh_token.as_str(),
            self.expires_at.as_str(),
            self.state.as_str(),
            self.redirect.as_str(),
        ]
    }
}

/// Resolved OAuth client of one provider
#[derive(Debug, Clone)]
pub struct OAuthProvider {
    pub kind: ProviderKind,
    client_id: Option<String>,
    client_secret: Option<String>,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_base: String,
    pub scopes: Vec<String>,
    pub cookies: CookieNames,
}

impl OAuthProvider {
    /// Build from settings; `public_base` forms the default redirect URI
    pub fn from_settings(kind: ProviderKind, settings: &ProviderSettings, public_base: &str) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Self {
            kind,
            client_id: non_empty(&settings.client_id),
            client_secret: non_empty(&settings.client_secret),
            redirect_uri: settings.redirect_uri.clone().unwrap_or_else(|| {
                format!("{}/api/{}/callback", public_base.trim_end_matches('/'), kind.name())
            }),
            auth_url: settings
                .auth_url
                .clone()
                .unwrap_or_else(|| kind.default_auth_url().to_string()),
            token_url: settings
                .token_url
                .clone()
                .unwrap_or_else(|| kind.default_token_url().to_string()),
            api_base: settings
                .api_base
                .clone()
                .unwrap_or_else(|| kind.default_api_base().to_string())
                .trim_end_matches('/')
                .to_string(),
            scopes: settings.scopes.clone().unwrap_or_else(|| {
                kind.default_scopes().iter().map(|s| s.to_string()).collect()
            }),
            cookies: CookieNames::for_prefix(kind.cookie_prefix()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Client id and secret, or a configuration error
    pub fn credentials(&self) -> ApiResult<(&str, &str)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(ApiError::Config(format!(
                "{} OAuth is not configured (missing client id or secret)",
                self.kind.name()
            ))),
        }
    }

    /// Provider consent page URL carrying `state`
    pub fn authorize_url(&self, state: &str) -> ApiResult<String> {
        let (client_id, _) = self.credentials()?;
        let scope = self.scopes.join(" ");
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
        ];
        if self.kind == ProviderKind::YouTube {
            // Google only issues refresh tokens for offline access with explicit consent
            params.push(("access_type", "offline"));
            params.push(("prompt", "consent"));
        }
        let url = Url::parse_with_params(&self.auth_url, &params)
            .map_err(|e| ApiError::Config(format!("invalid authorize URL: {}", e)))?;
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> ProviderSettings {
        ProviderSettings {
            client_id: Some("client".into()),
            client_secret: Some("secret".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_and_cookie_names() {
        let provider =
            OAuthProvider::from_settings(ProviderKind::Spotify, &configured(), "http://127.0.0.1:5730/");
        assert_eq!(provider.redirect_uri, "http://127.0.0.1:5730/api/spotify/callback");
        assert_eq!(provider.api_base, "https://api.spotify.com/v1");
        assert_eq!(provider.cookies.access_token, "SP_ACCESS_TOKEN");
        assert_eq!(provider.cookies.state, "SP_STATE");
        assert!(provider.is_configured());
    }

    #[test]
    fn test_unconfigured_provider_is_config_error() {
        let provider = OAuthProvider::from_settings(
            ProviderKind::YouTube,
            &ProviderSettings::default(),
            "http://localhost",
        );
        assert!(!provider.is_configured());
        assert!(matches!(provider.credentials(), Err(ApiError::Config(_))));
        assert!(provider.authorize_url("s").is_err());
        assert_eq!(provider.cookies.refresh_token, "YT_REFRESH_TOKEN");
    }

    #[test]
    fn test_authorize_url_params() {
        let provider =
            OAuthProvider::from_settings(ProviderKind::YouTube, &configured(), "http://localhost");
        let url = Url::parse(&provider.authorize_url("xyz").unwrap()).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["state"], "xyz");
        assert_eq!(params["client_id"], "client");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["response_type"], "code");
        assert!(params["scope"].contains("youtube.readonly"));
    }
}
