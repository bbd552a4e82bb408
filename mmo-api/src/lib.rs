//! mmo-api library - media marker organizer service
//!
//! Serves marker persistence for local and streamed media, and proxies
//! Spotify and YouTube APIs behind cookie-held OAuth sessions.

use axum::Router;
use mmo_common::config::TomlConfig;
use mmo_common::library::MediaLibrary;
use mmo_common::storage::{
    AudioMetadataStore, ContentMarkerStore, FavoritesStore, KeyValueStore, RecentStore, TagStore,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cookies;
pub mod error;
pub mod extract;
pub mod oauth;

use oauth::{OAuthProvider, ProviderKind};

/// Timeout for vendor API and token endpoint calls
const VENDOR_TIMEOUT: Duration = Duration::from_secs(15);

/// Application state shared across HTTP handlers
///
/// Every store is injected here rather than held in globals.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<MediaLibrary>,
    pub audio: Arc<AudioMetadataStore>,
    pub youtube_markers: ContentMarkerStore,
    pub spotify_markers: ContentMarkerStore,
    pub favorites: FavoritesStore,
    pub recent: RecentStore,
    pub tags: TagStore,
    pub spotify: Arc<OAuthProvider>,
    pub youtube: Arc<OAuthProvider>,
    /// Public YouTube Data API key used when no OAuth session is available
    pub youtube_api_key: Option<String>,
    pub http: reqwest::Client,
    /// Mark cookies `Secure`
    pub secure_cookies: bool,
}

impl AppState {
    /// Create application state over a key-value store
    pub fn new(config: &TomlConfig, kv: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let public_base = format!("http://{}:{}", config.bind, config.port);
        let http = reqwest::Client::builder().timeout(VENDOR_TIMEOUT).build()?;

        Ok(Self {
            library: Arc::new(MediaLibrary::new()),
            audio: Arc::new(AudioMetadataStore::new()),
            youtube_markers: ContentMarkerStore::youtube(kv.clone()),
            spotify_markers: ContentMarkerStore::spotify(kv.clone()),
            favorites: FavoritesStore::new(kv.clone()),
            recent: RecentStore::new(kv.clone()),
            tags: TagStore::new(kv),
            spotify: Arc::new(OAuthProvider::from_settings(
                ProviderKind::Spotify,
                &config.spotify,
                &public_base,
            )),
            youtube: Arc::new(OAuthProvider::from_settings(
                ProviderKind::YouTube,
                &config.youtube,
                &public_base,
            )),
            youtube_api_key: config.youtube.api_key.clone().filter(|k| !k.is_empty()),
            http,
            secure_cookies: config.production,
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post, put};

    let auth = Router::new()
        .route("/api/spotify/login", get(api::auth::spotify_login))
        .route("/api/spotify/callback", get(api::auth::spotify_callback))
        .route("/api/spotify/status", get(api::auth::spotify_status))
        .route("/api/spotify/logout", post(api::auth::spotify_logout))
        .route("/api/youtube/login", get(api::auth::youtube_login))
        .route("/api/youtube/callback", get(api::auth::youtube_callback))
        .route("/api/youtube/status", get(api::auth::youtube_status))
        .route("/api/youtube/logout", post(api::auth::youtube_logout));

    let vendors = Router::new()
        .route("/api/spotify/player/pause", put(api::spotify::pause))
        .route("/api/spotify/player/play", put(api::spotify::play))
        .route("/api/spotify/player/seek", put(api::spotify::seek))
        .route("/api/spotify/player/state", get(api::spotify::player_state))
        .route("/api/spotify/player/devices", get(api::spotify::devices))
        .route("/api/spotify/playlists", get(api::spotify::playlists))
        .route("/api/spotify/playlist/tracks", get(api::spotify::playlist_tracks))
        .route("/api/spotify/search", get(api::spotify::search))
        .route("/api/youtube/playlist", get(api::youtube::playlist));

    let markers = Router::new()
        .route(
            "/api/library/roots",
            get(api::library::list_roots).post(api::library::add_root),
        )
        .route("/api/library/roots/:id", delete(api::library::remove_root))
        .route("/api/library/roots/:id/files", get(api::library::list_files))
        .route(
            "/api/library/roots/:id/markers",
            get(api::library::get_markers).put(api::library::put_markers),
        )
        .route(
            "/api/library/roots/:id/audio-metadata",
            get(api::library::get_audio_metadata).put(api::library::put_audio_metadata),
        )
        .route(
            "/api/library/roots/:id/audio-metadata/all",
            get(api::library::get_all_audio_metadata),
        )
        .route(
            "/api/library/roots/:id/youtube-playlists",
            get(api::library::get_playlists).put(api::library::put_playlists),
        )
        .route(
            "/api/youtube/markers/:video_id",
            get(api::content::get_youtube_markers).put(api::content::put_youtube_markers),
        )
        .route(
            "/api/spotify/markers",
            get(api::content::get_spotify_markers).put(api::content::put_spotify_markers),
        )
        .route("/api/favorites/:kind", get(api::lists::list_favorites))
        .route("/api/favorites/:kind/toggle", post(api::lists::toggle_favorite))
        .route(
            "/api/recent",
            get(api::lists::list_recent)
                .post(api::lists::record_recent)
                .delete(api::lists::clear_recent),
        )
        .route("/api/tags", get(api::lists::list_tags).post(api::lists::add_tag))
        .route("/api/tags/:tag", delete(api::lists::remove_tag))
        .route("/api/settings/reset-markers", post(api::settings::reset_markers));

    Router::new()
        .merge(auth)
        .merge(vendors)
        .merge(markers)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
