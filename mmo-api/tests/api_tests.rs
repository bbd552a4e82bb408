//! Integration tests for mmo-api library, marker and list endpoints
//!
//! Requests go through the full router with `oneshot`; state lives in a
//! temporary root folder and an in-memory key-value store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use mmo_api::{build_router, AppState};
use mmo_common::config::TomlConfig;
use mmo_common::storage::{FileStore, MemoryStore};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app with default (unconfigured) providers
fn setup_app() -> Router {
    let state = AppState::new(&TomlConfig::default(), Arc::new(MemoryStore::new()))
        .expect("Should build app state");
    build_router(state)
}

/// Test helper: create a file with some content
fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"media").unwrap();
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: send a request, returning status and JSON body (null when empty)
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

/// Test helper: register `dir` as a root, returning its id
async fn add_root(app: &Router, dir: &Path, kind: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/library/roots",
            json!({ "path": dir.to_string_lossy(), "kind": kind }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn sample_markers() -> Value {
    json!({
        "markers": [
            { "id": "m1", "startTime": 1.5, "endTime": 8.0, "completionDegree": 40 },
            { "id": "m2", "startTime": 10.0, "endTime": 12.0, "isLooping": true }
        ],
        "annotations": [
            { "id": "a1", "markerId": "m1", "text": "chorus", "tags": ["hard"], "timestamp": 1 }
        ],
        "activeMarkerId": "m1",
        "isLooping": true
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();
    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "mmo-api");
    assert_eq!(body["providers"]["spotify"], false);
    assert_eq!(body["providers"]["youtube"], false);
    assert_eq!(body["providers"]["youtubeApiKey"], false);
    assert_eq!(body["libraryRoots"], 0);
}

#[tokio::test]
async fn test_health_reports_configured_providers() {
    let dir = TempDir::new().unwrap();
    let mut config = TomlConfig::default();
    config.youtube.api_key = Some("key".to_string());
    config.spotify.client_id = Some("id".to_string());
    config.spotify.client_secret = Some("secret".to_string());
    let state = AppState::new(&config, Arc::new(MemoryStore::new())).unwrap();
    let app = build_router(state);
    add_root(&app, dir.path(), "video").await;

    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["providers"]["spotify"], true);
    assert_eq!(body["providers"]["youtube"], false);
    assert_eq!(body["providers"]["youtubeApiKey"], true);
    assert_eq!(body["libraryRoots"], 1);
}

// =============================================================================
// Library roots and scanning
// =============================================================================

#[tokio::test]
async fn test_root_scan_lists_matching_files() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "b.mp4");
    touch(dir.path(), "sub/a.MKV");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "song.mp3");
    touch(dir.path(), ".markers/x.mp4");

    let app = setup_app();
    let id = add_root(&app, dir.path(), "video").await;

    let (status, body) = send(&app, empty_request("GET", &format!("/api/library/roots/{}/files", id))).await;
    assert_eq!(status, StatusCode::OK);
    let paths: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["b.mp4", "sub/a.MKV"]);

    let (_, roots) = send(&app, empty_request("GET", "/api/library/roots")).await;
    assert_eq!(roots.as_array().unwrap().len(), 1);
    assert_eq!(roots[0]["kind"], "video");
}

#[tokio::test]
async fn test_add_missing_root_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = setup_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/library/roots",
            json!({ "path": dir.path().join("nope").to_string_lossy(), "kind": "audio" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_remove_root() {
    let dir = TempDir::new().unwrap();
    let app = setup_app();
    let id = add_root(&app, dir.path(), "video").await;

    let uri = format!("/api/library/roots/{}", id);
    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, empty_request("GET", &format!("{}/files", uri))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Video sidecar markers
// =============================================================================

#[tokio::test]
async fn test_video_markers_round_trip() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "clips/intro.mp4");
    let app = setup_app();
    let id = add_root(&app, dir.path(), "video").await;
    let uri = format!("/api/library/roots/{}/markers?path=clips/intro.mp4", id);

    // Never saved
    let (status, body) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, json_request("PUT", &uri, sample_markers())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markers"].as_array().unwrap().len(), 2);
    assert_eq!(body["markers"][0]["completionDegree"], 40);
    assert_eq!(body["markers"][1]["isLooping"], true);
    assert_eq!(body["annotations"][0]["markerId"], "m1");
    assert_eq!(body["activeMarkerId"], "m1");
    assert_eq!(body["isLooping"], true);

    assert!(dir.path().join(".markers").is_dir());
}

#[tokio::test]
async fn test_marker_writes_are_validated() {
    let dir = TempDir::new().unwrap();
    let app = setup_app();
    let id = add_root(&app, dir.path(), "video").await;
    let base = format!("/api/library/roots/{}/markers", id);

    let too_complete = json!({
        "markers": [{ "id": "m1", "startTime": 0.0, "endTime": 1.0, "completionDegree": 150 }]
    });
    let (status, _) = send(&app, json_request("PUT", &format!("{}?path=a.mp4", base), too_complete)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let inverted = json!({ "markers": [{ "id": "m1", "startTime": 5.0, "endTime": 1.0 }] });
    let (status, _) = send(&app, json_request("PUT", &format!("{}?path=a.mp4", base), inverted)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, empty_request("GET", &base)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("path"));

    let (status, _) = send(&app, empty_request("GET", &format!("{}?path=../escape.mp4", base))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, empty_request("GET", "/api/library/roots/unknown/markers?path=a.mp4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Audio metadata
// =============================================================================

#[tokio::test]
async fn test_audio_metadata_defaults_and_save() {
    let dir = TempDir::new().unwrap();
    let app = setup_app();
    let id = add_root(&app, dir.path(), "audio").await;
    let uri = format!("/api/library/roots/{}/audio-metadata?path=take1.mp3", id);

    let (status, body) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playbackRate"], 1.0);
    assert_eq!(body["volume"], 1.0);
    assert_eq!(body["markers"], json!([]));

    let mut metadata = sample_markers();
    metadata["tags"] = json!(["practice"]);
    metadata["playbackRate"] = json!(0.75);
    metadata["loopRegion"] = json!({ "start": 1.0, "end": 2.0, "enabled": true });
    let (status, saved) = send(&app, json_request("PUT", &uri, metadata)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(saved["lastModified"].as_i64().unwrap() > 0);

    let other = format!("/api/library/roots/{}/audio-metadata?path=take2.mp3", id);
    let (status, _) = send(&app, json_request("PUT", &other, json!({ "volume": 0.5 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, all) = send(
        &app,
        empty_request("GET", &format!("/api/library/roots/{}/audio-metadata/all", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["take1.mp3"]["playbackRate"], 0.75);
    assert_eq!(all["take1.mp3"]["markers"].as_array().unwrap().len(), 2);
    assert_eq!(all["take1.mp3"]["loopRegion"]["enabled"], true);
    assert_eq!(all["take2.mp3"]["volume"], 0.5);
}

// =============================================================================
// YouTube playlists per root
// =============================================================================

#[tokio::test]
async fn test_saved_playlists_dedupe() {
    let dir = TempDir::new().unwrap();
    let app = setup_app();
    let id = add_root(&app, dir.path(), "video").await;
    let uri = format!("/api/library/roots/{}/youtube-playlists", id);

    let (_, body) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(body, json!([]));

    let list = json!([
        { "id": "PL1", "title": "Warmups" },
        { "id": "PL2", "title": "Songs" },
        { "id": "PL1", "title": "Duplicate" }
    ]);
    let (status, body) = send(&app, json_request("PUT", &uri, list)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["title"], "Warmups");
}

// =============================================================================
// Content markers
// =============================================================================

#[tokio::test]
async fn test_youtube_and_spotify_markers() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/api/youtube/markers/dQw4w9WgXcQ")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markers"], json!([]));

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/youtube/markers/dQw4w9WgXcQ", sample_markers()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, empty_request("GET", "/api/youtube/markers/dQw4w9WgXcQ")).await;
    assert_eq!(body["markers"].as_array().unwrap().len(), 2);

    let track = "/api/spotify/markers?uri=spotify:track:4uLU6hMCjMI75M1A2tKUQC";
    let (status, _) = send(&app, json_request("PUT", track, sample_markers())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, empty_request("GET", track)).await;
    assert_eq!(body["activeMarkerId"], "m1");

    let (status, _) = send(&app, empty_request("GET", "/api/spotify/markers")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Favorites, recent, tags
// =============================================================================

#[tokio::test]
async fn test_favorite_toggle() {
    let app = setup_app();
    let item = json!({ "id": "clips/intro.mp4", "title": "Intro" });

    let (status, body) = send(&app, json_request("POST", "/api/favorites/video/toggle", item.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["favorite"], true);

    let (_, list) = send(&app, empty_request("GET", "/api/favorites/video")).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], "clips/intro.mp4");

    // Audio favorites are a separate list
    let (_, list) = send(&app, empty_request("GET", "/api/favorites/audio")).await;
    assert_eq!(list, json!([]));

    let (_, body) = send(&app, json_request("POST", "/api/favorites/video/toggle", item)).await;
    assert_eq!(body["favorite"], false);
    let (_, list) = send(&app, empty_request("GET", "/api/favorites/video")).await;
    assert_eq!(list, json!([]));

    let (status, _) = send(&app, empty_request("GET", "/api/favorites/podcasts")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recent_moves_to_front() {
    let app = setup_app();
    for id in ["a.mp4", "b.mp4", "a.mp4"] {
        let (status, _) = send(&app, json_request("POST", "/api/recent", json!({ "id": id }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, list) = send(&app, empty_request("GET", "/api/recent")).await;
    let ids: Vec<&str> = list.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a.mp4", "b.mp4"]);

    let (status, _) = send(&app, empty_request("DELETE", "/api/recent")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, empty_request("GET", "/api/recent")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_tags() {
    let app = setup_app();
    send(&app, json_request("POST", "/api/tags", json!({ "tag": " groove " }))).await;
    send(&app, json_request("POST", "/api/tags", json!({ "tag": "groove" }))).await;
    let (_, tags) = send(&app, json_request("POST", "/api/tags", json!({ "tag": "fills" }))).await;
    assert_eq!(tags, json!(["groove", "fills"]));

    let (status, tags) = send(&app, empty_request("DELETE", "/api/tags/groove")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags, json!(["fills"]));
}

#[tokio::test]
async fn test_file_backed_lists_persist_across_restart() {
    let dir = TempDir::new().unwrap();
    let file_app = || {
        let store = FileStore::in_root(dir.path()).expect("Should open store");
        build_router(AppState::new(&TomlConfig::default(), Arc::new(store)).unwrap())
    };

    let app = file_app();
    let (status, _) = send(&app, json_request("POST", "/api/tags", json!({ "tag": "groove" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/favorites/video/toggle", json!({ "id": "a.mp4" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        json_request("PUT", "/api/youtube/markers/dQw4w9WgXcQ", sample_markers()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    drop(app);

    let app = file_app();
    let (_, tags) = send(&app, empty_request("GET", "/api/tags")).await;
    assert_eq!(tags, json!(["groove"]));
    let (_, favorites) = send(&app, empty_request("GET", "/api/favorites/video")).await;
    assert_eq!(favorites[0]["id"], "a.mp4");
    let (_, markers) = send(&app, empty_request("GET", "/api/youtube/markers/dQw4w9WgXcQ")).await;
    assert_eq!(markers["markers"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Reset markers
// =============================================================================

#[tokio::test]
async fn test_reset_markers_empties_every_backend() {
    let dir = TempDir::new().unwrap();
    let app = setup_app();
    let id = add_root(&app, dir.path(), "video").await;

    let video = format!("/api/library/roots/{}/markers?path=intro.mp4", id);
    let audio = format!("/api/library/roots/{}/audio-metadata?path=take.mp3", id);
    let youtube = "/api/youtube/markers/abc123";
    let spotify = "/api/spotify/markers?uri=spotify:track:xyz";

    let mut metadata = sample_markers();
    metadata["playbackRate"] = json!(0.5);
    send(&app, json_request("PUT", &video, sample_markers())).await;
    send(&app, json_request("PUT", &audio, metadata)).await;
    send(&app, json_request("PUT", youtube, sample_markers())).await;
    send(&app, json_request("PUT", spotify, sample_markers())).await;

    let (status, summary) = send(&app, empty_request("POST", "/api/settings/reset-markers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["video_sidecars"], 1);
    assert_eq!(summary["audio_entries"], 1);
    assert_eq!(summary["youtube_videos"], 1);
    assert_eq!(summary["spotify_tracks"], 1);

    let (_, body) = send(&app, empty_request("GET", &video)).await;
    assert_eq!(body["markers"], json!([]));
    let (_, body) = send(&app, empty_request("GET", &audio)).await;
    assert_eq!(body["markers"], json!([]));
    assert_eq!(body["playbackRate"], 0.5);
    let (_, body) = send(&app, empty_request("GET", youtube)).await;
    assert_eq!(body["markers"], json!([]));
    let (_, body) = send(&app, empty_request("GET", spotify)).await;
    assert_eq!(body["markers"], json!([]));
}

// =============================================================================
// Vendor routes without configuration or session
// =============================================================================

#[tokio::test]
async fn test_vendor_routes_without_session() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/api/spotify/player/devices")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, empty_request("GET", "/api/spotify/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, empty_request("PUT", "/api/spotify/player/seek")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, empty_request("GET", "/api/spotify/playlist/tracks")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither OAuth nor an API key configured
    let (status, _) = send(&app, empty_request("GET", "/api/youtube/playlist?playlistId=PL1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, empty_request("GET", "/api/spotify/login")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(&app, empty_request("GET", "/api/spotify/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], false);
    assert_eq!(body["authenticated"], false);
}

// =============================================================================
// Malformed bodies and query strings
// =============================================================================

/// Test helper: assert a 400 carrying the `{ error, details }` shape
fn assert_malformed(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string(), "error missing in {}", body);
    assert!(body["details"].is_string(), "details missing in {}", body);
}

#[tokio::test]
async fn test_out_of_range_body_field_is_bad_request() {
    let app = setup_app();
    let markers = json!({
        "markers": [{ "id": "m1", "startTime": 0.0, "endTime": 1.0, "completionDegree": 300 }]
    });

    let (status, body) = send(&app, json_request("PUT", "/api/youtube/markers/abc", markers)).await;
    assert_malformed(status, &body);

    // Nothing was stored
    let (_, body) = send(&app, empty_request("GET", "/api/youtube/markers/abc")).await;
    assert_eq!(body["markers"], json!([]));
}

#[tokio::test]
async fn test_unparseable_json_body_is_bad_request() {
    let app = setup_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/tags")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"tag\": "))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_malformed(status, &body);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_bad_request() {
    let app = setup_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/tags")
        .body(Body::from(json!({ "tag": "warmup" }).to_string()))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_malformed(status, &body);
}

#[tokio::test]
async fn test_invalid_query_values_are_bad_request() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/api/spotify/search?q=a&limit=abc")).await;
    assert_malformed(status, &body);

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/youtube/playlist?playlistId=PL&includeItems=1"),
    )
    .await;
    assert_malformed(status, &body);

    let (status, body) = send(&app, empty_request("PUT", "/api/spotify/player/seek?position_ms=soon")).await;
    assert_malformed(status, &body);
}
