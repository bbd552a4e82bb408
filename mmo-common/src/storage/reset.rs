//! Bulk "reset markers" across every backend

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::{sidecar, AudioMetadataStore, ContentMarkerStore};
use crate::{Error, Result};

/// Number of marker states reset per backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub video_sidecars: usize,
    pub audio_entries: usize,
    pub youtube_videos: usize,
    pub spotify_tracks: usize,
}

/// Overwrite every known marker state with an empty one
///
/// Both file backends are reset for every root regardless of its media kind.
pub async fn reset_all_markers(
    roots: &[PathBuf],
    audio: &AudioMetadataStore,
    youtube: &ContentMarkerStore,
    spotify: &ContentMarkerStore,
) -> Result<ResetSummary> {
    let mut summary = ResetSummary::default();

    for root in roots {
        summary.video_sidecars += sidecar::reset_markers(root).await?;
        summary.audio_entries += audio.reset_markers(root).await?;
    }

    // Key-value stores write their backing file synchronously
    let (youtube, spotify) = (youtube.clone(), spotify.clone());
    let (youtube_videos, spotify_tracks) = tokio::task::spawn_blocking(move || -> Result<(usize, usize)> {
        Ok((youtube.reset_all()?, spotify.reset_all()?))
    })
    .await
    .map_err(|e| Error::Internal(format!("Reset task failed: {}", e)))??;
    summary.youtube_videos = youtube_videos;
    summary.spotify_tracks = spotify_tracks;

    info!(?summary, "Reset all markers");
    Ok(summary)
}
