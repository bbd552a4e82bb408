//! Persistence adapters
//!
//! Each adapter is the only writer of its storage location:
//! - [`sidecar`]: `.markers/<sanitized>.markers.json` per video file
//! - [`audio_metadata`]: one `audio-metadata.json` per root folder
//! - [`kv`]: key-value store backing content markers and user lists
//! - [`content_markers`]: YouTube and Spotify marker states in the key-value store
//! - [`lists`]: favorites, recently viewed, saved tags
//! - [`playlists`]: `youtube-playlists.json` per root folder
//! - [`reset`]: bulk "reset markers" across every backend

pub mod audio_metadata;
pub mod content_markers;
pub mod kv;
pub mod lists;
pub mod playlists;
pub mod reset;
pub mod sidecar;

pub use audio_metadata::AudioMetadataStore;
pub use content_markers::ContentMarkerStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use lists::{FavoritesStore, RecentStore, TagStore};
pub use reset::{reset_all_markers, ResetSummary};

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::Result;

/// Read and parse a JSON file; a missing file is `None`
pub(crate) async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace a JSON file's content through a temp file and rename
///
/// Each call writes its own temp file, so overlapping writers to one target
/// all succeed and the last rename wins.
pub(crate) async fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, &bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

/// Sibling temp file unique to one write
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}
