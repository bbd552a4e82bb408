//! Video marker sidecar files
//!
//! Marker state for `<root>/<video_path>` lives in
//! `<root>/.markers/<sanitized video_path>.markers.json`.
//!
//! Sanitizing is lossy: every character outside `[A-Za-z0-9]` becomes `_`,
//! so `a/b:c`, `a/b c` and `a_b_c` share one file. Each document records the
//! path it was written for, and loading it under a different path is reported
//! as [`Error::PathCollision`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{read_json_file, write_json_file};
use crate::models::MarkerState;
use crate::{Error, Result};

/// Sidecar directory name inside a root folder
pub const MARKERS_DIR: &str = ".markers";

/// Suffix of every sidecar file
pub const SIDECAR_SUFFIX: &str = ".markers.json";

/// On-disk sidecar document
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SidecarDocument {
    /// Video path this sidecar was written for (absent in older files)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_path: Option<String>,
    #[serde(flatten)]
    state: MarkerState,
}

/// Sidecar file name for a video path relative to the root
pub fn sanitize_path(video_path: &str) -> String {
    let mut name: String = video_path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    name.push_str(SIDECAR_SUFFIX);
    name
}

/// Full path of the sidecar for `video_path`
pub fn sidecar_path(root: &Path, video_path: &str) -> PathBuf {
    root.join(MARKERS_DIR).join(sanitize_path(video_path))
}

/// Load marker state for a video; `None` when it was never saved
pub async fn load_markers(root: &Path, video_path: &str) -> Result<Option<MarkerState>> {
    let file = sidecar_path(root, video_path);
    let Some(doc) = read_json_file::<SidecarDocument>(&file).await? else {
        debug!(video_path, "No sidecar found");
        return Ok(None);
    };

    if let Some(stored_path) = doc.video_path {
        if stored_path != video_path {
            warn!(
                file = %file.display(),
                stored = %stored_path,
                requested = %video_path,
                "Sidecar name collision"
            );
            return Err(Error::PathCollision {
                file,
                stored_path,
                requested_path: video_path.to_string(),
            });
        }
    }

    Ok(Some(doc.state))
}

/// Overwrite the sidecar of `video_path` with `state`
///
/// Creates `.markers` when missing. A sidecar previously written for a
/// different path that sanitizes to the same name is replaced (last write wins).
pub async fn save_markers(root: &Path, video_path: &str, state: &MarkerState) -> Result<()> {
    let dir = root.join(MARKERS_DIR);
    tokio::fs::create_dir_all(&dir).await?;

    let file = dir.join(sanitize_path(video_path));
    if let Ok(Some(existing)) = read_json_file::<SidecarDocument>(&file).await {
        if let Some(stored) = existing.video_path.filter(|p| p != video_path) {
            warn!(
                file = %file.display(),
                previous = %stored,
                current = %video_path,
                "Overwriting sidecar written for a different video"
            );
        }
    }

    let doc = SidecarDocument {
        video_path: Some(video_path.to_string()),
        state: state.clone(),
    };
    write_json_file(&file, &doc).await?;
    debug!(video_path, markers = state.markers.len(), "Saved sidecar");
    Ok(())
}

/// Names of all sidecar files under a root
pub async fn list_sidecars(root: &Path) -> Result<Vec<String>> {
    let dir = root.join(MARKERS_DIR);
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(SIDECAR_SUFFIX) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Overwrite every sidecar under `root` with an empty state
pub async fn reset_markers(root: &Path) -> Result<usize> {
    let dir = root.join(MARKERS_DIR);
    let names = list_sidecars(root).await?;

    for name in &names {
        let file = dir.join(name);
        let video_path = match read_json_file::<SidecarDocument>(&file).await {
            Ok(doc) => doc.and_then(|d| d.video_path),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Unreadable sidecar, resetting anyway");
                None
            }
        };
        let doc = SidecarDocument {
            video_path,
            state: MarkerState::default(),
        };
        write_json_file(&file, &doc).await?;
    }

    Ok(names.len())
}
