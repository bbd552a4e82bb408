//! Media library roots and directory scanning
//!
//! Roots are registered at runtime and held in memory only; they are not
//! persisted across restarts. Scans walk the whole tree depth-first on demand.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::{DirEntry, WalkDir};

use crate::{Error, Result};

/// Extensions listed for video roots
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "avi", "m4v", "ogv"];

/// Extensions listed for audio roots
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a", "aac", "opus", "wma"];

/// Media kind a root folder is scanned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => VIDEO_EXTENSIONS,
            MediaKind::Audio => AUDIO_EXTENSIONS,
        }
    }

    /// Whether `path` has one of this kind's extensions (case-insensitive)
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

/// A registered root folder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootEntry {
    pub id: String,
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// A media file discovered under a root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaFile {
    /// Path relative to the root, `/`-separated
    pub path: String,
    pub name: String,
    pub size: u64,
}

/// Registered roots
#[derive(Debug, Default)]
pub struct MediaLibrary {
    roots: RwLock<Vec<RootEntry>>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory; registering the same directory again returns the existing entry
    pub async fn add_root(&self, path: &Path, kind: MediaKind) -> Result<RootEntry> {
        let canonical = tokio::fs::canonicalize(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("directory {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        if !tokio::fs::metadata(&canonical).await?.is_dir() {
            return Err(Error::InvalidInput(format!(
                "not a directory: {}",
                canonical.display()
            )));
        }

        let mut roots = self.roots.write().await;
        if let Some(existing) = roots.iter().find(|r| r.path == canonical && r.kind == kind) {
            return Ok(existing.clone());
        }

        let entry = RootEntry {
            id: Uuid::new_v4().to_string(),
            path: canonical,
            kind,
        };
        info!(id = %entry.id, path = %entry.path.display(), ?kind, "Registered root folder");
        roots.push(entry.clone());
        Ok(entry)
    }

    pub async fn remove_root(&self, id: &str) -> Option<RootEntry> {
        let mut roots = self.roots.write().await;
        let index = roots.iter().position(|r| r.id == id)?;
        Some(roots.remove(index))
    }

    pub async fn roots(&self) -> Vec<RootEntry> {
        self.roots.read().await.clone()
    }

    pub async fn root(&self, id: &str) -> Result<RootEntry> {
        self.roots
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("root {}", id)))
    }

    /// List media files of the root's kind, sorted by relative path
    pub async fn scan(&self, id: &str) -> Result<Vec<MediaFile>> {
        let root = self.root(id).await?;
        tokio::task::spawn_blocking(move || scan_directory(&root.path, root.kind))
            .await
            .map_err(|e| Error::Internal(format!("scan task failed: {}", e)))?
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Depth-first walk of `root`, skipping dot-entries
pub fn scan_directory(root: &Path, kind: MediaKind) -> Result<Vec<MediaFile>> {
    if !root.is_dir() {
        return Err(Error::NotFound(format!("directory {}", root.display())));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !kind.matches(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push(MediaFile {
            path,
            name: entry.file_name().to_string_lossy().into_owned(),
            size: entry.metadata().map(|m| m.len()).unwrap_or(0),
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), count = files.len(), "Scan complete");
    Ok(files)
}

/// Join a client-supplied relative path onto a root, refusing escapes
pub fn resolve_relative(root: &Path, relative: &str) -> Result<PathBuf> {
    let rel = Path::new(relative);
    if relative.is_empty() {
        return Err(Error::InvalidInput("empty media path".to_string()));
    }
    for component in rel.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(Error::InvalidInput(format!(
                    "media path must stay inside the root: {}",
                    relative
                )))
            }
        }
    }
    Ok(root.join(rel))
}
