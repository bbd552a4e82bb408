//! Audio metadata document (`audio-metadata.json`)
//!
//! One JSON object per root folder maps relative audio paths to
//! [`AudioMetadata`]. Every save rewrites the whole document, so one edit
//! costs O(document size). This is kept deliberately: the document is the
//! interchange format shared with the web client, and personal libraries
//! hold tens to low hundreds of tracks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{read_json_file, write_json_file};
use crate::models::AudioMetadata;
use crate::Result;

/// Document file name inside a root folder
pub const AUDIO_METADATA_FILE: &str = "audio-metadata.json";

/// Whole-document map of audio path to metadata
pub type AudioMetadataDocument = BTreeMap<String, AudioMetadata>;

/// Read-modify-write access to `audio-metadata.json`
///
/// Saves issued through one store are serialized so two concurrent edits
/// to different files cannot drop each other's entry.
#[derive(Debug, Default)]
pub struct AudioMetadataStore {
    write_lock: Mutex<()>,
}

impl AudioMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of the document for a root folder
    pub fn document_path(root: &Path) -> PathBuf {
        root.join(AUDIO_METADATA_FILE)
    }

    /// Entire document; empty when the file does not exist
    pub async fn get_all(&self, root: &Path) -> Result<AudioMetadataDocument> {
        Ok(read_json_file(&Self::document_path(root))
            .await?
            .unwrap_or_default())
    }

    /// Metadata of one file, default-initialized when absent
    pub async fn get_audio_metadata(&self, root: &Path, path: &str) -> Result<AudioMetadata> {
        let mut doc = self.get_all(root).await?;
        Ok(doc.remove(path).unwrap_or_default())
    }

    /// Store metadata for one file, rewriting the whole document
    ///
    /// Returns the stored record with `last_modified` stamped.
    pub async fn save_audio_metadata(
        &self,
        root: &Path,
        path: &str,
        metadata: AudioMetadata,
    ) -> Result<AudioMetadata> {
        let _guard = self.write_lock.lock().await;

        let mut doc = self.get_all(root).await?;
        let mut metadata = metadata;
        metadata.last_modified = Some(crate::time::now_millis());
        doc.insert(path.to_string(), metadata.clone());

        write_json_file(&Self::document_path(root), &doc).await?;
        debug!(path, entries = doc.len(), "Saved audio metadata document");
        Ok(metadata)
    }

    /// Drop one file's entry; false when it was not present
    pub async fn remove_audio_metadata(&self, root: &Path, path: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut doc = self.get_all(root).await?;
        if doc.remove(path).is_none() {
            return Ok(false);
        }
        write_json_file(&Self::document_path(root), &doc).await?;
        Ok(true)
    }

    /// Clear markers and annotations of every entry, keeping other settings
    pub async fn reset_markers(&self, root: &Path) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let file = Self::document_path(root);
        let Some(mut doc) = read_json_file::<AudioMetadataDocument>(&file).await? else {
            return Ok(0);
        };
        for metadata in doc.values_mut() {
            metadata.clear_markers();
        }
        write_json_file(&file, &doc).await?;
        info!(root = %root.display(), entries = doc.len(), "Reset audio markers");
        Ok(doc.len())
    }
}
