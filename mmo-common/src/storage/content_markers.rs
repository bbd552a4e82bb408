//! Marker states of streamed content (YouTube videos, Spotify tracks)
//!
//! Keys are the content id prefixed per provider. YouTube markers were once
//! written under two other spellings; those are read once, migrated to the
//! canonical key and removed.

use std::sync::Arc;
use tracing::{info, warn};

use super::kv::{write_json, KeyValueStore};
use crate::models::MarkerState;
use crate::Result;

/// Canonical YouTube marker key prefix
pub const YOUTUBE_PREFIX: &str = "youtube_markers_";

/// Older YouTube key spellings, read-only
pub const YOUTUBE_LEGACY_PREFIXES: &[&str] = &["markers_youtube_", "markers-youtube-"];

/// Spotify marker key prefix
pub const SPOTIFY_PREFIX: &str = "spotify-markers:";

/// Marker state per content id in a key-value store
#[derive(Clone)]
pub struct ContentMarkerStore {
    kv: Arc<dyn KeyValueStore>,
    prefix: &'static str,
    legacy_prefixes: &'static [&'static str],
}

impl ContentMarkerStore {
    /// Markers keyed by YouTube video id
    pub fn youtube(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            prefix: YOUTUBE_PREFIX,
            legacy_prefixes: YOUTUBE_LEGACY_PREFIXES,
        }
    }

    /// Markers keyed by Spotify track URI
    pub fn spotify(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            prefix: SPOTIFY_PREFIX,
            legacy_prefixes: &[],
        }
    }

    pub fn key_for(&self, content_id: &str) -> String {
        format!("{}{}", self.prefix, content_id)
    }

    /// Stored state, or an empty one when absent or unreadable
    pub fn load(&self, content_id: &str) -> Result<MarkerState> {
        let key = self.key_for(content_id);
        if let Some(raw) = self.kv.get_item(&key)? {
            return Ok(parse_or_empty(&key, &raw));
        }

        for legacy in self.legacy_prefixes {
            let legacy_key = format!("{}{}", legacy, content_id);
            let Some(raw) = self.kv.get_item(&legacy_key)? else {
                continue;
            };
            match serde_json::from_str::<MarkerState>(&raw) {
                Ok(state) => {
                    self.migrate(content_id, &state)?;
                    return Ok(state);
                }
                Err(e) => warn!(key = %legacy_key, error = %e, "Skipping malformed legacy markers"),
            }
        }

        Ok(MarkerState::default())
    }

    /// Write the state under the canonical key
    pub fn save(&self, content_id: &str, state: &MarkerState) -> Result<()> {
        write_json(self.kv.as_ref(), &self.key_for(content_id), state)
    }

    /// Content ids with stored markers under any key spelling
    pub fn content_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .kv
            .keys()?
            .into_iter()
            .filter_map(|key| {
                std::iter::once(self.prefix)
                    .chain(self.legacy_prefixes.iter().copied())
                    .find_map(|prefix| key.strip_prefix(prefix).map(str::to_string))
            })
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// Overwrite every stored state with an empty one
    pub fn reset_all(&self) -> Result<usize> {
        let ids = self.content_ids()?;
        for id in &ids {
            self.save(id, &MarkerState::default())?;
            self.remove_legacy(id)?;
        }
        Ok(ids.len())
    }

    fn migrate(&self, content_id: &str, state: &MarkerState) -> Result<()> {
        self.save(content_id, state)?;
        self.remove_legacy(content_id)?;
        info!(content_id, prefix = self.prefix, "Migrated legacy marker key");
        Ok(())
    }

    fn remove_legacy(&self, content_id: &str) -> Result<()> {
        for legacy in self.legacy_prefixes {
            self.kv.remove_item(&format!("{}{}", legacy, content_id))?;
        }
        Ok(())
    }
}

fn parse_or_empty(key: &str, raw: &str) -> MarkerState {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "Malformed stored markers, using empty state");
        MarkerState::default()
    })
}
