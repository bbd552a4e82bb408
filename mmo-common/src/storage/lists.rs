//! Favorites, recently viewed and saved tag lists

use std::sync::Arc;

use super::kv::{read_json, write_json, KeyValueStore};
use crate::models::{FavoriteItem, FavoriteKind, RecentItem};
use crate::Result;

/// Key of the recently viewed list
pub const RECENT_KEY: &str = "recent-videos";

/// Key of the saved tag list
pub const TAGS_KEY: &str = "savedTags";

/// Maximum number of recently viewed entries kept
pub const RECENT_LIMIT: usize = 20;

/// Video and audio favorites
#[derive(Clone)]
pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn list(&self, kind: FavoriteKind) -> Result<Vec<FavoriteItem>> {
        Ok(read_json(self.kv.as_ref(), kind.storage_key())?.unwrap_or_default())
    }

    pub fn is_favorite(&self, kind: FavoriteKind, id: &str) -> Result<bool> {
        Ok(self.list(kind)?.iter().any(|item| item.id == id))
    }

    /// Append unless already present; returns whether it was added
    pub fn add(&self, kind: FavoriteKind, item: FavoriteItem) -> Result<bool> {
        let mut items = self.list(kind)?;
        if items.iter().any(|existing| existing.id == item.id) {
            return Ok(false);
        }
        items.push(item);
        write_json(self.kv.as_ref(), kind.storage_key(), &items)?;
        Ok(true)
    }

    /// Returns whether an entry was removed
    pub fn remove(&self, kind: FavoriteKind, id: &str) -> Result<bool> {
        let mut items = self.list(kind)?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        write_json(self.kv.as_ref(), kind.storage_key(), &items)?;
        Ok(true)
    }

    /// Flip favorite status; returns the new status
    pub fn toggle(&self, kind: FavoriteKind, item: FavoriteItem) -> Result<bool> {
        if self.remove(kind, &item.id)? {
            Ok(false)
        } else {
            self.add(kind, item)
        }
    }
}

/// Recently viewed media, newest first
#[derive(Clone)]
pub struct RecentStore {
    kv: Arc<dyn KeyValueStore>,
}

impl RecentStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn list(&self) -> Result<Vec<RecentItem>> {
        Ok(read_json(self.kv.as_ref(), RECENT_KEY)?.unwrap_or_default())
    }

    /// Move or insert `item` at the front
    pub fn record(&self, item: RecentItem) -> Result<Vec<RecentItem>> {
        let mut items = self.list()?;
        items.retain(|existing| existing.id != item.id);
        items.insert(0, item);
        items.truncate(RECENT_LIMIT);
        write_json(self.kv.as_ref(), RECENT_KEY, &items)?;
        Ok(items)
    }

    pub fn clear(&self) -> Result<()> {
        self.kv.remove_item(RECENT_KEY)
    }
}

/// Tags offered for reuse in annotation editors
#[derive(Clone)]
pub struct TagStore {
    kv: Arc<dyn KeyValueStore>,
}

impl TagStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(read_json(self.kv.as_ref(), TAGS_KEY)?.unwrap_or_default())
    }

    /// Add a tag (trimmed); blank and duplicate tags are ignored
    pub fn add(&self, tag: &str) -> Result<Vec<String>> {
        let mut tags = self.list()?;
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
            write_json(self.kv.as_ref(), TAGS_KEY, &tags)?;
        }
        Ok(tags)
    }

    pub fn remove(&self, tag: &str) -> Result<Vec<String>> {
        let mut tags = self.list()?;
        let before = tags.len();
        tags.retain(|t| t != tag);
        if tags.len() != before {
            write_json(self.kv.as_ref(), TAGS_KEY, &tags)?;
        }
        Ok(tags)
    }
}
