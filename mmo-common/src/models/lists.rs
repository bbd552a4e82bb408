//! Records kept in the favorites, recently viewed and playlist lists

use serde::{Deserialize, Serialize};

/// Which favorites list an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Video,
    Audio,
}

impl FavoriteKind {
    /// Key-value store key of the list
    pub fn storage_key(self) -> &'static str {
        match self {
            FavoriteKind::Video => "video-favorites",
            FavoriteKind::Audio => "audio-favorites",
        }
    }
}

impl std::str::FromStr for FavoriteKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" | "videos" => Ok(FavoriteKind::Video),
            "audio" => Ok(FavoriteKind::Audio),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown favorites list: {}",
                other
            ))),
        }
    }
}

/// A favorited media item, identified by path or content id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub added_at: i64,
}

/// An entry of the recently viewed list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub viewed_at: i64,
}

/// A YouTube playlist remembered for a root folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlaylist {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub added_at: i64,
}
