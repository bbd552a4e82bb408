//! YouTube playlists remembered per root folder (`youtube-playlists.json`)

use std::path::Path;

use super::{read_json_file, write_json_file};
use crate::models::SavedPlaylist;
use crate::Result;

/// Playlist list file name inside a root folder
pub const PLAYLISTS_FILE: &str = "youtube-playlists.json";

/// Saved playlists; empty when the file does not exist
pub async fn load_playlists(root: &Path) -> Result<Vec<SavedPlaylist>> {
    Ok(read_json_file(&root.join(PLAYLISTS_FILE))
        .await?
        .unwrap_or_default())
}

/// Replace the saved playlists, dropping duplicate ids (first one wins)
pub async fn save_playlists(root: &Path, playlists: &[SavedPlaylist]) -> Result<Vec<SavedPlaylist>> {
    let mut unique: Vec<SavedPlaylist> = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        if !unique.iter().any(|p| p.id == playlist.id) {
            unique.push(playlist.clone());
        }
    }
    write_json_file(&root.join(PLAYLISTS_FILE), &unique).await?;
    Ok(unique)
}
