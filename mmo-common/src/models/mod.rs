//! Data model shared by all persistence adapters

pub mod audio;
pub mod lists;
pub mod markers;

pub use audio::{AudioMetadata, LoopRegion};
pub use lists::{FavoriteItem, FavoriteKind, RecentItem, SavedPlaylist};
pub use markers::{Annotation, AudioMarker, MarkerState, TimeMarker};
