//! # MMO Common Library
//!
//! Shared code for the media marker organizer:
//! - Marker, annotation and audio metadata models
//! - Persistence adapters (sidecar files, audio metadata document, key-value store)
//! - Favorites, recently viewed and saved tag lists
//! - Media library roots and directory scanning
//! - Configuration loading

pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod storage;
pub mod time;

pub use error::{Error, Result};
pub use models::{Annotation, AudioMarker, AudioMetadata, LoopRegion, MarkerState, TimeMarker};
