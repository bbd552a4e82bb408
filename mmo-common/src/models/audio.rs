//! Per-file audio metadata stored in `audio-metadata.json`

use serde::{Deserialize, Serialize};

use super::MarkerState;

/// A/B loop region of an audio file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopRegion {
    pub start: f64,
    pub end: f64,
    pub enabled: bool,
}

/// Everything remembered about one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub loop_region: LoopRegion,
    /// Markers, annotations, active marker and loop flag
    #[serde(flatten)]
    pub marker_state: MarkerState,
    pub playback_rate: f64,
    pub volume: f64,
    /// Unix epoch milliseconds of the last save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
}

impl Default for AudioMetadata {
    fn default() -> Self {
        Self {
            title: None,
            tags: Vec::new(),
            loop_region: LoopRegion::default(),
            marker_state: MarkerState::default(),
            playback_rate: 1.0,
            volume: 1.0,
            last_modified: None,
        }
    }
}

impl AudioMetadata {
    /// Drop markers and annotations, keeping tags and playback settings
    pub fn clear_markers(&mut self) {
        self.marker_state = MarkerState::default();
    }
}
