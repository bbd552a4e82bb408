//! Time-range markers and their annotations
//!
//! Field names serialize in camelCase so sidecar files and key-value entries
//! stay readable by the web client that shares them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound of `completion_degree`
pub const MAX_COMPLETION_DEGREE: u8 = 100;

/// A time range within one media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeMarker {
    /// Random identifier, unique within one marker list
    pub id: String,
    /// Range start in seconds
    pub start_time: f64,
    /// Range end in seconds
    pub end_time: f64,
    #[serde(default)]
    pub is_looping: bool,
    /// Author-declared progress, 0-100
    #[serde(default)]
    pub completion_degree: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recording: Option<bool>,
    /// Unix epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Audio markers share the video marker shape
pub type AudioMarker = TimeMarker;

impl TimeMarker {
    /// Create a marker with a fresh id
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            end_time,
            is_looping: false,
            completion_degree: 0,
            is_recording: None,
            created_at: Some(crate::time::now_millis()),
        }
    }

    /// Whether the range is non-empty and ordered
    pub fn has_valid_range(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.start_time < self.end_time
    }

    /// Range length in seconds (zero for inverted ranges)
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

/// Free text plus tags attached to one marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub marker_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unix epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

impl Annotation {
    pub fn new(marker_id: impl Into<String>, text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            marker_id: marker_id.into(),
            text: text.into(),
            tags,
            timestamp: crate::time::now_millis(),
        }
    }
}

/// Persisted marker state of one media item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerState {
    pub markers: Vec<TimeMarker>,
    pub annotations: Vec<Annotation>,
    pub active_marker_id: Option<String>,
    pub is_looping: bool,
}

impl MarkerState {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.annotations.is_empty()
    }

    pub fn marker(&self, id: &str) -> Option<&TimeMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn add_marker(&mut self, marker: TimeMarker) {
        self.markers.push(marker);
    }

    /// Replace the marker with the same id; returns false when none matched
    pub fn update_marker(&mut self, marker: TimeMarker) -> bool {
        match self.markers.iter_mut().find(|m| m.id == marker.id) {
            Some(existing) => {
                *existing = marker;
                true
            }
            None => false,
        }
    }

    /// Remove a marker together with its annotations
    pub fn remove_marker(&mut self, id: &str) -> Option<TimeMarker> {
        let index = self.markers.iter().position(|m| m.id == id)?;
        let removed = self.markers.remove(index);
        self.annotations.retain(|a| a.marker_id != id);
        if self.active_marker_id.as_deref() == Some(id) {
            self.active_marker_id = None;
        }
        Some(removed)
    }

    /// Store an annotation, replacing any earlier one for the same marker
    pub fn upsert_annotation(&mut self, annotation: Annotation) {
        self.annotations.retain(|a| a.marker_id != annotation.marker_id);
        self.annotations.push(annotation);
    }

    pub fn annotation_for(&self, marker_id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.marker_id == marker_id)
    }

    /// Check marker ranges and completion degrees before a write
    pub fn validate(&self) -> crate::Result<()> {
        for marker in &self.markers {
            if marker.completion_degree > MAX_COMPLETION_DEGREE {
                return Err(crate::Error::InvalidInput(format!(
                    "marker {}: completionDegree {} exceeds {}",
                    marker.id, marker.completion_degree, MAX_COMPLETION_DEGREE
                )));
            }
            if !marker.has_valid_range() {
                return Err(crate::Error::InvalidInput(format!(
                    "marker {}: startTime {} must be before endTime {}",
                    marker.id, marker.start_time, marker.end_time
                )));
            }
        }
        Ok(())
    }
}
