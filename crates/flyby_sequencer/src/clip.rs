// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed path segments for the sequencer.

use crate::error::{Result, SequencerError};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Create a new random clip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

/// Start and end position of a clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionPair {
    /// Position at progress 0
    pub start: Vec3,
    /// Position at progress 1
    pub end: Vec3,
}

impl PositionPair {
    /// Create a new position pair
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Unclamped linear interpolation between `start` and `end`
    #[inline]
    pub fn lerp(&self, t: f32) -> Vec3 {
        self.start + t * (self.end - self.start)
    }

    fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

/// A single timed linear path segment.
///
/// Clips are validated on construction and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Optional display name
    pub name: Option<String>,
    duration: f32,
    path: PositionPair,
}

impl Clip {
    /// Create a clip playing from `start` to `end` over `duration`.
    ///
    /// The duration is in speed-scaled seconds and must be positive and
    /// finite; positions must be finite.
    pub fn new(duration: f32, path: PositionPair) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SequencerError::configuration(format!(
                "clip duration must be positive and finite, got {duration}"
            )));
        }
        if !path.is_finite() {
            return Err(SequencerError::configuration(format!(
                "clip positions must be finite, got {:?} -> {:?}",
                path.start, path.end
            )));
        }

        Ok(Self {
            id: ClipId::new(),
            name: None,
            duration,
            path,
        })
    }

    /// Create a clip from two endpoints
    pub fn between(duration: f32, start: Vec3, end: Vec3) -> Result<Self> {
        Self::new(duration, PositionPair::new(start, end))
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Playback duration
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Start and end positions
    pub fn path(&self) -> PositionPair {
        self.path
    }

    /// Position at progress 0
    pub fn start(&self) -> Vec3 {
        self.path.start
    }

    /// Position at progress 1
    pub fn end(&self) -> Vec3 {
        self.path.end
    }

    /// Straight-line distance covered by the clip
    pub fn length(&self) -> f32 {
        self.path.start.distance(self.path.end)
    }

    /// Interpolated position at normalized `progress`.
    ///
    /// Not clamped: values outside `[0, 1]` extrapolate along the line
    /// through the two endpoints, which allows overshoot effects.
    #[inline]
    pub fn position_at(&self, progress: f32) -> Vec3 {
        self.path.lerp(progress)
    }

    /// Label used in log output
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{:?}", self.id.0),
        }
    }
}
