// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera path files.
//!
//! A path file lists the clips of one fly-through loop plus the playback
//! speed and an optional look-at target. Files are RON by default; a `.json`
//! extension selects JSON.

use crate::clip::{Clip, PositionPair};
use crate::error::{Result, SequencerError};
use crate::sequencer::ClipSequencer;
use crate::tracker::LookAtTracker;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current path file format version
pub const PATH_FORMAT_VERSION: u32 = 1;

/// Serialization format of a path file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFormat {
    /// Rusty Object Notation
    Ron,
    /// JSON
    Json,
}

impl PathFormat {
    /// Pick the format from a file extension, defaulting to RON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Ron,
        }
    }
}

/// One clip as written in a path file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipConfig {
    /// Optional label
    #[serde(default)]
    pub name: Option<String>,
    /// Duration in speed-scaled seconds
    pub duration: f32,
    /// Start position
    pub start: [f32; 3],
    /// End position
    pub end: [f32; 3],
}

impl ClipConfig {
    /// Create a clip entry
    pub fn new(duration: f32, start: [f32; 3], end: [f32; 3]) -> Self {
        Self {
            name: None,
            duration,
            start,
            end,
        }
    }

    /// Validate and build the clip
    pub fn to_clip(&self) -> Result<Clip> {
        let path = PositionPair::new(Vec3::from_array(self.start), Vec3::from_array(self.end));
        let clip = Clip::new(self.duration, path)?;
        Ok(match &self.name {
            Some(name) => clip.with_name(name.clone()),
            None => clip,
        })
    }
}

/// Look-at settings stored with a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookAtConfig {
    /// World-space point the camera tracks
    pub target: [f32; 3],
    /// Euler offset in degrees
    #[serde(default)]
    pub offset_degrees: [f32; 3],
}

impl LookAtConfig {
    /// Tracker for these settings
    pub fn tracker(&self) -> LookAtTracker {
        LookAtTracker::new(Vec3::from_array(self.offset_degrees))
    }

    /// Tracked point
    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.target)
    }
}

fn default_version() -> u32 {
    PATH_FORMAT_VERSION
}

fn default_playback_speed() -> f32 {
    1.0
}

/// A complete camera path file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPathConfig {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Playback speed multiplier
    #[serde(default = "default_playback_speed")]
    pub playback_speed: f32,
    /// Clips in playback order
    pub clips: Vec<ClipConfig>,
    /// Optional look-at target
    #[serde(default)]
    pub look_at: Option<LookAtConfig>,
}

impl Default for CameraPathConfig {
    /// The two-clip demo loop
    fn default() -> Self {
        Self {
            version: PATH_FORMAT_VERSION,
            playback_speed: 1.0,
            clips: vec![
                ClipConfig::new(10.0, [-6.719, -0.93, 5.01], [3.059, 0.689, 8.26]),
                ClipConfig::new(10.0, [12.63, -4.9, 1.679], [5.44, 1.34, 4.48]),
            ],
            look_at: None,
        }
    }
}

impl CameraPathConfig {
    /// Load a path file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SequencerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, PathFormat::from_path(path)).map_err(|e| match e {
            SequencerError::Parse { message, .. } => SequencerError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })?;
        tracing::debug!("Loaded camera path {:?}: {} clips", path, config.clips.len());
        Ok(config)
    }

    /// Parse path file contents
    pub fn parse(content: &str, format: PathFormat) -> Result<Self> {
        let config: CameraPathConfig = match format {
            PathFormat::Ron => ron::from_str::<CameraPathConfig>(content).map_err(|e| e.to_string()),
            PathFormat::Json => serde_json::from_str::<CameraPathConfig>(content).map_err(|e| e.to_string()),
        }
        .map_err(|message| SequencerError::Parse {
            path: None,
            message,
        })?;

        if config.version > PATH_FORMAT_VERSION {
            return Err(SequencerError::configuration(format!(
                "Path version {} is newer than supported version {}",
                config.version, PATH_FORMAT_VERSION
            )));
        }

        Ok(config)
    }

    /// Serialize to a string
    pub fn to_text(&self, format: PathFormat) -> Result<String> {
        match format {
            PathFormat::Ron => {
                let pretty = ron::ser::PrettyConfig::default()
                    .struct_names(true)
                    .enumerate_arrays(false);
                ron::ser::to_string_pretty(self, pretty)
                    .map_err(|e| SequencerError::Serialize(e.to_string()))
            }
            PathFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| SequencerError::Serialize(e.to_string())),
        }
    }

    /// Save to a path file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_text(PathFormat::from_path(path))?;
        std::fs::write(path, content).map_err(|source| SequencerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate every clip, naming the first bad one
    pub fn to_clips(&self) -> Result<Vec<Clip>> {
        self.clips
            .iter()
            .enumerate()
            .map(|(index, clip)| {
                clip.to_clip().map_err(|e| match e {
                    SequencerError::Configuration(message) => {
                        SequencerError::configuration(format!("clip {index}: {message}"))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// Build a sequencer ready to play this path
    pub fn build_sequencer(&self) -> Result<ClipSequencer> {
        ClipSequencer::with_clips(self.to_clips()?).with_playback_speed(self.playback_speed)
    }
}
