// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for clip construction, playback and path files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the sequencer and its configuration layer
#[derive(Debug, Error)]
pub enum SequencerError {
    /// Invalid clip or playback configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A position write was required but no target was bound
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Frame delta was negative, NaN or infinite
    #[error("Invalid frame delta: {0}")]
    InvalidDelta(f32),

    /// Seek to a clip that does not exist
    #[error("Clip index {index} out of range (sequence has {len} clips)")]
    ClipIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of clips in the sequence
        len: usize,
    },

    /// Failed to read or write a path file
    #[error("IO error on {path:?}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a path file
    #[error("Failed to parse{}: {message}", display_path(.path))]
    Parse {
        /// File being parsed, if the contents came from one
        path: Option<PathBuf>,
        /// Parser message
        message: String,
    },

    /// Failed to serialize a path file
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl SequencerError {
    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error came from a missing position target
    pub fn is_missing_target(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref().map(|p| format!(" {p:?}")).unwrap_or_default()
}

/// Result alias for sequencer operations
pub type Result<T> = std::result::Result<T, SequencerError>;
