// SPDX-License-Identifier: MIT OR Apache-2.0
//! Looping camera path playback for Flyby.
//!
//! This crate drives a camera along timed path segments:
//! - Clips with unclamped linear interpolation
//! - A sequencer that advances, wraps and loops clips frame by frame
//! - Position targets the sequencer writes into
//! - Look-at orientation for the camera
//! - RON/JSON camera path files
//!
//! ## Architecture
//!
//! The host owns both the [`ClipSequencer`] and the object it moves, and calls
//! [`ClipSequencer::advance`] once per frame with the frame delta. Nothing in
//! this crate schedules itself.

pub mod clip;
pub mod config;
pub mod error;
pub mod sequencer;
pub mod target;
pub mod tracker;

pub use clip::{Clip, ClipId, PositionPair};
pub use config::{CameraPathConfig, ClipConfig, LookAtConfig, PathFormat, PATH_FORMAT_VERSION};
pub use error::{Result, SequencerError};
pub use sequencer::{ClipSequencer, PlaybackState, SequencerEvent, TickOutcome};
pub use target::{CameraTransform, PositionSink};
pub use tracker::LookAtTracker;
