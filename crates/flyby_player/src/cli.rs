// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line options.

use clap::Parser;
use glam::Vec3;
use std::path::PathBuf;

/// Headless fly-through camera player
#[derive(Debug, Parser)]
#[command(name = "flyby_player", version, about)]
pub struct Cli {
    /// Camera path file (.ron or .json); the built-in demo loop when omitted
    pub path: Option<PathBuf>,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0, value_parser = parse_fps)]
    pub fps: f32,

    /// Number of frames to play
    #[arg(long, conflicts_with = "seconds")]
    pub frames: Option<u64>,

    /// Seconds of real time to play
    #[arg(long)]
    pub seconds: Option<f32>,

    /// Override the path file's playback speed
    #[arg(long)]
    pub speed: Option<f32>,

    /// Reload the path file when it changes and play in real time
    #[arg(long, requires = "path")]
    pub watch: bool,

    /// Point the camera tracks, as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub look_at: Option<Vec3>,
}

fn parse_fps(value: &str) -> Result<f32, String> {
    let fps: f32 = value.parse().map_err(|e| format!("{e}"))?;
    if fps.is_finite() && fps > 0.0 {
        Ok(fps)
    } else {
        Err(format!("fps must be positive, got {value}"))
    }
}

/// Parse `X,Y,Z` into a vector
pub fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in {value:?}: {e}"))?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected X,Y,Z, got {value:?}")),
    }
}
