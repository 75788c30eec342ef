// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-step host loop driving the camera sequencer.

use crate::file_watcher::{FileEvent, FileWatcher, FileWatcherConfig};
use flyby_sequencer::{
    CameraPathConfig, CameraTransform, ClipSequencer, LookAtTracker, SequencerError,
    SequencerEvent, TickOutcome,
};
use glam::Vec3;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Camera path could not be loaded or played
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    /// File watcher setup failed
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Frame loop settings
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    /// Camera path file, or `None` for the demo loop
    pub path: Option<PathBuf>,
    /// Simulated frames per second
    pub fps: f32,
    /// Frames to play; one full loop when `None` and not watching
    pub frames: Option<u64>,
    /// Playback speed overriding the path file
    pub speed: Option<f32>,
    /// Reload the path file on change and pace frames in real time
    pub watch: bool,
    /// Look-at target overriding the path file
    pub look_at: Option<Vec3>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            path: None,
            fps: 60.0,
            frames: None,
            speed: None,
            watch: false,
            look_at: None,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackStats {
    /// Frames ticked
    pub frames: u64,
    /// Frames that wrote a camera position
    pub moves: u64,
    /// Clip transitions
    pub transitions: u64,
    /// Completed loops
    pub loops: u64,
    /// Successful hot reloads
    pub reloads: u64,
}

/// Owns the sequencer and the camera it moves
pub struct Player {
    options: PlayerOptions,
    sequencer: ClipSequencer,
    camera: CameraTransform,
    tracking: Option<(LookAtTracker, Vec3)>,
    watcher: Option<FileWatcher>,
    stats: PlaybackStats,
}

impl Player {
    /// Load the camera path and set up the player
    pub fn new(options: PlayerOptions) -> Result<Self> {
        let config = load_config(options.path.as_deref())?;
        let mut player = Self {
            sequencer: ClipSequencer::new(),
            camera: CameraTransform::default(),
            tracking: None,
            watcher: None,
            stats: PlaybackStats::default(),
            options,
        };
        player.apply_config(&config)?;

        if player.options.watch {
            if let Some(path) = player.options.path.clone() {
                let mut watcher = FileWatcher::new(FileWatcherConfig::default())?;
                watcher.watch(&path)?;
                player.watcher = Some(watcher);
            }
        }

        tracing::info!(
            "Camera path ready: {} clips, {:.2}s per loop at speed {}",
            player.sequencer.clip_count(),
            player.sequencer.loop_duration(),
            player.sequencer.playback_speed()
        );
        Ok(player)
    }

    /// Install a loaded path, applying command line overrides
    fn apply_config(&mut self, config: &CameraPathConfig) -> Result<()> {
        let clips = config.to_clips()?;
        let speed = self.options.speed.unwrap_or(config.playback_speed);

        // Both checks run before the clips are swapped in
        self.sequencer.set_playback_speed(speed)?;
        self.sequencer.set_clips(clips);

        self.tracking = match (self.options.look_at, config.look_at) {
            (Some(target), _) => Some((LookAtTracker::facing_target(), target)),
            (None, Some(look_at)) => Some((look_at.tracker(), look_at.target())),
            (None, None) => None,
        };
        Ok(())
    }

    /// Frame budget for this run
    pub fn frame_limit(&self) -> Option<u64> {
        if let Some(frames) = self.options.frames {
            return Some(frames);
        }
        if self.options.watch {
            return None;
        }

        // One full loop, plus the boundary tick of every clip
        let speed = self.sequencer.playback_speed();
        if speed > 0.0 {
            let seconds = self.sequencer.loop_duration() / speed;
            Some((seconds * self.options.fps).ceil() as u64 + self.sequencer.clip_count() as u64)
        } else {
            Some(self.options.fps.ceil() as u64)
        }
    }

    /// Advance one frame
    pub fn step(&mut self, delta_time: f32) -> Result<TickOutcome> {
        let outcome = self.sequencer.advance(delta_time, Some(&mut self.camera))?;
        self.stats.frames += 1;

        match outcome {
            TickOutcome::Moved(position) => {
                self.stats.moves += 1;
                if let Some((tracker, target)) = &self.tracking {
                    tracker.apply(&mut self.camera, *target);
                }
                tracing::debug!(
                    "frame {}: position ({:.3}, {:.3}, {:.3})",
                    self.stats.frames,
                    position.x,
                    position.y,
                    position.z
                );
            }
            TickOutcome::Advanced { .. } => self.stats.transitions += 1,
            TickOutcome::Idle => {}
        }

        for event in self.sequencer.take_events() {
            match event {
                SequencerEvent::Looped => {
                    self.stats.loops += 1;
                    tracing::info!("Camera path looped ({} loops)", self.stats.loops);
                }
                SequencerEvent::ClipStarted { index, .. } => {
                    tracing::info!("Playing clip {}", index);
                }
            }
        }

        Ok(outcome)
    }

    /// Reload the path file if the watcher saw it change
    pub fn poll_reload(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };

        let mut changed = false;
        for event in watcher.poll_events() {
            match event {
                FileEvent::Modified(_) => changed = true,
                FileEvent::Deleted(path) => {
                    tracing::warn!("Camera path {:?} was deleted; keeping current clips", path);
                }
                FileEvent::Error(e) => tracing::warn!("File watcher error: {}", e),
            }
        }

        if changed {
            self.reload();
        }
    }

    /// Reload the path file, keeping the current clips on failure
    pub fn reload(&mut self) {
        let Some(path) = self.options.path.clone() else {
            return;
        };

        let result = load_config(Some(&path)).and_then(|config| self.apply_config(&config));
        match result {
            Ok(()) => {
                self.stats.reloads += 1;
                tracing::info!("Reloaded camera path {:?}", path);
            }
            Err(e) => tracing::error!("Failed to reload camera path {:?}: {}", path, e),
        }
    }

    /// Run the frame loop until the frame budget is spent
    pub fn run(&mut self) -> Result<PlaybackStats> {
        let delta_time = 1.0 / self.options.fps;
        let frame_duration = Duration::from_secs_f32(delta_time);
        let limit = self.frame_limit();

        while limit.map_or(true, |limit| self.stats.frames < limit) {
            let frame_start = Instant::now();
            self.poll_reload();
            self.step(delta_time)?;

            if self.options.watch {
                if let Some(remaining) = frame_duration.checked_sub(frame_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }

        tracing::info!(
            "Played {} frames: {} transitions, {} loops",
            self.stats.frames,
            self.stats.transitions,
            self.stats.loops
        );
        Ok(self.stats)
    }

    /// Camera being driven
    pub fn camera(&self) -> &CameraTransform {
        &self.camera
    }

    /// The sequencer
    pub fn sequencer(&self) -> &ClipSequencer {
        &self.sequencer
    }

    /// Counters so far
    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }
}

fn load_config(path: Option<&Path>) -> Result<CameraPathConfig> {
    match path {
        Some(path) => Ok(CameraPathConfig::load(path)?),
        None => {
            tracing::info!("No camera path given, playing the demo loop");
            Ok(CameraPathConfig::default())
        }
    }
}
