// SPDX-License-Identifier: MIT OR Apache-2.0
//! Looping playback over an ordered list of clips.

use crate::clip::{Clip, ClipId};
use crate::error::{Result, SequencerError};
use crate::target::PositionSink;
use glam::Vec3;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Advancing every tick
    #[default]
    Playing,
    /// Ticks are ignored
    Paused,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing happened (no clips, or paused)
    Idle,
    /// The active clip is still playing and this position was written
    Moved(Vec3),
    /// The active clip finished; nothing was written this tick
    Advanced {
        /// Index of the clip that finished
        from: usize,
        /// Index of the clip that plays next
        to: usize,
        /// Whether playback wrapped back to the first clip
        wrapped: bool,
    },
}

/// Transition events queued by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Playback moved on to a clip
    ClipStarted {
        /// Index of the clip
        index: usize,
        /// ID of the clip
        clip: ClipId,
    },
    /// Playback wrapped from the last clip to the first
    Looped,
}

/// Plays a list of clips in order and loops forever.
///
/// The host calls [`ClipSequencer::advance`] once per frame with the frame
/// delta and the target to move. The sequencer accumulates scaled time for the
/// active clip; once that reaches the clip's duration it moves to the next clip
/// (wrapping after the last one) and resets the accumulator to zero.
///
/// The tick that performs a transition does not write a position. The first
/// frame of the new clip is written on the following tick.
#[derive(Debug, Clone)]
pub struct ClipSequencer {
    clips: Vec<Clip>,
    active_index: usize,
    elapsed: f32,
    playback_speed: f32,
    state: PlaybackState,
    pending_events: Vec<SequencerEvent>,
    /// Consecutive ticks that needed a target and had none
    failed_writes: u32,
}

impl ClipSequencer {
    /// Create an empty sequencer
    pub fn new() -> Self {
        Self {
            clips: Vec::new(),
            active_index: 0,
            elapsed: 0.0,
            playback_speed: 1.0,
            state: PlaybackState::Playing,
            pending_events: Vec::new(),
            failed_writes: 0,
        }
    }

    /// Create a sequencer playing `clips` in order
    pub fn with_clips(clips: impl IntoIterator<Item = Clip>) -> Self {
        let mut sequencer = Self::new();
        sequencer.clips = clips.into_iter().collect();
        sequencer
    }

    /// Set the playback speed
    pub fn with_playback_speed(mut self, speed: f32) -> Result<Self> {
        self.set_playback_speed(speed)?;
        Ok(self)
    }

    /// Advance playback by one frame.
    ///
    /// `delta_time` is the real time since the previous frame; it is scaled by
    /// the playback speed before being accumulated. With no clips, or while
    /// paused, this is a no-op and the target is not touched.
    ///
    /// If the active clip is still in progress its interpolated position is
    /// written to `target`. Passing `None` in that case fails with
    /// [`SequencerError::Precondition`] and leaves the playback state as it
    /// was. A transition tick writes nothing, so it succeeds without a target.
    ///
    /// Events queued before this call are discarded; [`Self::take_events`]
    /// returns only what the latest tick produced.
    pub fn advance(
        &mut self,
        delta_time: f32,
        target: Option<&mut dyn PositionSink>,
    ) -> Result<TickOutcome> {
        self.pending_events.clear();

        if self.clips.is_empty() || self.state == PlaybackState::Paused {
            return Ok(TickOutcome::Idle);
        }
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(SequencerError::InvalidDelta(delta_time));
        }

        let elapsed = self.elapsed + delta_time * self.playback_speed;
        let active = &self.clips[self.active_index];
        let duration = active.duration();

        if elapsed < duration {
            let position = active.position_at(elapsed / duration);
            let Some(target) = target else {
                return Err(self.missing_target());
            };
            target.set_position(position);
            self.elapsed = elapsed;
            self.target_restored();
            Ok(TickOutcome::Moved(position))
        } else {
            Ok(self.next_clip())
        }
    }

    /// Move to the next clip, wrapping after the last one
    fn next_clip(&mut self) -> TickOutcome {
        let from = self.active_index;
        let wrapped = from + 1 >= self.clips.len();
        let to = if wrapped { 0 } else { from + 1 };

        self.active_index = to;
        self.elapsed = 0.0;

        if wrapped {
            self.pending_events.push(SequencerEvent::Looped);
        }
        self.pending_events.push(SequencerEvent::ClipStarted {
            index: to,
            clip: self.clips[to].id,
        });

        tracing::debug!(
            "Clip {} finished, starting clip {} ({}){}",
            from,
            to,
            self.clips[to].label(),
            if wrapped { " [loop]" } else { "" }
        );

        TickOutcome::Advanced { from, to, wrapped }
    }

    /// Build the error for a write with no target, logging only the first
    /// failure of a run
    fn missing_target(&mut self) -> SequencerError {
        if self.failed_writes == 0 {
            tracing::error!(
                "No position target bound; camera position for clip {} was not written",
                self.active_index
            );
        }
        self.failed_writes = self.failed_writes.saturating_add(1);
        SequencerError::Precondition("no position target bound to the sequencer".to_string())
    }

    fn target_restored(&mut self) {
        if self.failed_writes > 0 {
            tracing::info!(
                "Position target restored after {} failed writes",
                self.failed_writes
            );
            self.failed_writes = 0;
        }
    }

    /// Append a clip to the end of the loop
    pub fn push_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    /// Replace every clip and restart playback from the first one
    pub fn set_clips(&mut self, clips: impl IntoIterator<Item = Clip>) {
        self.clips = clips.into_iter().collect();
        self.active_index = 0;
        self.elapsed = 0.0;
        self.pending_events.clear();
        tracing::info!("Camera path replaced: {} clips", self.clips.len());
    }

    /// Remove every clip
    pub fn clear(&mut self) {
        self.set_clips(Vec::new());
    }

    /// Rewind to the start of the first clip
    pub fn reset(&mut self) {
        self.active_index = 0;
        self.elapsed = 0.0;
        self.pending_events.clear();
        self.failed_writes = 0;
    }

    /// Jump to the start of a clip.
    ///
    /// The queued `ClipStarted` event lasts until the next tick.
    pub fn seek_clip(&mut self, index: usize) -> Result<()> {
        let Some(clip) = self.clips.get(index) else {
            return Err(SequencerError::ClipIndexOutOfRange {
                index,
                len: self.clips.len(),
            });
        };
        self.pending_events.push(SequencerEvent::ClipStarted { index, clip: clip.id });
        self.active_index = index;
        self.elapsed = 0.0;
        Ok(())
    }

    /// Resume playback
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.play(),
        }
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Playback speed multiplier
    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Set the playback speed multiplier.
    ///
    /// `1.0` is real time and `0.0` freezes playback. Negative speeds would
    /// never finish a clip, so they are rejected along with NaN and infinity.
    pub fn set_playback_speed(&mut self, speed: f32) -> Result<()> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(SequencerError::configuration(format!(
                "playback speed must be finite and non-negative, got {speed}"
            )));
        }
        self.playback_speed = speed;
        Ok(())
    }

    /// All clips in playback order
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Get clip count
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Whether there are no clips to play
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Index of the clip currently playing
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The clip currently playing
    pub fn active_clip(&self) -> Option<&Clip> {
        self.clips.get(self.active_index)
    }

    /// Scaled time accumulated in the active clip
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Normalized progress through the active clip
    pub fn progress(&self) -> Option<f32> {
        self.active_clip().map(|clip| self.elapsed / clip.duration())
    }

    /// Position of the active clip at the current elapsed time
    pub fn current_position(&self) -> Option<Vec3> {
        self.active_clip()
            .map(|clip| clip.position_at(self.elapsed / clip.duration()))
    }

    /// Duration of one full pass through every clip
    pub fn loop_duration(&self) -> f32 {
        self.clips.iter().map(Clip::duration).sum()
    }

    /// Number of consecutive ticks that failed for lack of a target
    pub fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    /// Get the events of the latest tick and clear them
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for ClipSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that records every write
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<Vec3>,
    }

    impl PositionSink for RecordingSink {
        fn set_position(&mut self, position: Vec3) {
            self.writes.push(position);
        }
    }

    fn clip(duration: f32, start: Vec3, end: Vec3) -> Clip {
        Clip::between(duration, start, end).unwrap()
    }

    fn two_clips() -> ClipSequencer {
        ClipSequencer::with_clips([
            clip(10.0, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)),
            clip(10.0, Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 20.0, 0.0)),
        ])
    }

    #[test]
    fn test_two_clip_scenario() {
        let mut seq = two_clips();
        let mut sink = RecordingSink::default();

        // tick 1: halfway through clip 0
        let outcome = seq.advance(5.0, Some(&mut sink)).unwrap();
        assert_eq!(outcome, TickOutcome::Moved(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(seq.elapsed(), 5.0);

        // tick 2: clip 0 done, no write
        let outcome = seq.advance(5.0, Some(&mut sink)).unwrap();
        assert_eq!(outcome, TickOutcome::Advanced { from: 0, to: 1, wrapped: false });
        assert_eq!(seq.active_index(), 1);
        assert_eq!(seq.elapsed(), 0.0);
        assert_eq!(sink.writes.len(), 1);

        // tick 3: halfway through clip 1
        let outcome = seq.advance(5.0, Some(&mut sink)).unwrap();
        assert_eq!(outcome, TickOutcome::Moved(Vec3::new(0.0, 15.0, 0.0)));

        // tick 4: wrap back to clip 0, no write
        let outcome = seq.advance(5.0, Some(&mut sink)).unwrap();
        assert_eq!(outcome, TickOutcome::Advanced { from: 1, to: 0, wrapped: true });
        assert_eq!(seq.active_index(), 0);
        assert_eq!(seq.elapsed(), 0.0);
        assert_eq!(sink.writes, vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 15.0, 0.0)]);
    }

    #[test]
    fn test_empty_sequencer_is_noop() {
        let mut seq = ClipSequencer::new();
        let mut sink = RecordingSink::default();
        assert_eq!(seq.advance(1.0, Some(&mut sink)).unwrap(), TickOutcome::Idle);
        assert_eq!(seq.advance(1.0, None).unwrap(), TickOutcome::Idle);
        assert!(sink.writes.is_empty());
        assert_eq!(seq.elapsed(), 0.0);
        assert!(seq.current_position().is_none());
    }

    #[test]
    fn test_loops_after_n_completions() {
        for n in 1..=5 {
            let clips = (0..n).map(|i| clip(1.0 + i as f32, Vec3::ZERO, Vec3::ONE));
            let mut seq = ClipSequencer::with_clips(clips);
            let mut target = Vec3::ZERO;

            let mut completions = 0;
            while completions < n {
                let outcome = seq.advance(0.5, Some(&mut target)).unwrap();
                if let TickOutcome::Advanced { wrapped, .. } = outcome {
                    completions += 1;
                    assert_eq!(wrapped, completions == n);
                    assert_eq!(seq.active_index(), completions % n);
                }
            }
            assert_eq!(seq.active_index(), 0);
        }
    }

    #[test]
    fn test_single_clip_loops_itself() {
        let mut seq = ClipSequencer::with_clips([clip(2.0, Vec3::ZERO, Vec3::X)]);
        let mut target = Vec3::ZERO;

        seq.advance(1.0, Some(&mut target)).unwrap();
        let outcome = seq.advance(1.0, Some(&mut target)).unwrap();
        assert_eq!(outcome, TickOutcome::Advanced { from: 0, to: 0, wrapped: true });
        assert_eq!(seq.active_index(), 0);
        assert_eq!(seq.elapsed(), 0.0);

        seq.advance(0.5, Some(&mut target)).unwrap();
        assert_eq!(target, Vec3::new(0.25, 0.0, 0.0));
    }

    #[test]
    fn test_overshoot_resets_to_zero() {
        let mut seq = two_clips();
        let mut target = Vec3::ZERO;

        // Spans both clips, but only one transition happens per tick
        let outcome = seq.advance(25.0, Some(&mut target)).unwrap();
        assert_eq!(outcome, TickOutcome::Advanced { from: 0, to: 1, wrapped: false });
        assert_eq!(seq.elapsed(), 0.0);
        assert_eq!(target, Vec3::ZERO);
    }

    #[test]
    fn test_playback_speed_scales_time() {
        let mut seq = two_clips().with_playback_speed(2.0).unwrap();
        let mut target = Vec3::ZERO;
        seq.advance(2.5, Some(&mut target)).unwrap();
        assert_eq!(seq.elapsed(), 5.0);
        assert_eq!(target, Vec3::new(5.0, 0.0, 0.0));

        seq.set_playback_speed(0.0).unwrap();
        seq.advance(100.0, Some(&mut target)).unwrap();
        assert_eq!(seq.elapsed(), 5.0);
        assert_eq!(seq.active_index(), 0);
    }

    #[test]
    fn test_rejects_invalid_speed() {
        let mut seq = two_clips();
        for speed in [-1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                seq.set_playback_speed(speed),
                Err(SequencerError::Configuration(_))
            ));
        }
        assert_eq!(seq.playback_speed(), 1.0);
    }

    #[test]
    fn test_rejects_invalid_delta() {
        let mut seq = two_clips();
        let mut target = Vec3::ZERO;
        assert!(matches!(
            seq.advance(-1.0, Some(&mut target)),
            Err(SequencerError::InvalidDelta(_))
        ));
        assert!(seq.advance(f32::NAN, Some(&mut target)).is_err());
        assert_eq!(seq.elapsed(), 0.0);
    }

    #[test]
    fn test_missing_target_fails_without_mutation() {
        let mut seq = two_clips();

        for attempt in 1..=3 {
            let err = seq.advance(5.0, None).unwrap_err();
            assert!(err.is_missing_target());
            assert_eq!(seq.failed_writes(), attempt);
            assert_eq!(seq.elapsed(), 0.0);
            assert_eq!(seq.active_index(), 0);
        }

        let mut target = Vec3::ZERO;
        seq.advance(5.0, Some(&mut target)).unwrap();
        assert_eq!(seq.failed_writes(), 0);
        assert_eq!(target, Vec3::new(5.0, 0.0, 0.0));

        // Transition ticks write nothing, so they need no target
        let outcome = seq.advance(5.0, None).unwrap();
        assert!(matches!(outcome, TickOutcome::Advanced { .. }));
    }

    #[test]
    fn test_pause_ignores_ticks() {
        let mut seq = two_clips();
        let mut sink = RecordingSink::default();

        seq.pause();
        assert!(!seq.is_playing());
        assert_eq!(seq.advance(5.0, Some(&mut sink)).unwrap(), TickOutcome::Idle);
        assert!(sink.writes.is_empty());

        seq.toggle_playback();
        assert_eq!(seq.state(), PlaybackState::Playing);
        seq.advance(5.0, Some(&mut sink)).unwrap();
        assert_eq!(sink.writes.len(), 1);
    }

    #[test]
    fn test_set_clips_resets_playback() {
        let mut seq = two_clips();
        let mut target = Vec3::ZERO;
        seq.advance(10.0, Some(&mut target)).unwrap();
        seq.advance(3.0, Some(&mut target)).unwrap();
        assert_eq!(seq.active_index(), 1);

        seq.set_clips([clip(4.0, Vec3::ZERO, Vec3::Y)]);
        assert_eq!(seq.active_index(), 0);
        assert_eq!(seq.elapsed(), 0.0);
        assert!(seq.take_events().is_empty());

        seq.advance(1.0, Some(&mut target)).unwrap();
        assert_eq!(target, Vec3::new(0.0, 0.25, 0.0));

        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.advance(1.0, Some(&mut target)).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn test_push_clip_on_empty_starts_at_first() {
        let mut seq = ClipSequencer::new();
        let mut target = Vec3::ZERO;
        seq.advance(1.0, Some(&mut target)).unwrap();

        seq.push_clip(clip(2.0, Vec3::ZERO, Vec3::Z));
        assert_eq!(seq.active_index(), 0);
        seq.advance(1.0, Some(&mut target)).unwrap();
        assert_eq!(target, Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_seek_and_queries() {
        let mut seq = two_clips();
        assert_eq!(seq.loop_duration(), 20.0);
        assert!(seq.seek_clip(2).is_err());

        seq.seek_clip(1).unwrap();
        let mut target = Vec3::ZERO;
        seq.advance(2.5, Some(&mut target)).unwrap();
        assert_eq!(seq.progress(), Some(0.25));
        assert_eq!(seq.current_position(), Some(Vec3::new(0.0, 12.5, 0.0)));

        seq.reset();
        assert_eq!(seq.active_index(), 0);
        assert_eq!(seq.progress(), Some(0.0));
    }

    #[test]
    fn test_transition_events() {
        let mut seq = two_clips();
        let ids: Vec<_> = seq.clips().iter().map(|c| c.id).collect();
        let mut target = Vec3::ZERO;

        // Every tick of 10.0 finishes the active clip
        seq.advance(10.0, Some(&mut target)).unwrap();
        assert_eq!(
            seq.take_events(),
            vec![SequencerEvent::ClipStarted { index: 1, clip: ids[1] }]
        );

        seq.advance(10.0, Some(&mut target)).unwrap();
        assert_eq!(
            seq.take_events(),
            vec![
                SequencerEvent::Looped,
                SequencerEvent::ClipStarted { index: 0, clip: ids[0] },
            ]
        );
        assert!(seq.take_events().is_empty());

        // In-progress ticks queue nothing
        seq.advance(5.0, Some(&mut target)).unwrap();
        assert!(seq.take_events().is_empty());
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut seq = ClipSequencer::with_clips([
            clip(1.0, Vec3::ZERO, Vec3::X),
            clip(1.0, Vec3::X, Vec3::Y),
        ]);
        let mut target = Vec3::ZERO;

        for _ in 0..200_000 {
            seq.advance(0.5, Some(&mut target)).unwrap();
        }
        assert!(seq.take_events().len() <= 2);
    }

    #[test]
    fn test_reset_drops_stale_state() {
        let mut seq = ClipSequencer::with_clips([
            clip(1.0, Vec3::ZERO, Vec3::X),
            clip(1.0, Vec3::X, Vec3::Y),
        ]);
        let mut target = Vec3::ZERO;

        assert!(seq.advance(0.5, None).is_err());
        assert_eq!(seq.failed_writes(), 1);

        // Finishes clip 0 and queues the start of clip 1
        seq.advance(1.0, Some(&mut target)).unwrap();
        assert_eq!(seq.active_index(), 1);
        assert_eq!(seq.failed_writes(), 1);

        seq.reset();
        assert!(seq.take_events().is_empty());
        assert_eq!(seq.failed_writes(), 0);
        assert_eq!(seq.active_index(), 0);
    }
}
