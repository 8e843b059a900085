//! Playback clock driven by host animation ticks.
//!
//! The host calls [`Playback::tick`] once per animation frame with a
//! millisecond timestamp. A tick advances the playhead by at most one frame,
//! and only once a full frame interval has elapsed since the last advance.
//! Late ticks are not compensated: playback slows down rather than skipping.

#[cfg(test)]
#[path = "playback_test.rs"]
mod playback_test;

use tracing::debug;

use crate::timeline::Timeline;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Playback is not running; the host should stop scheduling ticks.
    Stopped,
    /// Running, but the frame interval has not elapsed yet.
    Idle,
    /// The playhead moved to this frame.
    Advanced(usize),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Playback {
    playing: bool,
    last_advance: f64,
}

impl Playback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playing; the first advance comes one interval after `now`.
    /// Already playing: timing is left alone.
    pub fn start(&mut self, now: f64) {
        if self.playing {
            return;
        }
        debug!(now, "playback started");
        self.playing = true;
        self.last_advance = now;
    }

    /// Stop playing. A tick already scheduled by the host still runs and
    /// reports [`Tick::Stopped`].
    pub fn stop(&mut self) {
        if self.playing {
            debug!("playback stopped");
        }
        self.playing = false;
    }

    /// Change the timeline's frame rate. While playing, timing restarts at
    /// `now` so the new interval applies from here.
    pub fn set_frame_rate(&mut self, timeline: &mut Timeline, fps: u32, now: f64) {
        timeline.set_frame_rate(fps);
        if self.playing {
            self.last_advance = now;
        }
    }

    /// Milliseconds between frames at `fps`.
    #[must_use]
    pub fn interval(fps: u32) -> f64 {
        1000.0 / f64::from(fps.max(1))
    }

    pub fn tick(&mut self, now: f64, timeline: &mut Timeline) -> Tick {
        if !self.playing {
            return Tick::Stopped;
        }
        if now - self.last_advance < Self::interval(timeline.frame_rate()) {
            return Tick::Idle;
        }
        self.last_advance = now;
        Tick::Advanced(timeline.advance_playhead())
    }
}
