//! Platform abstraction layer
//!
//! The session never touches the page directly. Everything it needs from
//! the host goes through these capabilities:
//! - Page targets (find, hide, restore)
//! - The start trigger
//! - Audio output
//! - The rhythm timer
//!
//! `web` holds the browser implementations; the headless ones here back
//! native runs and tests.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::audio::AudioCue;
use crate::sim::{PageTarget, TargetHandle, Viewport};

/// Finds page elements that can be shot and toggles their visibility
pub trait TargetProvider {
    /// Eligible elements fully inside `viewport`, measured now.
    /// Handles stay valid until the next scan.
    fn scan(&mut self, viewport: Viewport) -> Vec<PageTarget>;

    fn set_visible(&mut self, handle: TargetHandle, visible: bool);
}

/// The page control that starts a session
pub trait TriggerControl {
    fn hide(&mut self);
    /// Show again and replay its entrance animation
    fn restore(&mut self);
}

/// Plays sound cues
pub trait AudioSink {
    /// Prepare output for a session at `volume` (0 silences every cue)
    fn open(&mut self, volume: f32);
    fn play(&mut self, cue: AudioCue);
    /// Change the volume of later cues
    fn set_volume(&mut self, volume: f32);
    /// Release output; `play` is a no-op until the next `open`
    fn close(&mut self);
}

/// One-shot timer the session re-arms after every rhythm beat.
/// When it fires the host calls `Session::on_rhythm_tick`.
pub trait RhythmTimer {
    /// Replace any pending beat with one `delay_ms` from now
    fn schedule(&mut self, delay_ms: f64);
    fn cancel(&mut self);
    fn is_pending(&self) -> bool;
}

/// Everything the session borrows from its host
pub struct Host {
    pub targets: Box<dyn TargetProvider>,
    pub trigger: Box<dyn TriggerControl>,
    pub audio: Box<dyn AudioSink>,
    pub timer: Box<dyn RhythmTimer>,
}

impl Host {
    /// No page, no sound, a timer the caller fires by hand
    pub fn headless() -> Self {
        Self {
            targets: Box::new(NoTargets),
            trigger: Box::new(NoTrigger),
            audio: Box::new(SilentAudio),
            timer: Box::new(ManualTimer::default()),
        }
    }
}

/// A page without shootable elements
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTargets;

impl TargetProvider for NoTargets {
    fn scan(&mut self, _viewport: Viewport) -> Vec<PageTarget> {
        Vec::new()
    }

    fn set_visible(&mut self, _handle: TargetHandle, _visible: bool) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrigger;

impl TriggerControl for NoTrigger {
    fn hide(&mut self) {}
    fn restore(&mut self) {}
}

/// Audio output that discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn open(&mut self, _volume: f32) {}
    fn play(&mut self, _cue: AudioCue) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn close(&mut self) {}
}

/// Timer that only remembers the pending delay
#[derive(Debug, Default, Clone)]
pub struct ManualTimer {
    pending: Option<f64>,
}

impl ManualTimer {
    /// Delay of the pending beat, if any
    pub fn pending_ms(&self) -> Option<f64> {
        self.pending
    }
}

impl RhythmTimer for ManualTimer {
    fn schedule(&mut self, delay_ms: f64) {
        self.pending = Some(delay_ms);
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_timer_replaces_pending() {
        let mut timer = ManualTimer::default();
        assert!(!timer.is_pending());
        timer.schedule(250.0);
        timer.schedule(300.0);
        assert_eq!(timer.pending_ms(), Some(300.0));
        timer.cancel();
        assert!(!timer.is_pending());
    }
}
