//! Procedural sound cues
//!
//! Every cue is described as a list of `Tone`s (waveform plus frequency and
//! gain automation, offsets in seconds from "now"). The Web Audio backend
//! replays those descriptions; nothing here needs sound files.

use crate::tuning::Tuning;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sawtooth,
}

/// One scheduled change of an audio parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Automation {
    /// Jump to `value` at `at`
    Set { value: f32, at: f64 },
    /// Ramp linearly, arriving at `value` at `at`
    LinearTo { value: f32, at: f64 },
    /// Ramp exponentially, arriving at `value` at `at`
    ExponentialTo { value: f32, at: f64 },
}

impl Automation {
    pub fn value(&self) -> f32 {
        match *self {
            Automation::Set { value, .. }
            | Automation::LinearTo { value, .. }
            | Automation::ExponentialTo { value, .. } => value,
        }
    }

    pub fn at(&self) -> f64 {
        match *self {
            Automation::Set { at, .. }
            | Automation::LinearTo { at, .. }
            | Automation::ExponentialTo { at, .. } => at,
        }
    }
}

/// A single oscillator voice
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start: f64,
    pub stop: f64,
    pub frequency: Vec<Automation>,
    pub gain: Vec<Automation>,
}

/// Sound cues the game plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Ascending arpeggio when a session starts
    ReadyArpeggio,
    /// Player fired
    Shoot,
    /// Enemy or page element destroyed
    Explosion,
    /// Long descending tone when the player dies
    GameOver,
    /// One beat of the background rhythm
    RhythmNote { high: bool },
}

/// C4 E4 G4 C5 E5 G5 C6
const ARPEGGIO: [f32; 7] = [262.0, 330.0, 392.0, 523.0, 659.0, 784.0, 1047.0];
const ARPEGGIO_NOTE: f64 = 0.12;
const ARPEGGIO_GAP: f64 = 0.02;

/// E2
const RHYTHM_LOW_HZ: f32 = 82.41;

impl AudioCue {
    /// Voices that make up this cue
    pub fn tones(self) -> Vec<Tone> {
        match self {
            AudioCue::ReadyArpeggio => ARPEGGIO
                .iter()
                .enumerate()
                .map(|(i, &freq)| {
                    let start = i as f64 * (ARPEGGIO_NOTE + ARPEGGIO_GAP);
                    let stop = start + ARPEGGIO_NOTE;
                    Tone {
                        waveform: Waveform::Square,
                        start,
                        stop,
                        frequency: vec![Automation::Set { value: freq, at: 0.0 }],
                        gain: vec![
                            Automation::Set { value: 0.0, at: start },
                            Automation::LinearTo {
                                value: 0.15,
                                at: start + 0.01,
                            },
                            Automation::Set {
                                value: 0.15,
                                at: stop - 0.03,
                            },
                            Automation::LinearTo { value: 0.0, at: stop },
                        ],
                    }
                })
                .collect(),
            AudioCue::Shoot => vec![sweep(Waveform::Square, 880.0, 110.0, 0.15, 0.1)],
            AudioCue::Explosion => vec![sweep(Waveform::Sawtooth, 150.0, 30.0, 0.2, 0.2)],
            AudioCue::GameOver => vec![Tone {
                waveform: Waveform::Square,
                start: 0.0,
                stop: 1.5,
                frequency: vec![
                    Automation::Set {
                        value: 1200.0,
                        at: 0.0,
                    },
                    Automation::ExponentialTo {
                        value: 40.0,
                        at: 1.5,
                    },
                ],
                // Plateau, then fall away over the last 0.3s
                gain: vec![
                    Automation::Set { value: 0.2, at: 0.0 },
                    Automation::Set { value: 0.2, at: 1.2 },
                    Automation::ExponentialTo {
                        value: 0.01,
                        at: 1.5,
                    },
                ],
            }],
            AudioCue::RhythmNote { high } => {
                let freq = if high {
                    RHYTHM_LOW_HZ * 2f32.powf(1.0 / 12.0)
                } else {
                    RHYTHM_LOW_HZ
                };
                vec![Tone {
                    waveform: Waveform::Square,
                    start: 0.0,
                    stop: 0.08,
                    frequency: vec![Automation::Set { value: freq, at: 0.0 }],
                    gain: vec![
                        Automation::Set { value: 0.1, at: 0.0 },
                        Automation::ExponentialTo {
                            value: 0.01,
                            at: 0.08,
                        },
                    ],
                }]
            }
        }
    }
}

/// Exponential pitch sweep with a matching exponential decay
fn sweep(waveform: Waveform, from_hz: f32, to_hz: f32, gain: f32, secs: f64) -> Tone {
    Tone {
        waveform,
        start: 0.0,
        stop: secs,
        frequency: vec![
            Automation::Set {
                value: from_hz,
                at: 0.0,
            },
            Automation::ExponentialTo {
                value: to_hz,
                at: secs,
            },
        ],
        gain: vec![
            Automation::Set {
                value: gain,
                at: 0.0,
            },
            Automation::ExponentialTo {
                value: 0.01,
                at: secs,
            },
        ],
    }
}

/// Background beat: alternates two pitches a semitone apart, tempo set by
/// level and how much of the grid is still alive
#[derive(Debug, Clone, Default)]
pub struct Rhythm {
    high: bool,
}

impl Rhythm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start again from the low note
    pub fn reset(&mut self) {
        self.high = false;
    }

    /// Cue for the next beat; flips the pitch for the one after
    pub fn next_note(&mut self) -> AudioCue {
        let cue = AudioCue::RhythmNote { high: self.high };
        self.high = !self.high;
        cue
    }

    /// Milliseconds until the next beat
    pub fn interval_ms(tuning: &Tuning, level: u32, alive: usize, total: usize) -> f64 {
        let total = total.max(1) as f64;
        let level_factor = 1.0 - level.saturating_sub(1) as f64 * 0.1;
        let enemy_factor = 1.0 - (alive as f64 / total) * 0.5;
        (tuning.rhythm_base_interval_ms * level_factor * enemy_factor)
            .max(tuning.rhythm_min_interval_ms)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioParam, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, Automation, Tone, Waveform};
    use crate::platform::AudioSink;

    impl From<Waveform> for OscillatorType {
        fn from(w: Waveform) -> Self {
            match w {
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            }
        }
    }

    /// Web Audio playback; a fresh context per session
    #[derive(Default)]
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self::default()
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(
            ctx: &AudioContext,
            waveform: Waveform,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(waveform.into());
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn automate(param: &AudioParam, steps: &[Automation], t: f64, scale: f32) {
            for step in steps {
                match *step {
                    Automation::Set { value, at } => {
                        param.set_value_at_time(value * scale, t + at).ok();
                    }
                    Automation::LinearTo { value, at } => {
                        param.linear_ramp_to_value_at_time(value * scale, t + at).ok();
                    }
                    Automation::ExponentialTo { value, at } => {
                        param
                            .exponential_ramp_to_value_at_time(value * scale, t + at)
                            .ok();
                    }
                }
            }
        }

        fn schedule(&self, ctx: &AudioContext, tone: &Tone, t: f64) {
            let Some((osc, gain)) = Self::create_osc(ctx, tone.waveform) else {
                return;
            };
            Self::automate(&osc.frequency(), &tone.frequency, t, 1.0);
            Self::automate(&gain.gain(), &tone.gain, t, self.volume);
            osc.start_with_when(t + tone.start).ok();
            osc.stop_with_when(t + tone.stop).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn open(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
            if self.ctx.is_some() {
                return;
            }
            // May fail outside a secure context or without audio support
            self.ctx = AudioContext::new().ok();
            if self.ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
        }

        fn play(&mut self, cue: AudioCue) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let t = ctx.current_time();
            for tone in cue.tones() {
                self.schedule(ctx, &tone, t);
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn close(&mut self) {
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
            }
        }
    }
}
