//! Cue sink for sound effects
//!
//! Procedurally described beeps - no sound files needed. Each simulation
//! `Cue` maps to a short tone sequence; a `ToneBackend` turns tones into
//! actual sound (or, natively, log lines).

use crate::settings::Settings;
use crate::sim::Cue;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Triangle,
}

/// A single beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub freq: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Base gain before master/sfx volume
    pub volume: f32,
}

const fn square(freq: f32, duration: f32, volume: f32) -> Tone {
    Tone {
        freq,
        duration,
        waveform: Waveform::Square,
        volume,
    }
}

const START: [Tone; 1] = [square(740.0, 0.06, 0.05)];
const RESTART: [Tone; 1] = [square(320.0, 0.06, 0.05)];
const JUMP: [Tone; 1] = [square(880.0, 0.05, 0.05)];
const COIN: [Tone; 1] = [square(1180.0, 0.04, 0.04)];
const HURT: [Tone; 1] = [square(170.0, 0.14, 0.06)];
const STOMP: [Tone; 1] = [Tone {
    freq: 1040.0,
    duration: 0.06,
    waveform: Waveform::Triangle,
    volume: 0.05,
}];
const BOSS_DEFEATED: [Tone; 3] = [
    square(520.0, 0.08, 0.05),
    square(660.0, 0.08, 0.05),
    square(820.0, 0.08, 0.05),
];
const TELEPORT: [Tone; 1] = [square(240.0, 0.07, 0.05)];
const WIN: [Tone; 3] = [
    square(880.0, 0.07, 0.05),
    square(1040.0, 0.07, 0.05),
    square(1320.0, 0.07, 0.05),
];

/// Tone sequence for a cue
pub fn tones_for(cue: Cue) -> &'static [Tone] {
    match cue {
        Cue::Start => &START,
        Cue::Restart => &RESTART,
        Cue::Jump => &JUMP,
        Cue::Coin => &COIN,
        Cue::Hurt => &HURT,
        Cue::StompEnemy | Cue::StompBoss => &STOMP,
        Cue::BossDefeated => &BOSS_DEFEATED,
        Cue::Teleport => &TELEPORT,
        Cue::Win => &WIN,
    }
}

/// Receives cues from the simulation. Delivery is best-effort.
pub trait CueSink {
    fn cue(&mut self, cue: Cue);
}

/// Something that can make a tone audible
pub trait ToneBackend {
    fn play_tone(&mut self, tone: Tone, gain: f32);
}

/// Native backend: no audio device, tones go to the log
#[derive(Debug, Default)]
pub struct LogBackend;

impl ToneBackend for LogBackend {
    fn play_tone(&mut self, tone: Tone, gain: f32) {
        log::debug!(
            "beep {:.0}Hz {:.0}ms {:?} gain {:.3}",
            tone.freq,
            tone.duration * 1000.0,
            tone.waveform,
            gain
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<B: ToneBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: ToneBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(backend: B, settings: &Settings) -> Self {
        let mut audio = Self::new(backend);
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(!settings.sfx);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Play the tones for a cue
    pub fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        for tone in tones_for(cue) {
            self.backend.play_tone(*tone, tone.volume * vol);
        }
    }
}

impl<B: ToneBackend> CueSink for AudioManager<B> {
    fn cue(&mut self, cue: Cue) {
        self.play(cue);
    }
}
