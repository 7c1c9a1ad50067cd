//! Simulation context for a host frame loop
//!
//! Owns the `GameState`, the frame clock and the current input snapshot.
//! Each frame it ticks the simulation once, then drains queued events into
//! the HUD and cue sinks. Sinks never feed back into the simulation.

use crate::audio::CueSink;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Particle, TickInput, tick};

/// Receives counter updates whenever they change
pub trait HudSink {
    fn update(&mut self, coins: u32, hearts: u8);
}

/// HUD that writes to the log
#[derive(Debug, Default)]
pub struct LogHud;

impl HudSink for LogHud {
    fn update(&mut self, coins: u32, hearts: u8) {
        log::info!("HUD: coins {coins}, hearts {hearts}");
    }
}

/// Converts host timestamps into frame deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    /// Seconds since the first frame
    pub elapsed: f64,
}

impl FrameClock {
    /// Seconds since the previous call. The first call returns 0; a clock
    /// that runs backwards also yields 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.elapsed += dt;
        dt as f32
    }
}

/// Game instance holding all state
pub struct Game<A: CueSink, H: HudSink> {
    pub state: GameState,
    pub input: TickInput,
    pub settings: Settings,
    clock: FrameClock,
    cues: A,
    hud: H,
}

impl<A: CueSink, H: HudSink> Game<A, H> {
    pub fn new(mut state: GameState, settings: Settings, cues: A, hud: H) -> Self {
        state.set_viewport(settings.viewport_width, settings.viewport_height);
        let mut game = Self {
            state,
            input: TickInput::default(),
            settings,
            clock: FrameClock::default(),
            cues,
            hud,
        };
        // Initial counters are already queued by the level reset
        game.dispatch_events();
        game
    }

    /// Run one frame at host time `now_ms`. Returns the dt fed to the tick.
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = self.clock.advance(now_ms);
        tick(&mut self.state, &self.input, dt);

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.restart = false;

        self.dispatch_events();
        dt
    }

    pub fn press_start(&mut self) {
        self.input.start = true;
    }

    pub fn press_restart(&mut self) {
        self.input.restart = true;
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed
    }

    pub fn cue_sink(&self) -> &A {
        &self.cues
    }

    pub fn hud_sink(&self) -> &H {
        &self.hud
    }

    /// Confetti the renderer should draw, capped by settings
    pub fn visible_particles(&self) -> &[Particle] {
        let n = self.settings.max_particles().min(self.state.particles.len());
        &self.state.particles[..n]
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Cue(cue) => self.cues.cue(cue),
                GameEvent::Hud { coins, hearts } => self.hud.update(coins, hearts),
                GameEvent::PhaseChanged { from, to } => {
                    log::debug!("frame phase change {} -> {}", from.as_str(), to.as_str());
                }
            }
        }
    }
}
