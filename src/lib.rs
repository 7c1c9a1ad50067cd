//! Star Portal - a cozy side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, interactions, game state)
//! - `tuning`: Data-driven physics and combat constants
//! - `level`: Level fixtures (built-in level + JSON loading)
//! - `settings`: Presentation preferences
//! - `audio`: Cue sink mapping simulation cues to tones
//! - `driver`: Frame clock and event draining for a host loop

pub mod audio;
pub mod driver;
pub mod level;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::Game;
pub use level::{LevelData, LevelError};
pub use settings::{Settings, SettingsError};
pub use tuning::{StompRule, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Largest step the simulation will take in one tick (seconds).
    /// Longer frames (tab in background, debugger pause) are clamped to this.
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// World dimensions for the built-in level
    pub const WORLD_WIDTH: f32 = 6200.0;
    pub const WORLD_HEIGHT: f32 = 1400.0;
    pub const GROUND_Y: f32 = 1060.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 52.0;
    pub const PLAYER_SPAWN_X: f32 = 220.0;

    /// Physics defaults (world units / s, s²)
    pub const GRAVITY: f32 = 2400.0;
    pub const MOVE_ACCEL: f32 = 780.0;
    pub const JUMP_IMPULSE: f32 = 980.0;
    /// Per-tick velocity multipliers
    pub const GROUND_FRICTION: f32 = 0.84;
    pub const AIR_FRICTION: f32 = 0.93;

    /// Lives and boss
    pub const STARTING_HEARTS: u8 = 3;
    pub const BOSS_HP: u8 = 6;

    /// Collection radius around the player center
    pub const COIN_PICKUP_RADIUS: f32 = 30.0;

    /// Default viewport used for camera clamping
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Hard cap on live confetti particles
    pub const MAX_PARTICLES: usize = 512;
}
