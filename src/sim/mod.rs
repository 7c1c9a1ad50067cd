//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied `dt`, clamped to `MAX_FRAME_DT`
//! - Seeded RNG only, and only for cosmetic values
//! - Fixed update order (player → pipes → camera → coins → enemies → boss → goal)
//! - No rendering, audio or platform dependencies; side effects leave as `GameEvent`s

pub mod collision;
pub mod rect;
pub mod rules;
pub mod state;
pub mod tick;

pub use collision::{resolve_body, Landing};
pub use rect::{clamp, Rect};
pub use rules::{classify_contact, Contact, HurtOutcome};
pub use state::{
    Body, Boss, Camera, Coin, Cue, GameEvent, GamePhase, GameState, Goal, Heading, Particle,
    Patrol, PatrolEnemy, Pipe, Player, World,
};
pub use tick::{TickInput, tick};
