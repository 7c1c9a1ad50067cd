//! Data-driven game balance
//!
//! Physics and combat constants. Defaults reproduce the shipped feel;
//! JSON overrides only need the fields they change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {what}")]
    Invalid { what: String },
}

fn invalid(what: impl Into<String>) -> TuningError {
    TuningError::Invalid { what: what.into() }
}

// Both reject NaN
fn positive(v: f32) -> bool {
    v > 0.0
}

fn non_negative(v: f32) -> bool {
    v >= 0.0
}

/// How a falling contact is told apart from a side hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StompRule {
    /// Player `vy` must exceed this (positive is down)
    pub min_fall_speed: f32,
    /// Max depth of the player's bottom below the target's top
    pub tolerance: f32,
    /// Measure depth from where the bottom was before this tick's fall
    pub from_previous_bottom: bool,
    /// Bounce velocity as a fraction of the jump impulse
    pub bounce: f32,
    /// Recovery window applied to the target (boss only)
    pub stun: f32,
}

impl StompRule {
    /// Worms: generous window, so a fast landing still counts when
    /// the previous bottom was at or just below the top
    pub const ENEMY: Self = Self {
        min_fall_speed: 120.0,
        tolerance: 22.0,
        from_previous_bottom: true,
        bounce: 0.70,
        stun: 0.0,
    };

    /// Boss: any downward motion, judged from the previous tick's bottom
    pub const BOSS: Self = Self {
        min_fall_speed: 0.0,
        tolerance: 10.0,
        from_previous_bottom: true,
        bounce: 0.62,
        stun: 0.45,
    };
}

impl Default for StompRule {
    fn default() -> Self {
        Self::ENEMY
    }
}

/// Physics and combat constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub move_accel: f32,
    pub jump_impulse: f32,
    /// Per-tick horizontal velocity multiplier on the ground
    pub ground_friction: f32,
    /// Per-tick horizontal velocity multiplier in the air
    pub air_friction: f32,
    pub coin_pickup_radius: f32,
    /// How close the player's feet must be to a pipe top to enter it
    pub pipe_snap_tolerance: f32,
    /// Seconds after a teleport before any pipe can trigger again (0 disables)
    pub pipe_cooldown: f32,
    pub max_frame_dt: f32,
    pub starting_hearts: u8,
    pub enemy_stomp: StompRule,
    pub boss_stomp: StompRule,
    /// Particles in the win burst
    pub confetti_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_accel: MOVE_ACCEL,
            jump_impulse: JUMP_IMPULSE,
            ground_friction: GROUND_FRICTION,
            air_friction: AIR_FRICTION,
            coin_pickup_radius: COIN_PICKUP_RADIUS,
            pipe_snap_tolerance: 3.0,
            pipe_cooldown: 0.25,
            max_frame_dt: MAX_FRAME_DT,
            starting_hearts: STARTING_HEARTS,
            enemy_stomp: StompRule::ENEMY,
            boss_stomp: StompRule::BOSS,
            confetti_count: 140,
        }
    }
}

impl Tuning {
    /// Parse and validate overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the tick cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !positive(self.max_frame_dt) {
            return Err(invalid("max_frame_dt must be positive"));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.ground_friction) || !unit.contains(&self.air_friction) {
            return Err(invalid("friction must be within [0, 1]"));
        }
        let forces = [self.gravity, self.move_accel];
        if !positive(self.jump_impulse) || !forces.into_iter().all(non_negative) {
            return Err(invalid("gravity, jump and acceleration must be non-negative"));
        }
        if self.starting_hearts == 0 {
            return Err(invalid("starting_hearts must be at least 1"));
        }
        let margins = [self.coin_pickup_radius, self.pipe_snap_tolerance, self.pipe_cooldown];
        if !margins.into_iter().all(non_negative) {
            return Err(invalid("radii, tolerances and cooldowns must be non-negative"));
        }
        let rules = [("enemy_stomp", &self.enemy_stomp), ("boss_stomp", &self.boss_stomp)];
        for (name, rule) in rules {
            if ![rule.tolerance, rule.bounce, rule.stun].into_iter().all(non_negative) {
                return Err(invalid(format!("{name} has a negative field")));
            }
        }
        Ok(())
    }
}
