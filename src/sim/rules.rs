//! Interaction rules between the player and everything else
//!
//! Stomp-vs-hurt adjudication, coin pickup, pipe teleport, boss defeat and
//! the goal latch. Each rule mutates `GameState` directly and reports what
//! happened through queued events.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Body, Cue, GamePhase, GameState, Player};
use crate::tuning::StompRule;

/// How an overlap between the player and a hostile is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player lands on the target and damages it
    Stomp,
    /// Target damages the player
    Hurt,
}

/// Result of the player taking damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HurtOutcome {
    /// Hearts remain; player is back at spawn
    Respawned,
    /// Last heart lost; the whole level was rebuilt and sent to the title
    LevelReset,
}

/// Classify a player/target contact.
///
/// A stomp needs the player falling faster than `rule.min_fall_speed` with
/// its bottom less than `rule.tolerance` below the target's top. A bottom
/// above the top (negative depth) always qualifies.
pub fn classify_contact(player: &Body, target: &Rect, rule: &StompRule, dt: f32) -> Contact {
    let bottom = if rule.from_previous_bottom {
        player.bottom() - player.vel.y * dt
    } else {
        player.bottom()
    };
    let depth = bottom - target.y;

    if player.vel.y > rule.min_fall_speed && depth < rule.tolerance {
        Contact::Stomp
    } else {
        Contact::Hurt
    }
}

/// Launch the player off a stomped target's top
fn bounce(player: &mut Player, target_top: f32, rule: &StompRule, jump_impulse: f32) {
    player.body.vel.y = -jump_impulse * rule.bounce;
    player.body.pos.y = target_top - player.body.size.y - 1.0;
    player.on_ground = false;
}

/// Take one heart. Respawns the player, or resets the level on the last heart.
pub fn hurt(state: &mut GameState) -> HurtOutcome {
    state.hearts = state.hearts.saturating_sub(1);
    state.cue(Cue::Hurt);
    state.emit_hud();

    if state.hearts == 0 {
        log::info!("Out of hearts, resetting level");
        state.reset_level();
        return HurtOutcome::LevelReset;
    }

    state.respawn_player();
    HurtOutcome::Respawned
}

/// Mark coin `index` as taken. Returns false if it already was (or doesn't exist).
pub fn take_coin(state: &mut GameState, index: usize) -> bool {
    let Some(coin) = state.coins.get_mut(index) else {
        return false;
    };
    if coin.taken {
        return false;
    }
    coin.taken = true;
    state.coin_count += 1;
    state.cue(Cue::Coin);
    state.emit_hud();
    true
}

/// Collect every untaken coin within pickup range of the player's center
pub fn collect_coins(state: &mut GameState) -> u32 {
    let center = state.player.body.center();
    let radius_sq = state.tuning.coin_pickup_radius * state.tuning.coin_pickup_radius;

    let mut collected = 0;
    for i in 0..state.coins.len() {
        let coin = &state.coins[i];
        if coin.taken || coin.pos.distance_squared(center) >= radius_sq {
            continue;
        }
        if take_coin(state, i) {
            collected += 1;
        }
    }
    collected
}

/// Teleport through an enterable pipe the player is standing on while
/// holding down. Returns true on teleport.
pub fn try_enter_pipe(state: &mut GameState, down: bool) -> bool {
    if !down || state.pipe_cooldown > 0.0 {
        return false;
    }

    let body = &state.player.body;
    let feet = body.bottom();
    let mid = body.center().x;
    let tolerance = state.tuning.pipe_snap_tolerance;

    let target = state
        .pipes
        .iter()
        .filter(|p| p.enterable)
        .find(|p| (feet - p.rect.y).abs() < tolerance && p.rect.spans_x(mid))
        .and_then(|p| p.target.map(|t| (p.id, t)));

    let Some((pipe_id, target)) = target else {
        return false;
    };

    let player = &mut state.player;
    player.body.pos = Vec2::new(target.x, target.y - player.body.size.y);
    player.body.vel = Vec2::ZERO;
    state.pipe_cooldown = state.tuning.pipe_cooldown;
    log::debug!("Pipe {} -> ({}, {})", pipe_id, target.x, target.y);
    state.cue(Cue::Teleport);
    true
}

/// Patrol living enemies and resolve their contacts with the player.
/// Returns the last hurt outcome, if the player was hurt.
pub fn update_enemies(state: &mut GameState, dt: f32) -> Option<HurtOutcome> {
    let rule = state.tuning.enemy_stomp;
    let mut outcome = None;

    for i in 0..state.enemies.len() {
        let enemy = &mut state.enemies[i];
        if !enemy.alive {
            continue;
        }
        enemy.patrol.step(&mut enemy.body.pos.x, dt);

        let target = enemy.body.rect();
        if !state.player.body.rect().overlaps(&target) {
            continue;
        }

        match classify_contact(&state.player.body, &target, &rule, dt) {
            Contact::Stomp => {
                state.enemies[i].alive = false;
                bounce(&mut state.player, target.y, &rule, state.tuning.jump_impulse);
                state.cue(Cue::StompEnemy);
            }
            Contact::Hurt => {
                let result = hurt(state);
                outcome = Some(result);
                if result == HurtOutcome::LevelReset {
                    break;
                }
            }
        }
    }

    outcome
}

/// Run the boss during the encounter: stun countdown, patrol, contact.
pub fn update_boss(state: &mut GameState, dt: f32) -> Option<HurtOutcome> {
    if state.phase != GamePhase::BossEncounter || !state.boss.alive {
        return None;
    }

    let boss = &mut state.boss;
    if boss.stun_timer > 0.0 {
        boss.stun_timer = (boss.stun_timer - dt).max(0.0);
    } else {
        boss.patrol.step(&mut boss.body.pos.x, dt);
    }

    let target = state.boss.body.rect();
    if !state.player.body.rect().overlaps(&target) {
        return None;
    }

    let rule = state.tuning.boss_stomp;
    match classify_contact(&state.player.body, &target, &rule, dt) {
        Contact::Stomp => {
            stomp_boss(state, target.y);
            None
        }
        Contact::Hurt => Some(hurt(state)),
    }
}

fn stomp_boss(state: &mut GameState, boss_top: f32) {
    let rule = state.tuning.boss_stomp;
    state.boss.hp = state.boss.hp.saturating_sub(1);
    state.boss.stun_timer = rule.stun;
    bounce(&mut state.player, boss_top, &rule, state.tuning.jump_impulse);
    state.cue(Cue::StompBoss);

    if state.boss.hp == 0 {
        defeat_boss(state);
    }
}

/// The only way the goal becomes active
fn defeat_boss(state: &mut GameState) {
    state.boss.alive = false;
    state.goal.active = true;
    log::info!("Boss defeated, goal unlocked");
    state.cue(Cue::BossDefeated);
}

/// Latch the goal on first touch once it is active. Returns true on win.
pub fn check_goal(state: &mut GameState) -> bool {
    let goal = &state.goal;
    if !goal.active || goal.reached || !state.player.body.rect().overlaps(&goal.rect) {
        return false;
    }

    state.goal.reached = true;
    let rect = state.goal.rect;
    state.set_phase(GamePhase::Won);
    log::info!(
        "Goal reached with {} coins in {:.1}s",
        state.coin_count,
        state.time
    );
    state.cue(Cue::Win);
    let count = state.tuning.confetti_count;
    state.spawn_confetti(Vec2::new(rect.x + rect.w / 2.0, rect.y + 30.0), count);
    true
}
