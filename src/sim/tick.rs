//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation by one frame. The update
//! order is fixed: player input and physics, pipe check, camera, coins,
//! enemies, boss zone, boss, goal.

use super::collision::resolve_body;
use super::rules::{self, HurtOutcome};
use super::state::{Cue, GamePhase, GameState};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Enter pipes
    pub down: bool,
    /// Leave the title screen (one-shot)
    pub start: bool,
    /// Rebuild the level and go back to the title screen (one-shot)
    pub restart: bool,
}

/// Advance the game state by `dt` seconds (clamped to `tuning.max_frame_dt`)
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.max(0.0).min(state.tuning.max_frame_dt.max(0.0))
    } else {
        0.0
    };

    if input.restart {
        state.reset_level();
        state.cue(Cue::Restart);
    }

    if input.start && state.phase == GamePhase::Title {
        state.set_phase(GamePhase::Exploring);
        state.cue(Cue::Start);
    }

    // Confetti keeps falling on the win screen
    update_particles(state, dt);

    if !state.phase.is_running() {
        return;
    }

    state.time += f64::from(dt);
    state.pipe_cooldown = (state.pipe_cooldown - dt).max(0.0);

    apply_player_input(state, input, dt);

    let world_width = state.world.width;
    let landing = resolve_body(
        &mut state.player.body,
        &state.world.solids,
        world_width,
        dt,
    );
    state.player.on_ground = landing.grounded;
    debug_assert!(
        state.player.body.pos.x >= 0.0
            && state.player.body.pos.x <= world_width - state.player.body.size.x,
        "player left the world: x = {}",
        state.player.body.pos.x
    );

    rules::try_enter_pipe(state, input.down);

    let center = state.player.body.center();
    state.camera.follow(center, &state.world);

    rules::collect_coins(state);

    if rules::update_enemies(state, dt) == Some(HurtOutcome::LevelReset) {
        return;
    }

    if state.phase == GamePhase::Exploring && state.player.body.pos.x > state.level.boss_zone_x {
        state.set_phase(GamePhase::BossEncounter);
    }

    if rules::update_boss(state, dt) == Some(HurtOutcome::LevelReset) {
        return;
    }

    rules::check_goal(state);
}

fn apply_player_input(state: &mut GameState, input: &TickInput, dt: f32) {
    if step_player(state, input, dt) {
        state.cue(Cue::Jump);
    }
}

/// Accelerate, apply friction and gravity, and jump. Returns true on a jump.
fn step_player(state: &mut GameState, input: &TickInput, dt: f32) -> bool {
    let tuning = &state.tuning;
    let player = &mut state.player;

    let ax = f32::from(u8::from(input.right)) - f32::from(u8::from(input.left));
    player.body.vel.x += ax * tuning.move_accel * dt;
    player.body.vel.x *= if player.on_ground {
        tuning.ground_friction
    } else {
        tuning.air_friction
    };
    if ax != 0.0 {
        player.facing_left = ax < 0.0;
    }

    player.body.vel.y += tuning.gravity * dt;

    let jumped = input.jump && player.on_ground;
    if jumped {
        player.body.vel.y = -tuning.jump_impulse;
        player.on_ground = false;
    }
    jumped
}

fn update_particles(state: &mut GameState, dt: f32) {
    if state.particles.is_empty() {
        return;
    }
    let floor = state.world.ground_y + 600.0;
    for particle in state.particles.iter_mut() {
        particle.vel.y += particle.gravity * dt;
        particle.pos += particle.vel * dt;
        particle.life -= dt;
        particle.spin += dt * 6.0;
    }
    state
        .particles
        .retain(|p| p.life > 0.0 && p.pos.y < floor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::test_level;
    use crate::sim::state::GameEvent;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn playing() -> GameState {
        let mut state = GameState::with_level(test_level(), Tuning::default(), 9);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            DT,
        );
        state.drain_events();
        state
    }

    fn run(state: &mut GameState, input: TickInput, ticks: usize) {
        for _ in 0..ticks {
            tick(state, &input, DT);
        }
    }

    #[test]
    fn test_title_is_frozen() {
        let mut state = GameState::with_level(test_level(), Tuning::default(), 9);
        let pos = state.player.body.pos;
        let worm_x = state.enemies[0].body.pos.x;

        run(
            &mut state,
            TickInput {
                right: true,
                ..Default::default()
            },
            30,
        );

        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.player.body.pos, pos);
        assert_eq!(state.enemies[0].body.pos.x, worm_x);
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_start_leaves_title() {
        let mut state = GameState::with_level(test_level(), Tuning::default(), 9);
        state.drain_events();
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.phase, GamePhase::Exploring);
        let events = state.drain_events();
        assert_eq!(
            events[0],
            GameEvent::PhaseChanged {
                from: GamePhase::Title,
                to: GamePhase::Exploring
            }
        );
        assert!(events.contains(&GameEvent::Cue(Cue::Start)));
    }

    #[test]
    fn test_player_settles_on_ground() {
        let mut state = playing();
        run(&mut state, TickInput::default(), 10);
        assert!(state.player.on_ground);
        assert_eq!(state.player.body.bottom(), 700.0);
    }

    #[test]
    fn test_walk_right_and_face() {
        let mut state = playing();
        let x = state.player.body.pos.x;
        run(
            &mut state,
            TickInput {
                right: true,
                ..Default::default()
            },
            20,
        );
        assert!(state.player.body.pos.x > x);
        assert!(!state.player.facing_left);

        run(
            &mut state,
            TickInput {
                left: true,
                ..Default::default()
            },
            1,
        );
        assert!(state.player.facing_left);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut state = playing();
        run(&mut state, TickInput::default(), 5);
        state.drain_events();

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, DT);
        assert!(state.player.body.vel.y < 0.0);
        assert!(!state.player.on_ground);
        assert!(state.drain_events().contains(&GameEvent::Cue(Cue::Jump)));

        // Holding jump in the air does nothing more
        tick(&mut state, &jump, DT);
        assert!(!state.drain_events().contains(&GameEvent::Cue(Cue::Jump)));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = playing();
        let before = state.time;
        tick(&mut state, &TickInput::default(), 5.0);
        let step = state.time - before;
        assert!((step - f64::from(state.tuning.max_frame_dt)).abs() < 1e-9);

        let before = state.time;
        tick(&mut state, &TickInput::default(), -1.0);
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.time, before);
    }

    #[test]
    fn test_bad_frame_cap_does_not_panic() {
        let mut state = playing();
        state.tuning.max_frame_dt = -0.01;
        let before = state.time;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time, before);

        state.tuning.max_frame_dt = f32::NAN;
        tick(&mut state, &TickInput::default(), DT);
    }

    #[test]
    fn test_stomp_through_tick() {
        let mut state = playing();
        let worm = state.enemies[0].body.rect();
        // Bottom 5 units into the worm's top after this tick's fall
        state.player.body.pos = Vec2::new(worm.x + 10.0, worm.y - 52.0);
        state.player.body.vel = Vec2::new(0.0, 260.0);

        tick(&mut state, &TickInput::default(), DT);

        assert!(!state.enemies[0].alive);
        assert_eq!(state.hearts, 3);
        assert!(state.player.body.vel.y < 0.0);
    }

    #[test]
    fn test_fast_landing_on_worm_is_a_stomp() {
        // Built-in level: dropping from a high ledge reaches ~1500 u/s, more
        // than the tolerance per frame at 60 fps
        let mut state = GameState::new(9);
        state.set_phase(GamePhase::Exploring);
        let worm = state.enemies[0].body.rect();
        state.player.body.pos = Vec2::new(worm.x + 10.0, worm.y - 1.0 - 52.0);
        state.player.body.vel = Vec2::new(0.0, 1500.0);

        tick(&mut state, &TickInput::default(), DT);

        assert!(!state.enemies[0].alive);
        assert_eq!(state.hearts, 3);
        assert!(state.player.body.vel.y < 0.0);
    }

    #[test]
    fn test_side_hit_through_tick() {
        let mut state = playing();
        run(&mut state, TickInput::default(), 5);
        let worm = state.enemies[0].body.rect();
        state.player.body.pos.x = worm.x;

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.enemies[0].alive);
        assert_eq!(state.hearts, 2);
        assert_eq!(state.player.body.pos, state.spawn_point());
    }

    #[test]
    fn test_heart_exhaustion_resets_everything() {
        let mut state = playing();
        run(&mut state, TickInput::default(), 5);
        state.hearts = 1;
        rules::take_coin(&mut state, 1);
        state.boss.hp = 3;
        state.goal.active = true;
        state.pipe_cooldown = 0.2;
        let worm = state.enemies[0].body.rect();
        state.player.body.pos.x = worm.x;
        state.drain_events();

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.hearts, 3);
        assert_eq!(state.coin_count, 0);
        assert!(state.coins.iter().all(|c| !c.taken));
        assert!(state.enemies.iter().all(|e| e.alive));
        assert_eq!(state.boss.hp, 6);
        assert!(state.boss.alive);
        assert!(!state.goal.active);
        assert!(!state.goal.reached);
        assert_eq!(state.player.body.pos, state.spawn_point());
        assert_eq!(state.time, 0.0);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(Cue::Hurt)));
        assert_eq!(
            events.last(),
            Some(&GameEvent::Hud {
                coins: 0,
                hearts: 3
            })
        );
    }

    #[test]
    fn test_enters_boss_encounter_past_threshold() {
        let mut state = playing();
        // Inside the zone but clear of the boss
        state.player.body.pos = Vec2::new(1310.0, 648.0);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::BossEncounter);

        // Walking back out does not leave the encounter
        state.player.body.pos = Vec2::new(800.0, 648.0);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::BossEncounter);
    }

    #[test]
    fn test_boss_frozen_before_encounter() {
        let mut state = playing();
        let x = state.boss.body.pos.x;
        run(&mut state, TickInput::default(), 30);
        assert_eq!(state.boss.body.pos.x, x);
    }

    #[test]
    fn test_pipe_teleport_through_tick() {
        let mut state = playing();
        let pipe = state.pipes[0].rect;
        let target = state.pipes[0].target.unwrap();
        state.player.body.pos = Vec2::new(pipe.x + 24.0, pipe.y - 52.0);
        state.player.body.vel = Vec2::ZERO;
        state.player.on_ground = true;

        let down = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &down, DT);

        assert_eq!(state.player.body.pos, Vec2::new(target.x, target.y - 52.0));
        assert_eq!(state.player.body.vel, Vec2::ZERO);

        // Still holding down on the linked pipe: no ping-pong while the cooldown runs
        tick(&mut state, &down, DT);
        assert_eq!(state.player.body.pos.x, target.x);
    }

    #[test]
    fn test_goal_ignored_while_locked() {
        let mut state = playing();
        let goal = state.goal.rect;
        state.set_phase(GamePhase::BossEncounter);
        state.player.body.pos = Vec2::new(goal.x + 10.0, goal.bottom() - 52.0);
        run(&mut state, TickInput::default(), 3);

        assert!(!state.goal.reached);
        assert_eq!(state.phase, GamePhase::BossEncounter);
    }

    #[test]
    fn test_win_stops_simulation() {
        let mut state = playing();
        state.set_phase(GamePhase::BossEncounter);
        state.boss.alive = false;
        state.goal.active = true;
        let goal = state.goal.rect;
        state.player.body.pos = Vec2::new(goal.x + 10.0, goal.bottom() - 52.0);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.goal.reached);
        assert!(!state.particles.is_empty());

        let pos = state.player.body.pos;
        let time = state.time;
        let confetti = state.particles[0].pos;
        run(
            &mut state,
            TickInput {
                right: true,
                start: true,
                ..Default::default()
            },
            10,
        );
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.player.body.pos, pos);
        assert_eq!(state.time, time);
        // Cosmetics still animate
        assert_ne!(state.particles[0].pos, confetti);
    }

    #[test]
    fn test_restart_then_start_plays_again() {
        let mut state = playing();
        state.set_phase(GamePhase::Won);
        state.coin_count = 5;

        tick(
            &mut state,
            &TickInput {
                restart: true,
                start: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(state.phase, GamePhase::Exploring);
        assert_eq!(state.coin_count, 0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(Cue::Restart)));
        assert!(events.contains(&GameEvent::Cue(Cue::Start)));
    }

    #[test]
    fn test_full_run_on_builtin_level_is_deterministic() {
        let script = |i: usize| TickInput {
            right: i % 90 < 70,
            jump: i % 45 == 0,
            start: i == 0,
            ..Default::default()
        };
        let mut a = GameState::new(3);
        let mut b = GameState::new(3);
        for i in 0..600 {
            tick(&mut a, &script(i), DT);
            tick(&mut b, &script(i), DT);
        }
        assert_eq!(a.player.body.pos, b.player.body.pos);
        assert_eq!(a.coin_count, b.coin_count);
        assert_eq!(a.hearts, b.hearts);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.drain_events(), b.drain_events());
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            inputs in proptest::collection::vec(
                (any::<bool>(), any::<bool>(), any::<bool>()),
                1..200,
            ),
            dt in 0.001f32..0.05,
        ) {
            let mut state = playing();
            for (left, right, jump) in inputs {
                let input = TickInput { left, right, jump, ..Default::default() };
                tick(&mut state, &input, dt);
                let x = state.player.body.pos.x;
                prop_assert!(x >= 0.0);
                prop_assert!(x <= state.world.width - state.player.body.size.x);
                prop_assert!(state.hearts <= state.tuning.starting_hearts);
            }
        }
    }
}
