//! Game state and core simulation types
//!
//! Everything the update step mutates lives on `GameState`. The renderer
//! only reads it, and every side effect meant for the outside world
//! (sounds, HUD refreshes, phase changes) is queued as a `GameEvent`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::{Rect, clamp};
use crate::consts::*;
use crate::level::LevelData;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen; entities exist but are not updated
    Title,
    /// Simulation running, goal locked
    Exploring,
    /// Player has crossed into the boss arena; boss AI is live
    BossEncounter,
    /// Goal reached. Terminal until a restart
    Won,
}

impl GamePhase {
    /// Whether the simulation advances in this phase
    pub fn is_running(self) -> bool {
        matches!(self, GamePhase::Exploring | GamePhase::BossEncounter)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Title => "title",
            GamePhase::Exploring => "exploring",
            GamePhase::BossEncounter => "boss-encounter",
            GamePhase::Won => "won",
        }
    }
}

/// Fire-and-forget feedback for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Start,
    Restart,
    Jump,
    Coin,
    Hurt,
    StompEnemy,
    StompBoss,
    BossDefeated,
    Teleport,
    Win,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Start => "start",
            Cue::Restart => "restart",
            Cue::Jump => "jump",
            Cue::Coin => "coin",
            Cue::Hurt => "hurt",
            Cue::StompEnemy => "stomp-enemy",
            Cue::StompBoss => "stomp-boss",
            Cue::BossDefeated => "boss-defeated",
            Cue::Teleport => "teleport",
            Cue::Win => "win",
        }
    }
}

/// Discrete records produced by a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Sound/visual feedback
    Cue(Cue),
    /// Coin or heart counter changed
    Hud { coins: u32, hearts: u8 },
    /// State machine transition
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Horizontal patrol direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    Left,
    #[default]
    Right,
}

impl Heading {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }
}

/// Position, size and velocity shared by every moving entity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// The player character. Never destroyed, only respawned.
#[derive(Debug, Clone, Default)]
pub struct Player {
    pub body: Body,
    pub on_ground: bool,
    pub facing_left: bool,
}

impl Player {
    pub fn spawn(pos: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::new(pos, size),
            on_ground: false,
            facing_left: false,
        }
    }
}

/// Back-and-forth movement between two x bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub heading: Heading,
    pub speed: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl Patrol {
    /// Move `x` along the heading and turn around at either bound
    pub fn step(&mut self, x: &mut f32, dt: f32) {
        *x += self.heading.sign() * self.speed * dt;
        if *x < self.min_x {
            *x = self.min_x;
            self.heading = Heading::Right;
        }
        if *x > self.max_x {
            *x = self.max_x;
            self.heading = Heading::Left;
        }
    }
}

/// A stompable walker (worm)
#[derive(Debug, Clone)]
pub struct PatrolEnemy {
    pub id: u32,
    pub body: Body,
    pub patrol: Patrol,
    /// Dead enemies stay in storage; physics and rendering skip them
    pub alive: bool,
}

/// The level boss. Takes one point of damage per stomp.
#[derive(Debug, Clone)]
pub struct Boss {
    pub body: Body,
    pub hp: u8,
    pub max_hp: u8,
    pub alive: bool,
    /// Seconds left before patrolling resumes after a stomp
    pub stun_timer: f32,
    pub patrol: Patrol,
}

/// A one-shot collectible
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub taken: bool,
    /// Bob animation offset (cosmetic)
    pub phase: f32,
}

/// A solid pipe that may double as a teleporter
#[derive(Debug, Clone)]
pub struct Pipe {
    pub id: u32,
    pub rect: Rect,
    pub enterable: bool,
    /// Where the player's feet land after entering
    pub target: Option<Vec2>,
}

/// Level exit. Inert until the boss falls.
#[derive(Debug, Clone)]
pub struct Goal {
    pub rect: Rect,
    pub active: bool,
    pub reached: bool,
}

/// Static world bounds and collision geometry
#[derive(Debug, Clone)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub platforms: Vec<Rect>,
    /// Platforms followed by pipe bodies, in that order
    pub solids: Vec<Rect>,
}

impl World {
    pub fn from_level(level: &LevelData) -> Self {
        let platforms = level.platforms.clone();
        let solids = platforms
            .iter()
            .copied()
            .chain(level.pipes.iter().map(|p| p.rect))
            .collect();
        Self {
            width: level.world.width,
            height: level.world.height,
            ground_y: level.world.ground_y,
            platforms,
            solids,
        }
    }
}

/// Viewport offset for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        }
    }
}

impl Camera {
    /// Center on `target`, slightly below middle vertically, without
    /// showing anything outside the world
    pub fn follow(&mut self, target: Vec2, world: &World) {
        let max_x = (world.width - self.viewport.x).max(0.0);
        let max_y = (world.height - self.viewport.y).max(0.0);
        self.pos.x = clamp(target.x - self.viewport.x * 0.5, 0.0, max_x);
        self.pos.y = clamp(target.y - self.viewport.y * 0.55, 0.0, max_y);
    }
}

/// A confetti particle (not gameplay-affecting)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// Seconds remaining
    pub life: f32,
    pub size: f32,
    /// Rotation in radians
    pub spin: f32,
    /// Hue in degrees
    pub hue: u16,
}

/// Complete simulation state for one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Physics and combat constants
    pub tuning: Tuning,
    /// Fixture every reset rebuilds from
    pub level: LevelData,
    /// Seed for cosmetic randomness
    pub seed: u64,
    pub phase: GamePhase,
    pub world: World,
    pub player: Player,
    pub enemies: Vec<PatrolEnemy>,
    pub boss: Boss,
    pub coins: Vec<Coin>,
    pub pipes: Vec<Pipe>,
    pub goal: Goal,
    pub coin_count: u32,
    pub hearts: u8,
    pub camera: Camera,
    /// Seconds of running simulation since the last reset
    pub time: f64,
    /// Seconds before pipes can trigger again
    pub pipe_cooldown: f32,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Built-in level with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_level(LevelData::default(), Tuning::default(), seed)
    }

    pub fn with_level(level: LevelData, tuning: Tuning, seed: u64) -> Self {
        let world = World::from_level(&level);
        let mut state = Self {
            hearts: tuning.starting_hearts,
            tuning,
            world,
            level,
            seed,
            phase: GamePhase::Title,
            player: Player::default(),
            enemies: Vec::new(),
            boss: Boss {
                body: Body::default(),
                hp: 0,
                max_hp: 0,
                alive: false,
                stun_timer: 0.0,
                patrol: Patrol {
                    heading: Heading::Left,
                    speed: 0.0,
                    min_x: 0.0,
                    max_x: 0.0,
                },
            },
            coins: Vec::new(),
            pipes: Vec::new(),
            goal: Goal {
                rect: Rect::default(),
                active: false,
                reached: false,
            },
            coin_count: 0,
            camera: Camera::default(),
            time: 0.0,
            pipe_cooldown: 0.0,
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.reset_level();
        state
    }

    /// Rebuild every entity and counter from the level fixture and return
    /// to the title screen
    pub fn reset_level(&mut self) {
        let level = &self.level;

        self.world = World::from_level(level);
        self.player = Player::spawn(level.player.spawn, level.player.size);

        self.enemies = level
            .enemies
            .iter()
            .zip(0u32..)
            .map(|(def, id)| PatrolEnemy {
                id,
                body: Body::new(def.rect.pos(), def.rect.size()),
                patrol: def.patrol,
                alive: true,
            })
            .collect();

        self.boss = Boss {
            body: Body::new(level.boss.rect.pos(), level.boss.rect.size()),
            hp: level.boss.hp,
            max_hp: level.boss.hp,
            alive: true,
            stun_timer: 0.0,
            patrol: level.boss.patrol,
        };

        let rng = &mut self.rng;
        let mut coins = Vec::new();
        for row in &level.coins {
            for i in 0..row.count {
                coins.push(Coin {
                    id: coins.len() as u32,
                    pos: row.start + Vec2::new(i as f32 * row.spacing, 0.0),
                    radius: row.radius,
                    taken: false,
                    phase: rng.random_range(0.0..std::f32::consts::TAU),
                });
            }
        }
        self.coins = coins;

        self.pipes = level
            .pipes
            .iter()
            .zip(0u32..)
            .map(|(def, id)| Pipe {
                id,
                rect: def.rect,
                enterable: def.enterable,
                target: def.target,
            })
            .collect();

        self.goal = Goal {
            rect: level.goal.rect,
            active: false,
            reached: false,
        };

        self.coin_count = 0;
        self.hearts = self.tuning.starting_hearts;
        self.time = 0.0;
        self.pipe_cooldown = 0.0;
        self.particles.clear();
        let center = self.player.body.center();
        self.camera.follow(center, &self.world);

        self.set_phase(GamePhase::Title);
        self.emit_hud();
        log::info!("Level '{}' reset", self.level.name);
    }

    /// Top-left position the player respawns at
    pub fn spawn_point(&self) -> Vec2 {
        self.level.player.spawn
    }

    /// Put the player back at spawn, standing still
    pub fn respawn_player(&mut self) {
        self.player.body.pos = self.spawn_point();
        self.player.body.vel = Vec2::ZERO;
    }

    /// Move to `to`, queueing a `PhaseChanged` event if it differs
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        log::info!("Phase: {} -> {}", from.as_str(), to.as_str());
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.camera.viewport = Vec2::new(width, height);
        let center = self.player.body.center();
        self.camera.follow(center, &self.world);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: Cue) {
        log::debug!("cue: {}", cue.name());
        self.emit(GameEvent::Cue(cue));
    }

    /// Queue the current counters for the HUD
    pub fn emit_hud(&mut self) {
        self.emit(GameEvent::Hud {
            coins: self.coin_count,
            hearts: self.hearts,
        });
    }

    /// Events queued since the last drain, oldest first
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a burst of confetti at `origin`
    pub fn spawn_confetti(&mut self, origin: Vec2, count: usize) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let rng = &mut self.rng;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(
                    rng.random_range(-600.0..600.0),
                    -rng.random_range(0.0..820.0) - 120.0,
                ),
                gravity: 1200.0,
                life: 1.8 + rng.random_range(0.0..0.9),
                size: 4.0 + rng.random_range(0.0..6.0),
                spin: rng.random_range(0.0..std::f32::consts::TAU),
                hue: rng.random_range(0..360),
            });
        }
    }
}
