//! Level fixtures
//!
//! A level is a static, load-time description of the world. The simulation
//! never mutates it; every reset rebuilds entities from it.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::rect::Rect;
use crate::sim::state::{Heading, Patrol};

/// Errors from loading a level file
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level: {what}")]
    Invalid { what: String },
}

fn invalid(what: impl Into<String>) -> LevelError {
    LevelError::Invalid { what: what.into() }
}

fn has_area(rect: &Rect) -> bool {
    rect.w > 0.0 && rect.h > 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldDef {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerDef {
    /// Top-left spawn position
    pub spawn: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeDef {
    pub rect: Rect,
    #[serde(default)]
    pub enterable: bool,
    /// Feet position after teleporting (x = left edge, y = floor line)
    #[serde(default)]
    pub target: Option<Vec2>,
}

/// A horizontal run of evenly spaced coins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinRow {
    /// Center of the first coin
    pub start: Vec2,
    pub count: u32,
    pub spacing: f32,
    #[serde(default = "default_coin_radius")]
    pub radius: f32,
}

fn default_coin_radius() -> f32 {
    14.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolDef {
    pub rect: Rect,
    pub patrol: Patrol,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    pub rect: Rect,
    pub hp: u8,
    pub patrol: Patrol,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalDef {
    pub rect: Rect,
}

/// Complete description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub world: WorldDef,
    pub player: PlayerDef,
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub pipes: Vec<PipeDef>,
    #[serde(default)]
    pub coins: Vec<CoinRow>,
    #[serde(default)]
    pub enemies: Vec<PatrolDef>,
    pub boss: BossDef,
    pub goal: GoalDef,
    /// Crossing this x (player's left edge) starts the boss encounter
    pub boss_zone_x: f32,
}

impl Default for LevelData {
    fn default() -> Self {
        Self::cozy_meadow()
    }
}

impl LevelData {
    /// The built-in level: a meadow of ledges and worms ending in
    /// the Blobking's arena and the star portal
    pub fn cozy_meadow() -> Self {
        let g = GROUND_Y;
        let ledge = |x: f32, y: f32, w: f32| Rect::new(x, y, w, 34.0);
        let pipe = |x: f32, h: f32| Rect::new(x, g - h, 96.0, h);
        let row = |x: f32, y: f32, count: u32| CoinRow {
            start: Vec2::new(x, y),
            count,
            spacing: 46.0,
            radius: 14.0,
        };
        let worm = |x: f32, heading: Heading, min_x: f32, max_x: f32| PatrolDef {
            rect: Rect::new(x, g - 44.0, 54.0, 34.0),
            patrol: Patrol {
                heading,
                speed: 90.0,
                min_x,
                max_x,
            },
        };

        Self {
            name: "Cozy Meadow".to_string(),
            world: WorldDef {
                width: WORLD_WIDTH,
                height: WORLD_HEIGHT,
                ground_y: g,
            },
            player: PlayerDef {
                spawn: Vec2::new(PLAYER_SPAWN_X, g - PLAYER_HEIGHT),
                size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            },
            platforms: vec![
                // Ground slab, wider than the world on both sides
                Rect::new(-600.0, g, WORLD_WIDTH + 1200.0, 600.0),
                ledge(520.0, 860.0, 260.0),
                ledge(900.0, 760.0, 260.0),
                ledge(1300.0, 860.0, 320.0),
                ledge(1700.0, 720.0, 260.0),
                ledge(2100.0, 860.0, 340.0),
                ledge(2550.0, 760.0, 280.0),
                ledge(2950.0, 860.0, 340.0),
                ledge(3400.0, 720.0, 260.0),
                ledge(3800.0, 860.0, 340.0),
                ledge(4200.0, 760.0, 280.0),
                // Boss arena floor
                ledge(4700.0, 880.0, 900.0),
            ],
            pipes: vec![
                PipeDef {
                    rect: pipe(1120.0, 130.0),
                    enterable: true,
                    target: Some(Vec2::new(3000.0, g - 130.0)),
                },
                PipeDef {
                    rect: pipe(3050.0, 130.0),
                    enterable: true,
                    target: Some(Vec2::new(1180.0, g - 130.0)),
                },
                PipeDef {
                    rect: pipe(1900.0, 110.0),
                    enterable: false,
                    target: None,
                },
                PipeDef {
                    rect: pipe(4520.0, 150.0),
                    enterable: false,
                    target: None,
                },
            ],
            coins: vec![
                row(560.0, 820.0, 4),
                row(940.0, 720.0, 5),
                row(1360.0, 820.0, 5),
                row(1750.0, 680.0, 4),
                row(2160.0, 820.0, 6),
                row(2590.0, 720.0, 5),
                row(3000.0, 820.0, 6),
                row(3440.0, 680.0, 4),
                row(3860.0, 820.0, 6),
                row(4240.0, 720.0, 4),
                row(4880.0, 820.0, 8),
            ],
            enemies: vec![
                worm(860.0, Heading::Right, 800.0, 1100.0),
                worm(1600.0, Heading::Left, 1500.0, 1850.0),
                worm(2380.0, Heading::Right, 2250.0, 2600.0),
                worm(3250.0, Heading::Left, 3100.0, 3450.0),
                worm(4020.0, Heading::Right, 3920.0, 4300.0),
            ],
            boss: BossDef {
                rect: Rect::new(5050.0, g - 96.0, 120.0, 96.0),
                hp: BOSS_HP,
                patrol: Patrol {
                    heading: Heading::Left,
                    speed: 110.0,
                    min_x: 4780.0,
                    max_x: 5320.0,
                },
            },
            goal: GoalDef {
                rect: Rect::new(5720.0, g - 210.0, 90.0, 160.0),
            },
            boss_zone_x: 4550.0,
        }
    }

    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Load a level file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::info!("Loaded level '{}' from {}", level.name, path.display());
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject fixtures the simulation cannot run sensibly
    pub fn validate(&self) -> Result<(), LevelError> {
        let w = &self.world;
        if w.width <= 0.0 || w.height <= 0.0 {
            return Err(invalid("world must have positive size"));
        }
        if self.player.size.x <= 0.0 || self.player.size.y <= 0.0 {
            return Err(invalid("player must have positive size"));
        }
        if self.player.size.x > w.width {
            return Err(invalid("player is wider than the world"));
        }
        let spawn = self.player.spawn;
        if spawn.x < 0.0
            || spawn.x > w.width - self.player.size.x
            || spawn.y < 0.0
            || spawn.y > w.height
        {
            return Err(invalid("player spawns outside the world"));
        }
        for (i, rect) in self.platforms.iter().enumerate() {
            if !has_area(rect) {
                return Err(invalid(format!("platform {i} has non-positive size")));
            }
        }
        for (i, pipe) in self.pipes.iter().enumerate() {
            if !has_area(&pipe.rect) {
                return Err(invalid(format!("pipe {i} has non-positive size")));
            }
            if let Some(target) = pipe.target {
                let inside_x = (0.0..=w.width).contains(&target.x);
                let inside_y = (0.0..=w.height).contains(&target.y);
                if !(inside_x && inside_y) {
                    return Err(invalid(format!("pipe {i} teleports outside the world")));
                }
            }
        }
        for (i, enemy) in self.enemies.iter().enumerate() {
            if !has_area(&enemy.rect) {
                return Err(invalid(format!("enemy {i} has non-positive size")));
            }
            if enemy.patrol.min_x > enemy.patrol.max_x {
                return Err(invalid(format!("enemy {i} patrol range is inverted")));
            }
        }
        if !has_area(&self.boss.rect) {
            return Err(invalid("boss has non-positive size"));
        }
        if !has_area(&self.goal.rect) {
            return Err(invalid("goal has non-positive size"));
        }
        if self.boss.hp == 0 {
            return Err(invalid("boss must start with hp"));
        }
        if self.boss.patrol.min_x > self.boss.patrol.max_x {
            return Err(invalid("boss patrol range is inverted"));
        }
        Ok(())
    }
}

/// Small flat level for unit tests: two linked pipes that land on each
/// other, a coin row on the floor, one worm, the boss and the goal.
#[cfg(test)]
pub(crate) fn test_level() -> LevelData {
    LevelData {
        name: "Test Flats".to_string(),
        world: WorldDef {
            width: 2000.0,
            height: 800.0,
            ground_y: 700.0,
        },
        player: PlayerDef {
            spawn: Vec2::new(100.0, 648.0),
            size: Vec2::new(48.0, 52.0),
        },
        platforms: vec![Rect::new(-100.0, 700.0, 2200.0, 200.0)],
        pipes: vec![
            PipeDef {
                rect: Rect::new(400.0, 600.0, 96.0, 100.0),
                enterable: true,
                target: Some(Vec2::new(1200.0, 600.0)),
            },
            PipeDef {
                rect: Rect::new(1200.0, 600.0, 96.0, 100.0),
                enterable: true,
                target: Some(Vec2::new(400.0, 600.0)),
            },
        ],
        coins: vec![CoinRow {
            start: Vec2::new(250.0, 674.0),
            count: 3,
            spacing: 46.0,
            radius: 14.0,
        }],
        enemies: vec![PatrolDef {
            rect: Rect::new(600.0, 666.0, 54.0, 34.0),
            patrol: Patrol {
                heading: Heading::Right,
                speed: 90.0,
                min_x: 550.0,
                max_x: 700.0,
            },
        }],
        boss: BossDef {
            rect: Rect::new(1500.0, 604.0, 120.0, 96.0),
            hp: 6,
            patrol: Patrol {
                heading: Heading::Left,
                speed: 110.0,
                min_x: 1400.0,
                max_x: 1700.0,
            },
        },
        goal: GoalDef {
            rect: Rect::new(1850.0, 540.0, 90.0, 160.0),
        },
        boss_zone_x: 1300.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_level_is_valid() {
        let level = LevelData::cozy_meadow();
        level.validate().unwrap();
        assert_eq!(level.platforms.len(), 12);
        assert_eq!(level.pipes.len(), 4);
        assert_eq!(level.enemies.len(), 5);
        assert_eq!(level.coins.iter().map(|r| r.count).sum::<u32>(), 57);
        test_level().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip() {
        let level = LevelData::cozy_meadow();
        let json = level.to_json().unwrap();
        let parsed = LevelData::from_json(&json).unwrap();
        assert_eq!(parsed, level);
    }

    #[test]
    fn test_parse_error() {
        let err = LevelData::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_inverted_patrol_rejected() {
        let mut level = test_level();
        level.enemies[0].patrol.min_x = 900.0;
        let err = level.validate().unwrap_err();
        assert!(matches!(err, LevelError::Invalid { .. }));
        assert!(err.to_string().contains("enemy 0"));
    }

    #[test]
    fn test_degenerate_entities_rejected() {
        let mut level = test_level();
        level.enemies[0].rect.w = 0.0;
        assert!(level.validate().unwrap_err().to_string().contains("enemy 0"));

        let mut level = test_level();
        level.boss.rect.h = -4.0;
        assert!(level.validate().unwrap_err().to_string().contains("boss"));

        let mut level = test_level();
        level.goal.rect.w = 0.0;
        assert!(level.validate().unwrap_err().to_string().contains("goal"));
    }

    #[test]
    fn test_out_of_world_positions_rejected() {
        let mut level = test_level();
        level.player.spawn.x = level.world.width;
        assert!(level.validate().unwrap_err().to_string().contains("spawns"));

        let mut level = test_level();
        level.player.spawn.y = -10.0;
        assert!(level.validate().is_err());

        let mut level = test_level();
        level.pipes[0].target = Some(Vec2::new(500.0, level.world.height + 1.0));
        assert!(level.validate().unwrap_err().to_string().contains("pipe 0"));
    }

    #[test]
    fn test_zero_hp_boss_rejected() {
        let mut level = test_level();
        level.boss.hp = 0;
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_optional_sections_default() {
        let mut level = test_level();
        level.pipes.clear();
        level.coins.clear();
        level.enemies.clear();
        let mut value: serde_json::Value = serde_json::to_value(&level).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("pipes");
        obj.remove("coins");
        obj.remove("enemies");
        let parsed = LevelData::from_json(&value.to_string()).unwrap();
        assert_eq!(parsed, level);
    }

    #[test]
    fn test_missing_file() {
        let err = LevelData::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LevelError::Io(_)));
    }
}
