//! Scene descriptions
//!
//! A scene is plain data: where the walls are, where players spawn and
//! which enemies are on the field. Spawn timing is not modelled; every
//! enemy listed is placed when the world is built.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::World;
use crate::tuning::Tuning;

/// Default wall color
pub const WALL_COLOR: u32 = 0x00_00_FF;

/// A wall segment centered on `pos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDesc {
    pub pos: Vec2,
    pub length: f32,
    /// Degrees; 0 horizontal, 90 vertical
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_wall_thickness")]
    pub thickness: f32,
}

fn default_wall_thickness() -> f32 {
    WALL_THICKNESS
}

/// Enemy placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EnemyDesc {
    Missile {
        pos: Vec2,
        rotation: f32,
        speed: f32,
        color: u32,
    },
    SeekerHead {
        pos: Vec2,
        speed: f32,
        color: u32,
    },
    Boss {
        pos: Vec2,
        speed: f32,
        color: u32,
    },
}

/// Complete scene layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub walls: Vec<WallDesc>,
    /// Spawn point per controller slot
    pub spawns: Vec<Vec2>,
    #[serde(default)]
    pub enemies: Vec<EnemyDesc>,
    /// Seconds before the scene can be cleared
    #[serde(default)]
    pub end_time: f32,
}

impl SceneDesc {
    /// Built-in arena: a closed 800x800 box with two ledges, a missile volley,
    /// a pair of seekers and the boss
    pub fn arena() -> Self {
        let half = SCENE_WIDTH / 2.0;
        let mid = Vec2::splat(half);
        let walls = vec![
            WallDesc {
                pos: Vec2::new(half, 0.0),
                length: SCENE_WIDTH,
                rotation: 0.0,
                thickness: WALL_THICKNESS,
            },
            WallDesc {
                pos: Vec2::new(half, SCENE_HEIGHT),
                length: SCENE_WIDTH,
                rotation: 0.0,
                thickness: WALL_THICKNESS,
            },
            WallDesc {
                pos: Vec2::new(0.0, SCENE_HEIGHT / 2.0),
                length: SCENE_HEIGHT,
                rotation: 90.0,
                thickness: WALL_THICKNESS,
            },
            WallDesc {
                pos: Vec2::new(SCENE_WIDTH, SCENE_HEIGHT / 2.0),
                length: SCENE_HEIGHT,
                rotation: 90.0,
                thickness: WALL_THICKNESS,
            },
            WallDesc {
                pos: Vec2::new(2.0 * GRID_CELL, 6.0 * GRID_CELL),
                length: 2.0 * GRID_CELL,
                rotation: 0.0,
                thickness: WALL_THICKNESS,
            },
            WallDesc {
                pos: Vec2::new(6.0 * GRID_CELL, 6.0 * GRID_CELL),
                length: 2.0 * GRID_CELL,
                rotation: 0.0,
                thickness: WALL_THICKNESS,
            },
        ];
        let spawns = vec![
            Vec2::new(2.0 * GRID_CELL, 5.0 * GRID_CELL),
            Vec2::new(6.0 * GRID_CELL, 5.0 * GRID_CELL),
            Vec2::new(3.0 * GRID_CELL, 7.5 * GRID_CELL),
            Vec2::new(5.0 * GRID_CELL, 7.5 * GRID_CELL),
        ];
        let mut enemies: Vec<EnemyDesc> = (0..4)
            .map(|i| EnemyDesc::Missile {
                pos: Vec2::new(150.0 + i as f32 * 160.0, 40.0),
                rotation: 0.0,
                speed: 150.0,
                color: 0xFF_00_00,
            })
            .collect();
        enemies.push(EnemyDesc::SeekerHead {
            pos: Vec2::new(100.0, 100.0),
            speed: 90.0,
            color: 0xFF_80_00,
        });
        enemies.push(EnemyDesc::SeekerHead {
            pos: Vec2::new(700.0, 100.0),
            speed: 90.0,
            color: 0xFF_80_00,
        });
        enemies.push(EnemyDesc::Boss {
            pos: mid - Vec2::new(0.0, GRID_CELL),
            speed: 250.0,
            color: 0xFF_00_FF,
        });

        Self {
            walls,
            spawns,
            enemies,
            end_time: 10.0,
        }
    }

    /// Parse a scene from JSON
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(scene) => Some(scene),
            Err(e) => {
                log::warn!("Invalid scene JSON: {}", e);
                None
            }
        }
    }

    /// Load a scene file, falling back to the built-in arena
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            if let Some(scene) = Self::from_json(&json) {
                log::info!("Loaded scene from {}", path.display());
                return scene;
            }
        } else {
            log::warn!("Could not read {}, using built-in arena", path.display());
        }
        Self::arena()
    }

    /// Build a world with one player per slot (up to the number of spawns)
    pub fn build(&self, seed: u64, tuning: Tuning, player_count: usize) -> World {
        let mut world = World::new(seed, tuning);
        world.end_time = self.end_time;

        for wall in &self.walls {
            world.spawn_wall(
                wall.pos,
                Vec2::new(wall.length, wall.thickness),
                wall.rotation,
                WALL_COLOR,
            );
        }

        for (slot, spawn) in self.spawns.iter().take(player_count).enumerate() {
            world.spawn_player(slot, *spawn);
        }
        if player_count > self.spawns.len() {
            log::warn!(
                "Scene has {} spawns, {} players requested",
                self.spawns.len(),
                player_count
            );
        }

        for enemy in &self.enemies {
            match *enemy {
                EnemyDesc::Missile {
                    pos,
                    rotation,
                    speed,
                    color,
                } => world.spawn_missile(pos, rotation, speed, color),
                EnemyDesc::SeekerHead { pos, speed, color } => world.spawn_seeker(pos, speed, color),
                EnemyDesc::Boss { pos, speed, color } => world.spawn_boss(pos, speed, color),
            };
        }

        log::info!(
            "Scene built: {} walls, {} players, {} enemies (seed {})",
            world.walls.len(),
            world.players.len(),
            world.enemies.len(),
            seed
        );
        world
    }
}
