//! Game state and core simulation types
//!
//! Entities own their kinematics; the world owns the entity sets and the
//! RNG. Nothing here knows about sprites, sounds or menus: those react to
//! the [`GameEvent`]s a tick produces.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::response::{Body, EntityKind};
use super::shape::{Collider, Shape};
use super::vector::{angle_degrees, closest_index, heading, set_magnitude};
use crate::consts::*;
use crate::tuning::Tuning;

/// Per-player input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Stick/arrow direction, each component in [-1, 1]
    pub direction: Vec2,
    /// Jump button held
    pub jump: bool,
}

/// A player square
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    /// Controller slot
    pub slot: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees
    pub rotation: f32,
    pub angular_vel: f32,
    pub size: Vec2,
    pub color: u32,
    pub can_jump: bool,
    pub can_dash: bool,
    pub is_dashing: bool,
    pub is_jumping: bool,
    /// Clinging to a vertical wall since the last collision step
    pub on_wall: bool,
    pub dash_cooldown: f32,
    pub removed: bool,
}

impl Player {
    pub fn new(id: u32, slot: usize, pos: Vec2) -> Self {
        Self {
            id,
            slot,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            size: Vec2::splat(PLAYER_SIZE),
            color: crate::PLAYER_COLORS[slot % crate::PLAYER_COLORS.len()],
            can_jump: false,
            can_dash: false,
            is_dashing: false,
            is_jumping: false,
            on_wall: false,
            dash_cooldown: 0.0,
            removed: false,
        }
    }

    /// Advance movement for one tick (everything but collisions)
    pub fn integrate(&mut self, input: &PlayerInput, tuning: &Tuning, dt: f32) {
        if self.dash_cooldown > 0.0 {
            // No steering while dashing
            self.dash_cooldown -= dt;
        } else {
            if self.is_dashing {
                self.is_dashing = false;
                self.vel.y = if self.vel.y < 0.0 {
                    -tuning.dash_exit_rise
                } else {
                    0.0
                };
            }
            self.steer(input, tuning);
        }

        self.pos += self.vel;

        if !self.on_wall {
            self.rotation += self.angular_vel;
            if self.rotation > 90.0 || self.rotation < -90.0 {
                self.rotation = 0.0;
            }
        }

        self.on_wall = false;
        if self.is_jumping && !input.jump {
            self.can_dash = true;
            self.is_jumping = false;
        }
    }

    fn steer(&mut self, input: &PlayerInput, tuning: &Tuning) {
        self.vel.x = input.direction.x * tuning.move_speed;
        self.angular_vel = input.direction.x * tuning.rotation_speed;

        // on_wall still reflects the previous collision step here
        if input.jump && self.can_jump && !self.on_wall {
            self.vel.y = -tuning.jump_speed;
            self.can_jump = false;
            self.is_jumping = true;
        }

        if input.jump && self.can_dash && !self.is_jumping {
            self.dash(input, tuning);
        }

        if !self.on_wall {
            self.vel.y += tuning.gravity;
        }
    }

    fn dash(&mut self, input: &PlayerInput, tuning: &Tuning) {
        if input.direction == Vec2::ZERO {
            return;
        }
        self.vel = input.direction * tuning.dash_speed;
        self.can_dash = false;
        self.is_dashing = true;
        self.dash_cooldown = tuning.dash_time;
    }
}

impl Collider for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::rectangle(self.pos, self.size, self.rotation)
    }
}

impl Body for Player {
    fn position_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.vel
    }
}

/// A static wall segment
#[derive(Debug, Clone)]
pub struct Wall {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees; 0 is horizontal, 90 vertical
    pub rotation: f32,
    pub color: u32,
}

impl Wall {
    /// Players cling to vertical walls instead of sliding down them
    pub fn is_vertical(&self) -> bool {
        (self.rotation.rem_euclid(180.0) - 90.0).abs() < 1e-3
    }
}

impl Collider for Wall {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::rectangle(self.pos, self.size, self.rotation)
    }
}

/// A straight-flying missile
#[derive(Debug, Clone)]
pub struct Missile {
    pub id: u32,
    pub pos: Vec2,
    /// Heading in degrees (0 flies down the screen)
    pub rotation: f32,
    pub size: Vec2,
    /// Units per second
    pub speed: f32,
    pub color: u32,
    pub removed: bool,
}

impl Missile {
    pub fn integrate(&mut self, dt: f32) {
        self.pos += heading(self.rotation) * self.speed * dt;
    }
}

impl Collider for Missile {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::rectangle(self.pos, self.size, self.rotation)
    }
}

/// Seeker head lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekerState {
    Hunting,
    /// Shockwave ring expanding around the last position
    Exploding { radius: f32, remaining: f32 },
}

/// A triangle that homes in on the closest player, then blows up
#[derive(Debug, Clone)]
pub struct SeekerHead {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees, screen convention (positive turns counter-clockwise on screen)
    pub rotation: f32,
    pub size: Vec2,
    /// Units per second
    pub max_speed: f32,
    pub lifespan: f32,
    pub state: SeekerState,
    pub color: u32,
    pub removed: bool,
}

impl SeekerHead {
    /// Point at `target` and head straight for it at full speed
    pub fn seek(&mut self, target: Vec2) {
        let desired = set_magnitude(target - self.pos, self.max_speed);
        // Negated so the screen-space shape builder puts the apex, and the
        // wall hitbox with it, on the heading
        self.rotation = -angle_degrees(target - self.pos);
        self.vel += desired - self.vel;
    }

    /// Push away from other seekers, harder the closer they are
    pub fn separate<I>(&mut self, others: I, repulsion: f32)
    where
        I: IntoIterator<Item = Vec2>,
    {
        for other in others {
            let away = self.pos - other;
            let distance = away.length();
            if distance <= f32::EPSILON {
                continue;
            }
            self.vel += set_magnitude(away, repulsion / distance);
        }
    }

    /// Current shockwave, if exploding
    pub fn shockwave(&self) -> Option<Shockwave> {
        match self.state {
            SeekerState::Exploding { radius, .. } => Some(Shockwave {
                center: self.pos,
                radius,
            }),
            SeekerState::Hunting => None,
        }
    }
}

impl Collider for SeekerHead {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::triangle(self.pos, self.size, self.rotation)
    }
}

impl Body for SeekerHead {
    fn position_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.vel
    }
}

/// Collision view of a seeker's explosion ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shockwave {
    pub center: Vec2,
    pub radius: f32,
}

impl Collider for Shockwave {
    fn position(&self) -> Vec2 {
        self.center
    }

    fn shape(&self) -> Shape {
        Shape::circle(self.center, self.radius)
    }
}

/// Boss behaviour state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossState {
    /// Counting down before choosing a direction
    Aiming { countdown: f32 },
    Moving,
    /// Lifespan is over; removed at the end of the tick
    Exploding,
}

/// The heavy circular enemy that charges and bounces off walls
#[derive(Debug, Clone)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifespan: f32,
    /// Units per second
    pub speed: f32,
    pub state: BossState,
    pub color: u32,
    pub removed: bool,
}

impl Boss {
    /// Choose a direction: sometimes a random cardinal one so the boss
    /// does not stay stuck behind a wall, otherwise the closest player.
    ///
    /// With no player to chase the boss keeps aiming and retries next tick.
    pub fn aim(&mut self, closest_player: Option<Vec2>, evade_odds: u32, rng: &mut Pcg32) {
        const CARDINALS: [Vec2; 4] = [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y];

        if rng.random_range(0..4) < evade_odds {
            let direction = CARDINALS[rng.random_range(0..CARDINALS.len())];
            self.vel += direction * self.speed;
            self.state = BossState::Moving;
        } else if let Some(target) = closest_player {
            self.vel += set_magnitude(target - self.pos, self.speed);
            self.state = BossState::Moving;
        }
    }
}

impl Collider for Boss {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn shape(&self) -> Shape {
        Shape::circle(self.pos, self.radius)
    }
}

impl Body for Boss {
    fn position_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }

    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.vel
    }
}

/// Any hostile entity
#[derive(Debug, Clone)]
pub enum Enemy {
    Missile(Missile),
    SeekerHead(SeekerHead),
    Boss(Boss),
}

impl Enemy {
    pub fn id(&self) -> u32 {
        match self {
            Enemy::Missile(m) => m.id,
            Enemy::SeekerHead(s) => s.id,
            Enemy::Boss(b) => b.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Enemy::Missile(_) => EntityKind::Missile,
            Enemy::SeekerHead(_) => EntityKind::SeekerHead,
            Enemy::Boss(_) => EntityKind::Boss,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Enemy::Missile(m) => m.pos,
            Enemy::SeekerHead(s) => s.pos,
            Enemy::Boss(b) => b.pos,
        }
    }

    pub fn is_removed(&self) -> bool {
        match self {
            Enemy::Missile(m) => m.removed,
            Enemy::SeekerHead(s) => s.removed,
            Enemy::Boss(b) => b.removed,
        }
    }

    pub fn mark_removed(&mut self) {
        match self {
            Enemy::Missile(m) => m.removed = true,
            Enemy::SeekerHead(s) => s.removed = true,
            Enemy::Boss(b) => b.removed = true,
        }
    }
}

/// A square of debris (visual only, never collides)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub color: u32,
    /// Seconds left
    pub life: f32,
}

/// Debris burst parameters for an explosion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debris {
    pub count: usize,
    pub size: f32,
    /// Speeds are drawn from `0..max_speed`
    pub max_speed: u32,
    pub life: f32,
}

impl Debris {
    pub const PLAYER: Debris = Debris {
        count: 10,
        size: 10.0,
        max_speed: 5,
        life: 1.0,
    };
    pub const MISSILE: Debris = Debris {
        count: 2,
        size: 2.0,
        max_speed: 2,
        life: 0.3,
    };
    pub const BOSS: Debris = Debris {
        count: 40,
        size: 6.0,
        max_speed: 4,
        life: 1.0,
    };
}

/// Things that happened during a tick, for audio/render collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerExploded { id: u32, pos: Vec2 },
    EnemyExploded { id: u32, kind: EntityKind, pos: Vec2 },
    /// A seeker started its shockwave
    ShockwaveStarted { id: u32, pos: Vec2 },
    /// Boss slammed into a wall
    BossBounced { id: u32, pos: Vec2 },
    ScreenShake { intensity: f32 },
}

/// Scene result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    /// Every player is gone and the debris has settled
    Lost,
    /// Scene time is over and no enemy is left
    Cleared,
}

/// Everything one scene simulates
#[derive(Debug, Clone)]
pub struct World {
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub players: Vec<Player>,
    pub walls: Vec<Wall>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds since the scene started
    pub elapsed: f32,
    /// Scene may be cleared once this many seconds have passed
    pub end_time: f32,
    pub outcome: Outcome,
    /// Events of the last tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            players: Vec::new(),
            walls: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            time_ticks: 0,
            elapsed: 0.0,
            end_time: 0.0,
            outcome: Outcome::Running,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_player(&mut self, slot: usize, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.players.push(Player::new(id, slot, pos));
        id
    }

    pub fn spawn_wall(&mut self, pos: Vec2, size: Vec2, rotation: f32, color: u32) -> u32 {
        let id = self.next_entity_id();
        self.walls.push(Wall {
            id,
            pos,
            size,
            rotation,
            color,
        });
        id
    }

    pub fn spawn_missile(&mut self, pos: Vec2, rotation: f32, speed: f32, color: u32) -> u32 {
        let id = self.next_entity_id();
        let size = Vec2::new(self.tuning.missile_width, self.tuning.missile_height);
        self.enemies.push(Enemy::Missile(Missile {
            id,
            pos,
            rotation,
            size,
            speed,
            color,
            removed: false,
        }));
        id
    }

    pub fn spawn_seeker(&mut self, pos: Vec2, max_speed: f32, color: u32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::SeekerHead(SeekerHead {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            size: Vec2::new(SEEKER_WIDTH, SEEKER_HEIGHT),
            max_speed,
            lifespan: self.tuning.seeker_lifespan,
            state: SeekerState::Hunting,
            color,
            removed: false,
        }));
        id
    }

    pub fn spawn_boss(&mut self, pos: Vec2, speed: f32, color: u32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::Boss(Boss {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: BOSS_RADIUS,
            lifespan: self.tuning.boss_lifespan,
            speed,
            state: BossState::Aiming {
                countdown: self.tuning.boss_aim_time,
            },
            color,
            removed: false,
        }));
        id
    }

    /// Position of the live player closest to `point`
    pub fn closest_player(&self, point: Vec2) -> Option<Vec2> {
        let live: Vec<Vec2> = self
            .players
            .iter()
            .filter(|p| !p.removed)
            .map(|p| p.pos)
            .collect();
        closest_index(point, live.iter().copied()).map(|i| live[i])
    }

    /// Scatter debris around `pos`
    pub fn spawn_debris(&mut self, pos: Vec2, debris: Debris, color: u32) {
        for _ in 0..debris.count {
            let angle_x = (self.rng.random_range(0..360) as f32).to_radians();
            let angle_y = (self.rng.random_range(0..360) as f32).to_radians();
            let vel = Vec2::new(
                angle_x.cos() * self.rng.random_range(0..debris.max_speed) as f32,
                angle_y.sin() * self.rng.random_range(0..debris.max_speed) as f32,
            );
            let rotation = self.rng.random_range(0..360) as f32;
            self.particles.push(Particle {
                pos,
                vel,
                size: debris.size,
                rotation,
                color,
                life: debris.life,
            });
        }
    }

    /// Blow up a player. Exploding an already exploded player does nothing.
    pub fn explode_player(&mut self, index: usize) {
        let Some(player) = self.players.get_mut(index) else {
            return;
        };
        if player.removed {
            return;
        }
        player.removed = true;
        let (id, pos, color) = (player.id, player.pos, player.color);
        log::debug!("Player {} exploded at {:?}", id, pos);
        self.spawn_debris(pos, Debris::PLAYER, color);
        self.events.push(GameEvent::PlayerExploded { id, pos });
    }

    /// Blow up an enemy, spawning its debris. Idempotent.
    pub fn explode_enemy(&mut self, index: usize) {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return;
        };
        if enemy.is_removed() {
            return;
        }
        enemy.mark_removed();
        let (id, kind, pos) = (enemy.id(), enemy.kind(), enemy.pos());
        let debris = match enemy {
            Enemy::Missile(m) => Some((Debris::MISSILE, m.color)),
            Enemy::Boss(b) => {
                b.state = BossState::Exploding;
                Some((Debris::BOSS, b.color))
            }
            // The shockwave was the explosion
            Enemy::SeekerHead(_) => None,
        };
        log::debug!("{:?} {} exploded at {:?}", kind, id, pos);
        if let Some((debris, color)) = debris {
            self.spawn_debris(pos, debris, color);
        }
        self.events.push(GameEvent::EnemyExploded { id, kind, pos });
    }

    /// Drop everything marked for removal (end of tick)
    pub fn compact(&mut self) {
        self.players.retain(|p| !p.removed);
        self.enemies.retain(|e| !e.is_removed());
        self.particles.retain(|p| p.life > 0.0);
    }

    /// Recompute the scene outcome from what is left
    pub fn update_outcome(&mut self) {
        if self.outcome != Outcome::Running {
            return;
        }
        if self.players.is_empty() && self.particles.is_empty() {
            self.outcome = Outcome::Lost;
        } else if self.elapsed > self.end_time && self.enemies.is_empty() {
            self.outcome = Outcome::Cleared;
        }
        if self.outcome != Outcome::Running {
            log::info!("Scene finished: {:?} after {} ticks", self.outcome, self.time_ticks);
        }
    }
}
