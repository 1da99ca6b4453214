//! Fixed timestep simulation tick
//!
//! Order within a tick: players, then enemies, then particles, each set in
//! reverse order. Every entity moves, then resolves its own contacts in two
//! phases: all contacts are computed against the world as it stands, then
//! applied to itself. Whatever an earlier entity did is visible to later
//! ones. Explosions only mark entities; the sets are compacted once the
//! whole pass is done, so no loop ever skips or revisits an element.

use glam::Vec2;

use super::response::{EntityKind, apply_motion, contact, response_for};
use super::state::{
    BossState, Enemy, GameEvent, Outcome, PlayerInput, SeekerHead, SeekerState, World,
};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by controller slot; missing slots read as idle
    pub players: Vec<PlayerInput>,
}

impl TickInput {
    pub fn for_slot(&self, slot: usize) -> PlayerInput {
        self.players.get(slot).copied().unwrap_or_default()
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if world.outcome != Outcome::Running {
        return;
    }

    world.events.clear();
    world.time_ticks += 1;
    world.elapsed += dt;

    for i in (0..world.players.len()).rev() {
        update_player(world, i, input, dt);
    }

    for i in (0..world.enemies.len()).rev() {
        update_enemy(world, i, dt);
    }

    for particle in world.particles.iter_mut().rev() {
        particle.life -= dt;
        if particle.life > 0.0 {
            particle.pos += particle.vel;
        }
    }

    world.compact();
    world.update_outcome();
}

fn update_player(world: &mut World, i: usize, input: &TickInput, dt: f32) {
    if world.players[i].removed {
        return;
    }
    let slot = world.players[i].slot;
    world.players[i].integrate(&input.for_slot(slot), &world.tuning, dt);

    // Phase 1: contacts against the current world
    let player = &world.players[i];
    let wall_hits: Vec<(Vec2, bool)> = world
        .walls
        .iter()
        .filter_map(|wall| contact(player, wall).map(|mtv| (mtv, wall.is_vertical())))
        .collect();
    let player_hits: Vec<Vec2> = world
        .players
        .iter()
        .enumerate()
        .filter(|(j, other)| *j != i && !other.removed)
        .filter_map(|(_, other)| contact(player, other))
        .collect();

    // Phase 2: resolve self
    let player = &mut world.players[i];
    let response = response_for(EntityKind::Player, EntityKind::Wall);
    for (mtv, vertical) in wall_hits {
        if vertical {
            player.on_wall = true;
        }
        if response.ground {
            player.can_dash = false;
            player.can_jump = true;
        }
        apply_motion(player, &response, mtv);
    }
    let response = response_for(EntityKind::Player, EntityKind::Player);
    for mtv in player_hits {
        apply_motion(player, &response, mtv);
    }
}

fn update_enemy(world: &mut World, i: usize, dt: f32) {
    if world.enemies[i].is_removed() {
        return;
    }
    match world.enemies[i] {
        Enemy::Missile(_) => update_missile(world, i, dt),
        Enemy::SeekerHead(_) => update_seeker(world, i, dt),
        Enemy::Boss(_) => update_boss(world, i, dt),
    }
}

/// Indices of live players touched by `this`
fn touched_players<C>(world: &World, this: &C) -> Vec<usize>
where
    C: super::shape::Collider,
{
    world
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.removed)
        .filter(|(_, p)| contact(this, *p).is_some())
        .map(|(j, _)| j)
        .collect()
}

fn update_missile(world: &mut World, i: usize, dt: f32) {
    let Enemy::Missile(missile) = &mut world.enemies[i] else {
        return;
    };
    missile.integrate(dt);

    let missile = match &world.enemies[i] {
        Enemy::Missile(m) => m,
        _ => return,
    };
    let hit_wall = world.walls.iter().any(|wall| contact(missile, wall).is_some());
    let victims = touched_players(world, missile);

    if hit_wall && response_for(EntityKind::Missile, EntityKind::Wall).explode_self {
        world.explode_enemy(i);
    }
    let response = response_for(EntityKind::Missile, EntityKind::Player);
    for j in victims {
        if response.explode_self {
            world.explode_enemy(i);
        }
        if response.explode_other {
            world.explode_player(j);
        }
    }
}

fn update_seeker(world: &mut World, i: usize, dt: f32) {
    let state = match &world.enemies[i] {
        Enemy::SeekerHead(s) => s.state,
        _ => return,
    };

    if let SeekerState::Exploding { .. } = state {
        update_shockwave(world, i, dt);
        return;
    }

    let target = world.closest_player(world.enemies[i].pos());
    let id = world.enemies[i].id();
    let neighbours: Vec<Vec2> = world
        .enemies
        .iter()
        .filter(|e| e.id() != id && !e.is_removed())
        .filter_map(|e| match e {
            Enemy::SeekerHead(s) => Some(s.pos),
            _ => None,
        })
        .collect();
    let (repulsion, fuse, shake) = (
        world.tuning.seeker_repulsion,
        world.tuning.shockwave_lifespan,
        world.tuning.shake_seeker,
    );

    let Enemy::SeekerHead(seeker) = &mut world.enemies[i] else {
        return;
    };
    seeker.lifespan -= dt;
    if seeker.lifespan <= 0.0 {
        seeker.state = SeekerState::Exploding {
            radius: seeker.size.y / 2.0,
            remaining: fuse,
        };
        let pos = seeker.pos;
        log::debug!("Seeker {} going off at {:?}", id, pos);
        world.events.push(GameEvent::ShockwaveStarted { id, pos });
        world.events.push(GameEvent::ScreenShake { intensity: shake });
        return;
    }

    if let Some(target) = target {
        seeker.seek(target);
        seeker.separate(neighbours, repulsion);
    }
    seeker.pos += seeker.vel * dt;

    let seeker = match &world.enemies[i] {
        Enemy::SeekerHead(s) => s,
        _ => return,
    };
    let hits = wall_contacts(world, seeker);
    if let Enemy::SeekerHead(seeker) = &mut world.enemies[i] {
        let response = response_for(EntityKind::SeekerHead, EntityKind::Wall);
        for mtv in hits {
            apply_motion(seeker, &response, mtv);
        }
    }
}

fn wall_contacts(world: &World, seeker: &SeekerHead) -> Vec<Vec2> {
    world
        .walls
        .iter()
        .filter_map(|wall| contact(seeker, wall))
        .collect()
}

fn update_shockwave(world: &mut World, i: usize, dt: f32) {
    let Some(wave) = (match &world.enemies[i] {
        Enemy::SeekerHead(s) => s.shockwave(),
        _ => None,
    }) else {
        return;
    };

    if response_for(EntityKind::Shockwave, EntityKind::Player).explode_other {
        for j in touched_players(world, &wave) {
            world.explode_player(j);
        }
    }

    let growth = world.tuning.shockwave_growth;
    let done = match &mut world.enemies[i] {
        Enemy::SeekerHead(SeekerHead {
            state: SeekerState::Exploding { radius, remaining },
            ..
        }) => {
            *radius += growth * dt;
            *remaining -= dt;
            *remaining <= 0.0
        }
        _ => false,
    };
    if done {
        world.explode_enemy(i);
    }
}

fn update_boss(world: &mut World, i: usize, dt: f32) {
    let pos = world.enemies[i].pos();
    let target = world.closest_player(pos);
    let tuning = world.tuning.clone();

    let Enemy::Boss(boss) = &mut world.enemies[i] else {
        return;
    };

    if let BossState::Aiming { countdown } = boss.state {
        let countdown = countdown - dt;
        boss.state = BossState::Aiming { countdown };
        if countdown <= 0.0 {
            boss.aim(target, tuning.boss_evade_odds, &mut world.rng);
        }
    }

    boss.lifespan -= dt;
    if boss.lifespan <= 0.0 {
        world.events.push(GameEvent::ScreenShake {
            intensity: tuning.shake_boss,
        });
        world.explode_enemy(i);
        return;
    }

    boss.pos += boss.vel * dt;

    let boss = match &world.enemies[i] {
        Enemy::Boss(b) => b,
        _ => return,
    };
    let wall_hits: Vec<Vec2> = world
        .walls
        .iter()
        .filter_map(|wall| contact(boss, wall))
        .collect();
    let victims = touched_players(world, boss);

    if let Enemy::Boss(boss) = &mut world.enemies[i] {
        let response = response_for(EntityKind::Boss, EntityKind::Wall);
        for mtv in &wall_hits {
            if response.retarget {
                boss.state = BossState::Aiming {
                    countdown: tuning.boss_aim_time,
                };
            }
            apply_motion(boss, &response, *mtv);
        }
        if !wall_hits.is_empty() {
            let (id, pos) = (boss.id, boss.pos);
            world.events.push(GameEvent::BossBounced { id, pos });
            world.events.push(GameEvent::ScreenShake {
                intensity: tuning.shake_boss,
            });
        }
    }

    if response_for(EntityKind::Boss, EntityKind::Player).explode_other {
        for j in victims {
            world.explode_player(j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::scene::SceneDesc;
    use crate::sim::state::Debris;
    use crate::tuning::Tuning;

    /// World with no scene end, so it keeps running without enemies
    fn empty_world() -> World {
        let mut world = World::new(12345, Tuning::default());
        world.end_time = 1000.0;
        world
    }

    fn exploded_players(world: &World) -> usize {
        world
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerExploded { .. }))
            .count()
    }

    #[test]
    fn test_player_lands_on_wall() {
        let mut world = empty_world();
        world.spawn_wall(Vec2::new(100.0, 107.0), Vec2::new(100.0, 7.0), 0.0, 0);
        world.spawn_player(0, Vec2::new(100.0, 100.0));

        tick(&mut world, &TickInput::default(), SIM_DT);
        let player = &world.players[0];
        // Bottom edge rests on the wall's top edge at y = 103.5
        assert!((player.pos.y + 15.0 - 103.5).abs() < 1e-3);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.can_jump);
        assert!(!player.on_wall);

        // Resting stays put under gravity
        assert_eq!(world.outcome, Outcome::Running);
        for _ in 0..30 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert!((world.players[0].pos.y - 88.5).abs() < 1e-2);
    }

    #[test]
    fn test_player_jumps_off_wall() {
        let mut world = empty_world();
        world.spawn_wall(Vec2::new(100.0, 107.0), Vec2::new(100.0, 7.0), 0.0, 0);
        world.spawn_player(0, Vec2::new(100.0, 100.0));
        tick(&mut world, &TickInput::default(), SIM_DT);

        let jump = TickInput {
            players: vec![PlayerInput {
                direction: Vec2::ZERO,
                jump: true,
            }],
        };
        let rest_y = world.players[0].pos.y;
        assert_eq!(world.outcome, Outcome::Running);
        tick(&mut world, &jump, SIM_DT);
        assert!(world.players[0].pos.y < rest_y);
        assert!(world.players[0].is_jumping);
    }

    #[test]
    fn test_player_clings_to_vertical_wall() {
        let mut world = empty_world();
        world.spawn_wall(Vec2::new(110.0, 100.0), Vec2::new(200.0, 7.0), 90.0, 0);
        world.spawn_player(0, Vec2::new(100.0, 100.0));

        tick(&mut world, &TickInput::default(), SIM_DT);
        let player = &world.players[0];
        assert!(player.on_wall);
        // Pushed left of the wall face at x = 106.5
        assert!((player.pos.x + 15.0 - 106.5).abs() < 1e-3);

        // No gravity while clinging
        let y = player.pos.y;
        assert_eq!(world.outcome, Outcome::Running);
        for _ in 0..10 {
            tick(&mut world, &TickInput::default(), SIM_DT);
            assert!(world.players[0].on_wall);
        }
        assert_eq!(world.time_ticks, 11);
        assert!((world.players[0].pos.y - y).abs() < 1e-5);
    }

    #[test]
    fn test_players_push_each_other_apart() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::new(0.0, 0.0));
        world.spawn_player(1, Vec2::new(20.0, 0.0));

        tick(&mut world, &TickInput::default(), SIM_DT);
        let gap = world.players[1].pos.x - world.players[0].pos.x;
        assert!(gap >= 30.0 - 1e-3);
        assert_eq!(world.players[0].vel.y, 0.0);
        assert_eq!(world.players[1].vel.y, 0.0);
    }

    #[test]
    fn test_missile_explodes_on_wall() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::new(-500.0, 0.0));
        world.spawn_wall(Vec2::new(0.0, 15.0), Vec2::new(100.0, 7.0), 0.0, 0);
        let id = world.spawn_missile(Vec2::ZERO, 0.0, 60.0, 0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(world.enemies.is_empty());
        assert_eq!(world.particles.len(), Debris::MISSILE.count);
        assert!(world.events.iter().any(|e| matches!(
            e,
            GameEvent::EnemyExploded { id: hit, kind: EntityKind::Missile, .. } if *hit == id
        )));
    }

    #[test]
    fn test_missile_kills_player_once() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::ZERO);
        world.spawn_missile(Vec2::new(0.0, -20.0), 0.0, 0.0, 0);
        world.spawn_missile(Vec2::new(0.0, 20.0), 0.0, 0.0, 0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(exploded_players(&world), 1);
        assert!(world.players.is_empty());
        // The second missile found nobody left to hit
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(
            world.particles.len(),
            Debris::PLAYER.count + Debris::MISSILE.count
        );
    }

    #[test]
    fn test_seeker_shockwave_kills_nearby_player() {
        let mut world = empty_world();
        world.tuning.seeker_lifespan = 0.01;
        world.spawn_player(0, Vec2::new(20.0, 0.0));
        world.spawn_player(1, Vec2::new(400.0, 0.0));
        world.spawn_seeker(Vec2::ZERO, 100.0, 0);

        // Fuse burns out on the first tick
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(matches!(
            world.enemies[0],
            Enemy::SeekerHead(SeekerHead {
                state: SeekerState::Exploding { .. },
                ..
            })
        ));
        assert_eq!(world.players.len(), 2);

        // Shockwave reaches the close player only
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(exploded_players(&world), 1);
        assert_eq!(world.players.len(), 1);
        assert_eq!(world.players[0].slot, 1);

        for _ in 0..30 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_seeker_homes_in() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::new(300.0, 0.0));
        world.spawn_seeker(Vec2::ZERO, 120.0, 0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        let pos = world.enemies[0].pos();
        assert!((pos.x - 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_boss_rebounds_off_wall_and_aims_again() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::new(-500.0, 0.0));
        world.spawn_wall(Vec2::new(100.0, 0.0), Vec2::new(100.0, 7.0), 90.0, 0);
        world.spawn_boss(Vec2::new(70.0, 0.0), 100.0, 0);
        if let Enemy::Boss(boss) = &mut world.enemies[0] {
            boss.state = BossState::Moving;
            boss.vel = Vec2::new(100.0, 0.0);
        }

        tick(&mut world, &TickInput::default(), SIM_DT);
        let Enemy::Boss(boss) = &world.enemies[0] else {
            panic!("boss missing");
        };
        assert_eq!(
            boss.state,
            BossState::Aiming {
                countdown: world.tuning.boss_aim_time
            }
        );
        assert!((boss.vel - Vec2::new(-10.0, 0.0)).length() < 1e-3);
        // Rim rests against the wall face at x = 96.5
        assert!((boss.pos.x + boss.radius - 96.5).abs() < 1e-3);
        assert!(
            world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::BossBounced { .. }))
        );
    }

    #[test]
    fn test_boss_crushes_player() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::new(50.0, 0.0));
        world.spawn_player(1, Vec2::new(-500.0, 0.0));
        world.spawn_boss(Vec2::ZERO, 100.0, 0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(exploded_players(&world), 1);
        assert_eq!(world.players.len(), 1);
    }

    #[test]
    fn test_boss_expires() {
        let mut world = empty_world();
        world.tuning.boss_lifespan = 0.001;
        world.spawn_player(0, Vec2::new(-500.0, 0.0));
        world.spawn_boss(Vec2::ZERO, 100.0, 0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        assert!(world.enemies.is_empty());
        assert_eq!(world.particles.len(), Debris::BOSS.count);
        assert!(
            world
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::ScreenShake { .. }))
        );
    }

    #[test]
    fn test_boss_leaves_aiming_after_countdown() {
        let mut world = empty_world();
        world.tuning.boss_aim_time = 0.01;
        world.spawn_player(0, Vec2::new(300.0, 0.0));
        world.spawn_boss(Vec2::ZERO, 100.0, 0);

        tick(&mut world, &TickInput::default(), SIM_DT);
        let Enemy::Boss(boss) = &world.enemies[0] else {
            panic!("boss missing");
        };
        assert_eq!(boss.state, BossState::Moving);
        assert!((boss.vel.length() - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::ZERO);
        world.spawn_player(1, Vec2::new(-500.0, 0.0));
        world.end_time = 1000.0;
        world.explode_player(0);
        world.compact();

        let start = world.particles[0].pos;
        let vel = world.particles[0].vel;
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.particles[0].pos, start + vel);

        for _ in 0..60 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_scene_cleared() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::ZERO);
        world.end_time = 0.05;

        for _ in 0..5 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(world.outcome, Outcome::Cleared);

        // Finished worlds do not advance
        let ticks = world.time_ticks;
        tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.time_ticks, ticks);
    }

    #[test]
    fn test_scene_lost() {
        let mut world = empty_world();
        world.spawn_player(0, Vec2::ZERO);
        world.spawn_missile(Vec2::new(0.0, 20.0), 0.0, 0.0, 0);
        world.end_time = 1000.0;

        for _ in 0..120 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(world.outcome, Outcome::Lost);
    }

    #[test]
    fn test_determinism() {
        let scene = SceneDesc::arena();
        let mut world1 = scene.build(99999, Tuning::default(), 2);
        let mut world2 = scene.build(99999, Tuning::default(), 2);

        let inputs = [
            TickInput {
                players: vec![PlayerInput {
                    direction: Vec2::new(1.0, 0.0),
                    jump: true,
                }],
            },
            TickInput::default(),
            TickInput {
                players: vec![
                    PlayerInput::default(),
                    PlayerInput {
                        direction: Vec2::new(-1.0, -1.0),
                        jump: true,
                    },
                ],
            },
        ];

        for step in 0..600 {
            let input = &inputs[step % inputs.len()];
            tick(&mut world1, input, SIM_DT);
            tick(&mut world2, input, SIM_DT);
        }

        assert_eq!(world1.time_ticks, world2.time_ticks);
        assert_eq!(world1.outcome, world2.outcome);
        assert_eq!(format!("{:?}", world1.players), format!("{:?}", world2.players));
        assert_eq!(format!("{:?}", world1.enemies), format!("{:?}", world2.enemies));
        assert_eq!(format!("{:?}", world1.particles), format!("{:?}", world2.particles));
    }
}
