//! Flat Heroes headless runner
//!
//! Plays a scene with scripted inputs and logs what happens. Useful for
//! replaying a seed and for checking tuning changes without a renderer.
//!
//! Usage: flat-heroes [scene.json] [tuning.json] [seed] [players]

use std::path::Path;

use glam::Vec2;

use flat_heroes::consts::{MAX_SUBSTEPS, SIM_DT};
use flat_heroes::sim::{GameEvent, Outcome, PlayerInput, TickInput, World, tick};
use flat_heroes::{PLAYER_COLORS, SceneDesc, Tuning};

/// Display frames to simulate before giving up
const MAX_FRAMES: u32 = 60 * 120;

struct Runner {
    world: World,
    accumulator: f32,
    input: TickInput,
}

impl Runner {
    fn new(world: World, players: usize) -> Self {
        Self {
            world,
            accumulator: 0.0,
            input: TickInput {
                players: vec![PlayerInput::default(); players],
            },
        }
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.script_input();
            tick(&mut self.world, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in &self.world.events {
                log_event(event);
            }
        }
    }

    /// Each bot runs back and forth and hops now and then
    fn script_input(&mut self) {
        let t = self.world.time_ticks;
        for (slot, input) in self.input.players.iter_mut().enumerate() {
            let phase = t / 90 + slot as u64;
            input.direction = if phase % 2 == 0 { Vec2::X } else { Vec2::NEG_X };
            input.jump = (t + slot as u64 * 13) % 70 < 12;
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::PlayerExploded { id, pos } => {
            log::info!("Player {} exploded at ({:.1}, {:.1})", id, pos.x, pos.y)
        }
        GameEvent::EnemyExploded { id, kind, pos } => {
            log::info!("{:?} {} exploded at ({:.1}, {:.1})", kind, id, pos.x, pos.y)
        }
        GameEvent::ShockwaveStarted { id, .. } => log::debug!("Seeker {} shockwave", id),
        GameEvent::BossBounced { id, pos } => {
            log::debug!("Boss {} bounced at ({:.1}, {:.1})", id, pos.x, pos.y)
        }
        GameEvent::ScreenShake { intensity } => log::trace!("Shake {}", intensity),
    }
}

fn main() {
    env_logger::init();
    log::info!("Flat Heroes (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scene = match args.first() {
        Some(path) => SceneDesc::load(Path::new(path)),
        None => SceneDesc::arena(),
    };
    let tuning = match args.get(1) {
        Some(path) => Tuning::load(Path::new(path)),
        None => Tuning::default(),
    };
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    let players = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2usize)
        .min(PLAYER_COLORS.len());

    let world = scene.build(seed, tuning, players);
    let mut runner = Runner::new(world, players);

    let mut frames = 0;
    while runner.world.outcome == Outcome::Running && frames < MAX_FRAMES {
        // Alternate slightly long and short frames to exercise the accumulator
        let frame = if frames % 2 == 0 { SIM_DT * 1.25 } else { SIM_DT * 0.75 };
        runner.update(frame);
        frames += 1;
    }

    let world = &runner.world;
    log::info!(
        "{:?} after {} ticks ({:.2}s): {} players, {} enemies left",
        world.outcome,
        world.time_ticks,
        world.elapsed,
        world.players.len(),
        world.enemies.len()
    );
}
