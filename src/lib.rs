//! Flat Heroes - a local multiplayer arcade action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (SAT collisions, entity response, world tick)
//! - `tuning`: Data-driven game balance
//! - `scene`: Scene descriptions the world is built from

pub mod scene;
pub mod sim;
pub mod tuning;

pub use scene::SceneDesc;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical scene dimensions (walls are laid out on a 100 unit grid inside)
    pub const SCENE_WIDTH: f32 = 800.0;
    pub const SCENE_HEIGHT: f32 = 800.0;
    pub const GRID_CELL: f32 = 100.0;
    /// Wall thickness
    pub const WALL_THICKNESS: f32 = 7.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Seeker head silhouette
    pub const SEEKER_WIDTH: f32 = 10.0;
    pub const SEEKER_HEIGHT: f32 = 20.0;
    /// Boss radius
    pub const BOSS_RADIUS: f32 = 40.0;
}

/// Player colors by controller slot
pub const PLAYER_COLORS: [u32; 4] = [0x80_00_80, 0xFF_FF_00, 0x00_80_00, 0xFF_C0_CB];
