//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (reverse insertion order, removals deferred)
//! - No rendering or platform dependencies

pub mod response;
pub mod sat;
pub mod shape;
pub mod state;
pub mod tick;
pub mod vector;

pub use response::{Body, EntityKind, Response, apply_motion, contact, orient_mtv, response_for};
pub use sat::{Projection, overlap_circle_polygon, overlap_polygons};
pub use shape::{Collider, Shape, rectangle_vertices, triangle_vertices};
pub use state::{
    Boss, BossState, Debris, Enemy, GameEvent, Missile, Outcome, Particle, Player, PlayerInput,
    SeekerHead, SeekerState, Shockwave, Wall, World,
};
pub use tick::{TickInput, tick};
