//! Collision response protocol
//!
//! The engine hands back an MTV with an arbitrary sign. Every entity that
//! reacts to a contact first orients it so it points from the counterpart
//! toward itself, then moves itself by exactly that vector. What else
//! happens (landing, dying, bouncing) depends on who touched whom and is
//! looked up in [`response_for`].

use glam::Vec2;

use super::shape::Collider;

/// Entity categories taking part in collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Wall,
    Missile,
    SeekerHead,
    Boss,
    /// A seeker head's expanding explosion ring
    Shockwave,
}

/// Flip `mtv` so it points from `other_pos` toward `self_pos`
#[inline]
pub fn orient_mtv(self_pos: Vec2, other_pos: Vec2, mtv: Vec2) -> Vec2 {
    let separation = other_pos - self_pos;
    if separation.dot(mtv) > 0.0 { -mtv } else { mtv }
}

/// Query the engine and orient the result for `this`
pub fn contact<A, B>(this: &A, other: &B) -> Option<Vec2>
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let mtv = this.shape().overlap(&other.shape())?;
    Some(orient_mtv(this.position(), other.position(), mtv))
}

/// What a contact does to the entity that detected it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Response {
    /// Move self out by the oriented MTV
    pub push_out: bool,
    /// Zero the vertical velocity component
    pub stop_vertical: bool,
    /// Zero the whole velocity
    pub stop: bool,
    /// Restore jumping (landed on something solid)
    pub ground: bool,
    /// Self blows up
    pub explode_self: bool,
    /// The counterpart blows up
    pub explode_other: bool,
    /// Extra impulse of this magnitude along the MTV
    pub rebound: Option<f32>,
    /// Go back to aiming
    pub retarget: bool,
}

impl Response {
    pub const NONE: Response = Response {
        push_out: false,
        stop_vertical: false,
        stop: false,
        ground: false,
        explode_self: false,
        explode_other: false,
        rebound: None,
        retarget: false,
    };
}

/// Rebound impulse applied to the boss when it hits a wall
pub const BOSS_REBOUND: f32 = 10.0;

/// Response table for `(self, other)` contacts
pub fn response_for(this: EntityKind, other: EntityKind) -> Response {
    use EntityKind::*;
    match (this, other) {
        (Player, Wall) => Response {
            push_out: true,
            stop_vertical: true,
            ground: true,
            ..Response::NONE
        },
        (Player, Player) => Response {
            push_out: true,
            stop_vertical: true,
            ..Response::NONE
        },
        (Missile, Wall) => Response {
            explode_self: true,
            ..Response::NONE
        },
        (Missile, Player) => Response {
            explode_self: true,
            explode_other: true,
            ..Response::NONE
        },
        (SeekerHead, Wall) => Response {
            push_out: true,
            ..Response::NONE
        },
        (Shockwave, Player) | (Boss, Player) => Response {
            explode_other: true,
            ..Response::NONE
        },
        (Boss, Wall) => Response {
            push_out: true,
            stop: true,
            rebound: Some(BOSS_REBOUND),
            retarget: true,
            ..Response::NONE
        },
        _ => Response::NONE,
    }
}

/// Kinematic state the generic part of a response edits
pub trait Body {
    fn position_mut(&mut self) -> &mut Vec2;
    fn velocity_mut(&mut self) -> &mut Vec2;
}

/// Apply the position and velocity part of `response` for an oriented `mtv`.
///
/// Flags and destruction are left to the caller since they are specific to
/// each entity.
pub fn apply_motion<T: Body + ?Sized>(body: &mut T, response: &Response, mtv: Vec2) {
    if response.stop {
        *body.velocity_mut() = Vec2::ZERO;
    }
    if response.stop_vertical {
        body.velocity_mut().y = 0.0;
    }
    if response.push_out {
        *body.position_mut() += mtv;
    }
    if let Some(magnitude) = response.rebound {
        *body.velocity_mut() += super::vector::set_magnitude(mtv, magnitude);
    }
}
