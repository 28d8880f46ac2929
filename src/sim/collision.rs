//! Circle-vs-circle collision and response
//!
//! Every contact in the game is a moving circle against a static one. The
//! mover is reflected about the contact normal and pushed back out so the two
//! circles just touch.

use glam::Vec2;

use super::shape::{Circle, Mover};
use crate::audio::{SoundEffect, SoundSink};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal from the obstacle centre toward the mover centre
    pub normal: Vec2,
    /// Distance between centres
    pub distance: f32,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            distance: 0.0,
            penetration: 0.0,
        }
    }
}

/// Test a circle against an obstacle circle
///
/// Touching counts as a hit. Coincident centres have no usable normal and are
/// reported as a miss.
pub fn circle_collision(circle: &Circle, obstacle: &Circle) -> CollisionResult {
    let offset = circle.center - obstacle.center;
    let distance = offset.length();
    let reach = circle.radius + obstacle.radius;

    if distance > reach || distance == 0.0 {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        normal: offset / distance,
        distance,
        penetration: reach - distance,
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Collide a mover with a static circle
///
/// On contact the mover's velocity is reflected about the normal, an
/// overlapping mover is placed exactly `r1 + r2` from the obstacle centre, and
/// `effect` is emitted once. Returns whether contact happened.
pub fn collide_mover(
    mover: &mut Mover,
    obstacle: &Circle,
    effect: SoundEffect,
    sfx: &mut impl SoundSink,
) -> bool {
    let result = circle_collision(&mover.shape, obstacle);
    if !result.hit {
        return false;
    }

    mover.vel = reflect_velocity(mover.vel, result.normal);

    if result.penetration > 0.0 {
        let reach = mover.shape.radius + obstacle.radius;
        mover.shape.center = obstacle.center + result.normal * reach;
    }

    sfx.emit(effect);
    true
}
