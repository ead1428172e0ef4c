//! Collision detection and shielded-impact response
//!
//! Every collider is a circle. The detector never owns or mutates entities;
//! the tick decides what a hit means.
//!
//! No swept test is done: a body fast enough to cross another between two
//! frames can tunnel through it.

use glam::Vec2;

use super::state::Body;

/// Circle-circle overlap (touching counts)
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}

/// True iff both bodies collide and their circles overlap
///
/// Bodies without a collision radius (destruction effects) never collide.
pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    match (a.collision_radius(), b.collision_radius()) {
        (Some(ra), Some(rb)) => circles_overlap(a.pos(), ra, b.pos(), rb),
        _ => false,
    }
}

/// New placement for an asteroid deflected off the ship's shield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Push an asteroid off a shielded ship
///
/// The asteroid is moved to just outside the combined radii along the
/// ship→asteroid direction and sent off along that direction at
/// `factor` × its previous speed. Returns `None` when the centers coincide.
pub fn shield_bounce(
    ship_pos: Vec2,
    ship_radius: f32,
    asteroid_pos: Vec2,
    asteroid_radius: f32,
    asteroid_vel: Vec2,
    factor: f32,
    margin: f32,
) -> Option<Bounce> {
    let away = (asteroid_pos - ship_pos).try_normalize()?;
    Some(Bounce {
        pos: ship_pos + away * (ship_radius + asteroid_radius + margin),
        vel: away * asteroid_vel.length() * factor,
    })
}

/// Closest point to `from`, if any
pub fn nearest_point(from: Vec2, points: &[Vec2]) -> Option<Vec2> {
    points
        .iter()
        .copied()
        .min_by(|a, b| {
            a.distance_squared(from)
                .partial_cmp(&b.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
