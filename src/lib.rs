//! Shardfall - entity simulation and combat core for an arcade asteroid shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (kinematics, collisions, fragmentation, progression)
//! - `tuning`: Data-driven game balance
//! - `error`: Errors raised at the host-facing edges
//!
//! Screen space is used throughout: x grows to the right, y grows downward.
//! A facing angle of 0 points up the screen, positive angles turn counter-clockwise.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{TuningError, UpgradeError};
pub use tuning::Tuning;

use glam::Vec2;

/// Default balance constants (authoritative source for `Tuning::default()`)
pub mod consts {
    /// Reference frame rate the per-frame drag factor was balanced against
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 15.0;
    pub const SHIP_BASE_SPEED: f32 = 200.0;
    /// Max speed is double the base speed
    pub const SHIP_MAX_SPEED: f32 = SHIP_BASE_SPEED * 2.0;
    /// Triple the base speed for snappy thrust
    pub const SHIP_ACCELERATION: f32 = SHIP_BASE_SPEED * 3.0;
    /// Velocity multiplier applied every frame
    pub const SHIP_DRAG: f32 = 0.98;
    /// Radians per second (300°/s)
    pub const SHIP_TURN_SPEED: f32 = 300.0 * std::f32::consts::PI / 180.0;

    /// Firing
    pub const FIRE_INTERVAL: f32 = 0.5;
    pub const SHOT_SPEED: f32 = 500.0;
    pub const SHOT_RADIUS: f32 = 5.0;
    /// Every Nth batch is tracking once tracking shots are unlocked
    pub const TRACKING_EVERY: u32 = 5;
    /// Radians per second (180°/s)
    pub const TRACKING_TURN_RATE: f32 = std::f32::consts::PI;

    /// Shield (orbiting ring)
    pub const SHIELD_RING_SIZE: usize = 8;
    pub const SHIELD_ORBIT_RADIUS: f32 = 50.0;
    /// Radians per second (90°/s)
    pub const SHIELD_ROTATION_SPEED: f32 = std::f32::consts::FRAC_PI_2;
    pub const SHIELD_MAX_HITS: u32 = 2;
    pub const SHIELD_HIT_COOLDOWN: f32 = 0.5;
    /// Speed multiplier for an asteroid deflected by the shield
    pub const SHIELD_BOUNCE_FACTOR: f32 = 1.5;
    /// Gap left between ship and deflected asteroid
    pub const SHIELD_BOUNCE_MARGIN: f32 = 5.0;

    /// Asteroids
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_KINDS: u32 = 3;
    pub const ASTEROID_MAX_RADIUS: f32 = ASTEROID_MIN_RADIUS * ASTEROID_KINDS as f32;
    /// Split deflection range in degrees
    pub const SPLIT_ANGLE_MIN_DEG: f32 = 20.0;
    pub const SPLIT_ANGLE_MAX_DEG: f32 = 50.0;
    /// Children are this much faster than their parent
    pub const SPLIT_BOOST: f32 = 1.2;
    pub const OUTLINE_MIN_VERTICES: usize = 8;
    pub const OUTLINE_MAX_VERTICES: usize = 12;
    /// Max spin in radians per second
    pub const ASTEROID_MAX_SPIN: f32 = 2.0;

    /// Destruction effect
    pub const EFFECT_LIFETIME: f32 = 0.6;
    pub const EFFECT_MIN_LINES: usize = 6;
    pub const EFFECT_MAX_LINES: usize = 10;

    /// Spawner
    pub const SPAWN_INTERVAL: f32 = 0.8;
    /// Interval multiplier per level
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.9;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 0.2;
    pub const SPAWN_SPEED_MIN: f32 = 40.0;
    pub const SPAWN_SPEED_MAX: f32 = 100.0;
    /// Speed multiplier per level
    pub const SPAWN_SPEED_GROWTH: f32 = 1.1;
    pub const SPAWN_SPEED_CAP: f32 = 200.0;
    /// Max deviation from the inward edge normal, degrees
    pub const SPAWN_SPREAD_DEG: f32 = 30.0;

    /// Kills needed for each level
    pub const LEVEL_THRESHOLD_STEP: u32 = 50;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector a ship-style facing angle points along
///
/// Facing 0 is up the screen (0, -1); positive angles turn counter-clockwise on screen.
#[inline]
pub fn facing_vector(facing: f32) -> Vec2 {
    Vec2::new(-facing.sin(), -facing.cos())
}

/// Facing angle of a direction vector (inverse of [`facing_vector`])
///
/// A zero vector yields facing 0.
#[inline]
pub fn facing_of(dir: Vec2) -> f32 {
    if dir == Vec2::ZERO {
        return 0.0;
    }
    normalize_angle((-dir.x).atan2(-dir.y))
}

/// Rotate a vector by `angle` radians in the math (x-to-y) sense
#[inline]
pub fn rotate_by(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
