//! Asteroid sources
//!
//! The session pulls new asteroids from an [`AsteroidSource`] once per frame.
//! [`EdgeSpawner`] is the arcade field: rocks drift in from the four edges,
//! more often and faster as the level climbs.

use glam::Vec2;
use rand::Rng;

use super::fragment::Asteroid;
use super::state::SimRng;
use crate::rotate_by;
use crate::tuning::Tuning;

/// Produces asteroids for the session each frame
pub trait AsteroidSource: std::fmt::Debug {
    fn produce(&mut self, dt: f32, level: u32, tuning: &Tuning, rng: &mut SimRng) -> Vec<Asteroid>;
}

/// Never spawns anything (scripted scenarios and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAsteroids;

impl AsteroidSource for NoAsteroids {
    fn produce(&mut self, _dt: f32, _level: u32, _tuning: &Tuning, _rng: &mut SimRng) -> Vec<Asteroid> {
        Vec::new()
    }
}

/// Seconds between spawns at `level`
pub fn spawn_interval(level: u32, tuning: &Tuning) -> f32 {
    let scaled = tuning.spawn_interval * tuning.spawn_interval_decay.powi(level_steps(level));
    scaled.max(tuning.spawn_interval_floor)
}

/// Inclusive spawn speed range at `level`
pub fn speed_range(level: u32, tuning: &Tuning) -> (f32, f32) {
    let growth = tuning.spawn_speed_growth.powi(level_steps(level));
    let hi = (tuning.spawn_speed_max * growth).min(tuning.spawn_speed_cap);
    let lo = (tuning.spawn_speed_min * growth).min(hi);
    (lo, hi)
}

fn level_steps(level: u32) -> i32 {
    level.saturating_sub(1) as i32
}

/// Spawns one asteroid just outside a random edge every interval
#[derive(Debug, Clone, Default)]
pub struct EdgeSpawner {
    timer: f32,
}

impl EdgeSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_one(&self, level: u32, tuning: &Tuning, rng: &mut SimRng) -> Asteroid {
        let margin = tuning.asteroid_max_radius();
        let (w, h) = (tuning.arena_width, tuning.arena_height);
        let along: f32 = rng.random();

        // Inward normal and start point for each edge: left, right, top, bottom
        let (normal, pos) = match rng.random_range(0..4) {
            0 => (Vec2::X, Vec2::new(-margin, along * h)),
            1 => (Vec2::NEG_X, Vec2::new(w + margin, along * h)),
            2 => (Vec2::Y, Vec2::new(along * w, -margin)),
            _ => (Vec2::NEG_Y, Vec2::new(along * w, h + margin)),
        };

        let (lo, hi) = speed_range(level, tuning);
        let speed = rng.random_range(lo..=hi);
        let spread = tuning.spawn_spread_deg.abs();
        let deviation = rng.random_range(-spread..=spread).to_radians();
        let vel = rotate_by(normal, deviation) * speed;

        let kind = rng.random_range(1..=tuning.asteroid_kinds.max(1));
        let radius = tuning.asteroid_min_radius * kind as f32;

        log::trace!(
            "Spawned r={radius} asteroid at ({:.0}, {:.0}) speed {speed:.0}",
            pos.x,
            pos.y
        );
        Asteroid::new(pos, vel, radius, tuning, rng)
    }
}

impl AsteroidSource for EdgeSpawner {
    fn produce(&mut self, dt: f32, level: u32, tuning: &Tuning, rng: &mut SimRng) -> Vec<Asteroid> {
        self.timer += dt;
        if self.timer <= spawn_interval(level, tuning) {
            return Vec::new();
        }
        self.timer = 0.0;
        vec![self.spawn_one(level, tuning, rng)]
    }
}
