//! Asteroids, their fragmentation, and the debris effect left behind
//!
//! A destroyed asteroid splits into two smaller, faster children until it
//! reaches the minimum radius. Each generation loses `asteroid_min_radius`, so
//! an asteroid of radius `r` can be split at most `r / min` times.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::kinematics::{Motion, integrate};
use super::state::Body;
use crate::tuning::Tuning;
use crate::{normalize_angle, polar_to_cartesian, rotate_by};

/// A drifting, spinning rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Current rotation of the outline (radians)
    pub rotation: f32,
    /// Radians per second
    pub spin: f32,
    /// Vertex offsets from the center, fixed at creation
    pub outline: Vec<Vec2>,
    alive: bool,
}

impl Asteroid {
    /// Create an asteroid with a fresh random outline and spin
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let outline = generate_outline(
            radius,
            tuning.outline_min_vertices,
            tuning.outline_max_vertices,
            rng,
        );
        let max_spin = tuning.asteroid_max_spin;
        let spin = if max_spin > 0.0 {
            rng.random_range(-max_spin..=max_spin)
        } else {
            0.0
        };
        Self {
            pos,
            vel,
            radius,
            rotation: rng.random_range(-std::f32::consts::PI..std::f32::consts::PI),
            spin,
            outline,
            alive: true,
        }
    }

    /// Drift and spin
    pub fn update(&mut self, dt: f32) {
        integrate(&mut self.pos, &mut self.vel, Vec2::ZERO, Motion::FREE, dt);
        self.rotation = normalize_angle(self.rotation + self.spin * dt);
    }

    /// Size tier (1 = smallest)
    pub fn tier(&self, min_radius: f32) -> u32 {
        (self.radius / min_radius).round().max(1.0) as u32
    }

    /// Outline vertices in world space, rotated
    pub fn world_outline(&self) -> Vec<Vec2> {
        self.outline
            .iter()
            .map(|&v| self.pos + rotate_by(v, self.rotation))
            .collect()
    }
}

impl Body for Asteroid {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
}

/// Lumpy polygon around a circle of `radius`
fn generate_outline(radius: f32, min_vertices: usize, max_vertices: usize, rng: &mut impl Rng) -> Vec<Vec2> {
    let count = rng.random_range(min_vertices..=max_vertices);
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let jitter = rng.random_range(-0.3..0.3) * step;
            let r = radius * rng.random_range(0.75..=1.0);
            polar_to_cartesian(r, i as f32 * step + jitter)
        })
        .collect()
}

/// Cosmetic burst left where an asteroid died; never collides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestructionEffect {
    pub pos: Vec2,
    pub radius: f32,
    pub age: f32,
    pub lifetime: f32,
    /// Radial segments (start, end) as offsets from `pos`, fixed at creation
    pub lines: Vec<(Vec2, Vec2)>,
    alive: bool,
}

impl DestructionEffect {
    pub fn new(pos: Vec2, radius: f32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let count = rng.random_range(tuning.effect_min_lines..=tuning.effect_max_lines);
        let lines = (0..count)
            .map(|_| {
                let theta = rng.random_range(0.0..TAU);
                let inner = radius * rng.random_range(0.0..0.3);
                let outer = radius * rng.random_range(0.6..1.2);
                (polar_to_cartesian(inner, theta), polar_to_cartesian(outer, theta))
            })
            .collect();
        Self {
            pos,
            radius,
            age: 0.0,
            lifetime: tuning.effect_lifetime,
            lines,
            alive: true,
        }
    }

    /// Age the effect; it dies once its age exceeds the lifetime
    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        if self.age > self.lifetime {
            self.alive = false;
        }
    }

    /// 0 at creation, 1 at expiry (for fading)
    pub fn progress(&self) -> f32 {
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

impl Body for DestructionEffect {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        Vec2::ZERO
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn is_alive(&self) -> bool {
        self.alive
    }
    fn kill(&mut self) {
        self.alive = false;
    }
    fn collision_radius(&self) -> Option<f32> {
        None
    }
}

/// What a destroyed asteroid leaves behind
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub effect: DestructionEffect,
    /// Zero (terminal size) or two children
    pub children: Vec<Asteroid>,
}

/// Destroy an asteroid and produce its fragments
///
/// The asteroid is marked dead first. Returns `None` if it was already dead,
/// so an asteroid is only ever split once.
pub fn split(asteroid: &mut Asteroid, tuning: &Tuning, rng: &mut impl Rng) -> Option<SplitOutcome> {
    if !asteroid.is_alive() {
        return None;
    }
    asteroid.kill();

    let effect = DestructionEffect::new(asteroid.pos, asteroid.radius, tuning, rng);
    let min_radius = tuning.asteroid_min_radius;
    if asteroid.radius <= min_radius {
        log::trace!("Asteroid r={} destroyed (terminal)", asteroid.radius);
        return Some(SplitOutcome {
            effect,
            children: Vec::new(),
        });
    }

    let deflection = rng
        .random_range(tuning.split_angle_min_deg..=tuning.split_angle_max_deg)
        .to_radians();
    let child_radius = asteroid.radius - min_radius;
    let children = [deflection, -deflection]
        .into_iter()
        .map(|angle| {
            let vel = rotate_by(asteroid.vel, angle) * tuning.split_boost;
            Asteroid::new(asteroid.pos, vel, child_radius, tuning, rng)
        })
        .collect();

    log::debug!(
        "Asteroid r={} split into two r={} at ±{:.1}°",
        asteroid.radius,
        child_radius,
        deflection.to_degrees()
    );
    Some(SplitOutcome { effect, children })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rock(radius: f32, vel: Vec2, rng: &mut Pcg32) -> Asteroid {
        Asteroid::new(Vec2::new(400.0, 250.0), vel, radius, &Tuning::default(), rng)
    }

    #[test]
    fn test_min_radius_split_is_terminal() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut asteroid = rock(tuning.asteroid_min_radius, Vec2::new(0.0, 50.0), &mut rng);

        let outcome = split(&mut asteroid, &tuning, &mut rng).unwrap();
        assert!(!asteroid.is_alive());
        assert!(outcome.children.is_empty());
        assert_eq!(outcome.effect.pos, Vec2::new(400.0, 250.0));
        assert_eq!(outcome.effect.radius, tuning.asteroid_min_radius);
    }

    #[test]
    fn test_split_yields_two_faster_diverging_children() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let parent_vel = Vec2::new(0.0, 50.0);
        let mut asteroid = rock(tuning.asteroid_min_radius + 12.0, parent_vel, &mut rng);

        let outcome = split(&mut asteroid, &tuning, &mut rng).unwrap();
        assert_eq!(outcome.children.len(), 2);
        for child in &outcome.children {
            assert!((child.radius - 12.0).abs() < 1e-5);
            assert_eq!(child.pos, asteroid.pos);
            assert!(child.vel.length() > parent_vel.length());
            assert!((child.vel.length() - 50.0 * tuning.split_boost).abs() < 1e-3);

            let angle = parent_vel.angle_to(child.vel).abs().to_degrees();
            assert!((20.0 - 1e-3..=50.0 + 1e-3).contains(&angle), "deflection {angle}");
        }
        // Mirror-image deflections
        let a = parent_vel.angle_to(outcome.children[0].vel);
        let b = parent_vel.angle_to(outcome.children[1].vel);
        assert!((a + b).abs() < 1e-4);
    }

    #[test]
    fn test_split_only_once() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut asteroid = rock(60.0, Vec2::X * 30.0, &mut rng);
        assert!(split(&mut asteroid, &tuning, &mut rng).is_some());
        assert!(split(&mut asteroid, &tuning, &mut rng).is_none());
    }

    #[test]
    fn test_children_get_fresh_outlines() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut asteroid = rock(60.0, Vec2::X * 30.0, &mut rng);
        let outcome = split(&mut asteroid, &tuning, &mut rng).unwrap();
        for child in &outcome.children {
            assert!(child.outline.len() >= tuning.outline_min_vertices);
            assert!(child.outline.iter().all(|v| v.length() <= child.radius + 1e-3));
            assert_ne!(child.outline, asteroid.outline);
        }
    }

    #[test]
    fn test_effect_expires_after_lifetime() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut effect = DestructionEffect::new(Vec2::ZERO, 40.0, &tuning, &mut rng);
        assert!(effect.collision_radius().is_none());
        assert!((tuning.effect_min_lines..=tuning.effect_max_lines).contains(&effect.lines.len()));

        effect.update(tuning.effect_lifetime * 0.5);
        assert!(effect.is_alive());
        assert!((effect.progress() - 0.5).abs() < 1e-5);

        effect.update(tuning.effect_lifetime);
        assert!(!effect.is_alive());
    }

    #[test]
    fn test_asteroid_drifts_and_spins() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut asteroid = rock(40.0, Vec2::new(10.0, 0.0), &mut rng);
        asteroid.spin = 1.0;
        asteroid.rotation = 0.0;
        asteroid.update(0.5);
        assert!(asteroid.pos.abs_diff_eq(Vec2::new(405.0, 250.0), 1e-4));
        assert!((asteroid.rotation - 0.5).abs() < 1e-6);
        assert_eq!(asteroid.tier(20.0), 2);
    }

    proptest! {
        #[test]
        fn prop_fragmentation_terminates(tiers in 1u32..6, seed in any::<u64>()) {
            let tuning = Tuning::default();
            let min = tuning.asteroid_min_radius;
            let mut rng = Pcg32::seed_from_u64(seed);
            let initial = min * tiers as f32;

            let mut frontier = vec![rock(initial, Vec2::new(30.0, 10.0), &mut rng)];
            let mut generations = 0u32;
            let mut destroyed = 0u32;
            while !frontier.is_empty() {
                generations += 1;
                prop_assert!(generations <= tiers);
                let mut next = Vec::new();
                for mut asteroid in frontier {
                    let outcome = split(&mut asteroid, &tuning, &mut rng).unwrap();
                    destroyed += 1;
                    for child in outcome.children {
                        prop_assert!(child.radius < asteroid.radius);
                        prop_assert!(child.radius >= min);
                        next.push(child);
                    }
                }
                frontier = next;
            }
            prop_assert_eq!(generations, tiers);
            // Full binary tree of depth `tiers`
            prop_assert_eq!(destroyed, (1u32 << tiers) - 1);
        }
    }
}
