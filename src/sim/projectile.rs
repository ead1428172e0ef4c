//! Projectiles: direct shots, tracking shots, and shield orbs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::nearest_point;
use super::kinematics::{Motion, integrate};
use super::state::Body;
use crate::{facing_of, facing_vector, normalize_angle, polar_to_cartesian, rotate_by};

/// How a projectile moves each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight line at constant velocity
    Direct,
    /// Steers toward the nearest asteroid at a bounded turn rate
    Tracking,
    /// Rigidly attached to the ship's rotating shield ring
    Shield {
        /// Slot angle on the ring (radians)
        ring_angle: f32,
        /// Distance from the ship's center
        orbit_radius: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: ProjectileKind,
    /// Heading for drawing (ship facing convention)
    pub facing: f32,
    alive: bool,
}

impl Projectile {
    /// A shot leaving `origin` along `facing`
    pub fn fired(origin: Vec2, facing: f32, tracking: bool, speed: f32, radius: f32) -> Self {
        let facing = normalize_angle(facing);
        Self {
            pos: origin,
            vel: facing_vector(facing) * speed,
            radius,
            kind: if tracking {
                ProjectileKind::Tracking
            } else {
                ProjectileKind::Direct
            },
            facing,
            alive: true,
        }
    }

    /// A shield orb at a ring slot; positioned by [`Projectile::place_on_orbit`]
    pub fn orbiting(center: Vec2, ring_angle: f32, orbit_radius: f32, radius: f32) -> Self {
        let mut orb = Self {
            pos: center,
            vel: Vec2::ZERO,
            radius,
            kind: ProjectileKind::Shield {
                ring_angle,
                orbit_radius,
            },
            facing: 0.0,
            alive: true,
        };
        orb.place_on_orbit(center, 0.0);
        orb
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.kind, ProjectileKind::Shield { .. })
    }

    /// Per-frame update for free-flying shots
    ///
    /// Tracking shots steer toward the nearest of `targets` first. Shield orbs
    /// are left alone; the shield moves them.
    pub fn update(&mut self, dt: f32, targets: &[Vec2], turn_rate: f32) {
        match self.kind {
            ProjectileKind::Shield { .. } => return,
            ProjectileKind::Tracking => {
                if let Some(target) = nearest_point(self.pos, targets) {
                    self.steer_toward(target, turn_rate * dt);
                }
            }
            ProjectileKind::Direct => {}
        }
        integrate(&mut self.pos, &mut self.vel, Vec2::ZERO, Motion::FREE, dt);
    }

    /// Rotate the velocity toward `target` by at most `max_turn` radians
    pub fn steer_toward(&mut self, target: Vec2, max_turn: f32) {
        let to_target = target - self.pos;
        if to_target == Vec2::ZERO || self.vel == Vec2::ZERO {
            return;
        }
        let current = self.vel.y.atan2(self.vel.x);
        let bearing = to_target.y.atan2(to_target.x);
        let delta = normalize_angle(bearing - current).clamp(-max_turn, max_turn);
        self.vel = rotate_by(self.vel, delta);
        self.facing = facing_of(self.vel);
    }

    /// Snap a shield orb onto its ring around `center`
    pub fn place_on_orbit(&mut self, center: Vec2, shield_angle: f32) {
        if let ProjectileKind::Shield {
            ring_angle,
            orbit_radius,
        } = self.kind
        {
            let theta = ring_angle + shield_angle;
            self.pos = center + polar_to_cartesian(orbit_radius, theta);
            self.facing = normalize_angle(theta);
        }
    }
}

impl Body for Projectile {
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
