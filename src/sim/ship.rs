//! The player ship: thrust, turning, wrap-around, and firing

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::kinematics::{Bounds, Motion, integrate};
use super::progression::Upgrade;
use super::projectile::Projectile;
use super::shield::Shield;
use super::state::Body;
use super::tick::{Action, ActionQuery};
use crate::tuning::Tuning;
use crate::{facing_vector, normalize_angle};

/// Firing upgrades the ship has unlocked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    /// Extra shot straight behind
    pub dual_shot: bool,
    /// Extra shots to port and starboard
    pub side_shot: bool,
    /// Every Nth batch homes on asteroids
    pub tracking_shots: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Acceleration applied last step
    pub acc: Vec2,
    /// Radians, 0 = up the screen
    pub facing: f32,
    pub radius: f32,
    pub loadout: Loadout,
    /// 2^(rapid-fire tiers taken)
    pub fire_rate_multiplier: f32,
    pub shield: Shield,
    /// Session time of the last successful fire
    last_fire: Option<f32>,
    /// Batches fired since tracking shots were unlocked, mod `tracking_every`
    shot_counter: u32,
    alive: bool,
}

impl Ship {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            facing: 0.0,
            radius: tuning.ship_radius,
            loadout: Loadout::default(),
            fire_rate_multiplier: 1.0,
            shield: Shield::default(),
            last_fire: None,
            shot_counter: 0,
            alive: true,
        }
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_active()
    }

    /// Seconds between shots with the current multiplier
    pub fn fire_interval(&self, tuning: &Tuning) -> f32 {
        tuning.fire_interval / self.fire_rate_multiplier
    }

    /// Unit vector the nose points along
    pub fn heading(&self) -> Vec2 {
        facing_vector(self.facing)
    }

    /// Apply held controls, integrate, wrap at the edges, and carry the shield
    pub fn advance(&mut self, input: &impl ActionQuery, dt: f32, tuning: &Tuning) {
        if input.held(Action::TurnLeft) {
            self.facing += tuning.ship_turn_speed * dt;
        }
        if input.held(Action::TurnRight) {
            self.facing -= tuning.ship_turn_speed * dt;
        }
        self.facing = normalize_angle(self.facing);

        // Forward wins when both are held
        let thrust = if input.held(Action::ThrustForward) {
            1.0
        } else if input.held(Action::ThrustBack) {
            -1.0
        } else {
            0.0
        };
        self.acc = self.heading() * tuning.ship_acceleration * thrust;

        let motion = Motion {
            drag: tuning.ship_drag,
            max_speed: Some(tuning.ship_max_speed),
        };
        integrate(&mut self.pos, &mut self.vel, self.acc, motion, dt);

        let bounds = Bounds::new(tuning.arena_width, tuning.arena_height);
        if bounds.wrap(&mut self.pos, self.radius) {
            log::trace!("Ship wrapped to ({:.0}, {:.0})", self.pos.x, self.pos.y);
        }

        self.shield.update(self.pos, dt, tuning);
    }

    /// Fire a batch if the rate limit allows; otherwise returns nothing
    ///
    /// `now` is session time in seconds.
    pub fn shoot(&mut self, now: f32, tuning: &Tuning) -> Vec<Projectile> {
        let interval = self.fire_interval(tuning);
        if self.last_fire.is_some_and(|last| now - last < interval) {
            return Vec::new();
        }
        self.last_fire = Some(now);

        let tracking = if self.loadout.tracking_shots {
            self.shot_counter = (self.shot_counter + 1) % tuning.tracking_every.max(1);
            self.shot_counter == 0
        } else {
            false
        };

        let mut angles = vec![self.facing];
        if self.loadout.dual_shot {
            angles.push(self.facing + PI);
        }
        if self.loadout.side_shot {
            angles.push(self.facing + FRAC_PI_2);
            angles.push(self.facing - FRAC_PI_2);
        }

        angles
            .into_iter()
            .map(|angle| {
                Projectile::fired(self.pos, angle, tracking, tuning.shot_speed, tuning.shot_radius)
            })
            .collect()
    }

    /// Put the ship back at `center`, at rest and facing up
    pub fn recenter(&mut self, center: Vec2, tuning: &Tuning) {
        self.pos = center;
        self.vel = Vec2::ZERO;
        self.acc = Vec2::ZERO;
        self.facing = 0.0;
        self.shield.update(center, 0.0, tuning);
    }

    /// Apply an upgrade's effect; applying one twice changes nothing more
    pub fn apply_upgrade(&mut self, upgrade: Upgrade, fire_rate_multiplier: f32, tuning: &Tuning) {
        match upgrade {
            Upgrade::RapidFire
            | Upgrade::SuperRapidFire
            | Upgrade::UltraRapidFire
            | Upgrade::MegaRapidFire => self.fire_rate_multiplier = fire_rate_multiplier,
            Upgrade::DualShot => self.loadout.dual_shot = true,
            Upgrade::SideShots => self.loadout.side_shot = true,
            Upgrade::TrackingShots => self.loadout.tracking_shots = true,
            Upgrade::Shield => {
                if !self.has_shield() {
                    self.shield.grant(self.pos, tuning);
                }
            }
        }
    }
}

impl Body for Ship {
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
