//! Orbiting shield ring
//!
//! The shield is a ring of orbs rigidly following the ship. It absorbs a
//! bounded number of asteroid impacts:
//! - Full: whole ring, no hits taken
//! - Weakened: every other orb of the previous ring survives
//! - Depleted: ring gone, ship is vulnerable again (back to Inactive)
//!
//! A hit cooldown keeps one physical impact that spans several frames from
//! counting more than once.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShieldStage {
    #[default]
    Inactive,
    Full,
    Weakened,
}

/// Result of offering an impact to the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shield inactive or still on hit cooldown; no hit consumed
    Ignored { active: bool },
    /// Hit absorbed, ring thinned
    Weakened { hits_taken: u32, remaining: usize },
    /// Last hit absorbed; shield is now inactive
    Depleted,
}

impl HitOutcome {
    /// Whether the shield is still up after this hit
    pub fn shield_active(&self) -> bool {
        match self {
            HitOutcome::Ignored { active } => *active,
            HitOutcome::Weakened { .. } => true,
            HitOutcome::Depleted => false,
        }
    }
}

/// Number of orbs a shield has after `hits_taken` hits
///
/// Each hit keeps the even-indexed half of the ring (rounded up); reaching
/// `max_hits` leaves nothing.
pub fn shot_slots(hits_taken: u32, ring_size: usize, max_hits: u32) -> usize {
    if hits_taken >= max_hits {
        return 0;
    }
    (0..hits_taken).fold(ring_size, |slots, _| slots.div_ceil(2))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Shield {
    stage: ShieldStage,
    hits_taken: u32,
    /// Current ring rotation (radians)
    angle: f32,
    /// Seconds until another hit can count
    cooldown: f32,
    orbs: Vec<Projectile>,
}

impl Shield {
    pub fn stage(&self) -> ShieldStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != ShieldStage::Inactive
    }

    pub fn hits_taken(&self) -> u32 {
        self.hits_taken
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown > 0.0
    }

    pub fn orbs(&self) -> &[Projectile] {
        &self.orbs
    }

    /// Raise a full-strength ring around `center`
    pub fn grant(&mut self, center: Vec2, tuning: &Tuning) {
        let ring_size = shot_slots(0, tuning.shield_ring_size, tuning.shield_max_hits);
        let spacing = TAU / ring_size.max(1) as f32;
        self.stage = ShieldStage::Full;
        self.hits_taken = 0;
        self.cooldown = 0.0;
        self.orbs = (0..ring_size)
            .map(|i| {
                let mut orb = Projectile::orbiting(
                    center,
                    i as f32 * spacing,
                    tuning.shield_orbit_radius,
                    tuning.shot_radius,
                );
                orb.place_on_orbit(center, self.angle);
                orb
            })
            .collect();
        log::info!("Shield raised ({} orbs)", self.orbs.len());
    }

    /// Bring an active shield back to full strength (level-up reset)
    pub fn restore(&mut self, center: Vec2, tuning: &Tuning) {
        if self.is_active() {
            self.grant(center, tuning);
        }
    }

    /// Count one impact against the shield
    pub fn absorb_hit(&mut self, tuning: &Tuning) -> HitOutcome {
        if !self.is_active() || self.on_cooldown() {
            return HitOutcome::Ignored {
                active: self.is_active(),
            };
        }

        self.hits_taken += 1;
        self.cooldown = tuning.shield_hit_cooldown;

        if self.hits_taken >= tuning.shield_max_hits {
            self.orbs.clear();
            self.stage = ShieldStage::Inactive;
            log::info!("Shield depleted after {} hits", self.hits_taken);
            return HitOutcome::Depleted;
        }

        // Survivors keep their ring slots
        let orbs = std::mem::take(&mut self.orbs);
        self.orbs = orbs.into_iter().step_by(2).collect();
        self.stage = ShieldStage::Weakened;
        log::info!(
            "Shield weakened: {} hits taken, {} orbs left",
            self.hits_taken,
            self.orbs.len()
        );
        HitOutcome::Weakened {
            hits_taken: self.hits_taken,
            remaining: self.orbs.len(),
        }
    }

    /// Rotate the ring, tick the hit cooldown, and move orbs with the ship
    pub fn update(&mut self, center: Vec2, dt: f32, tuning: &Tuning) {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        if !self.is_active() {
            return;
        }
        self.angle = (self.angle + tuning.shield_rotation_speed * dt).rem_euclid(TAU);
        for orb in &mut self.orbs {
            orb.place_on_orbit(center, self.angle);
        }
    }
}
