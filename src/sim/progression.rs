//! Score-driven leveling and the branching upgrade tree
//!
//! Every destroyed asteroid is worth one point. Crossing the running threshold
//! advances the level and, for levels 2 through 5, offers two upgrades picked
//! from what the player already owns. Play is blocked until one is chosen.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::UpgradeError;

/// Last level that comes with an upgrade offer
pub const MAX_OFFER_LEVEL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    RapidFire,
    SuperRapidFire,
    UltraRapidFire,
    MegaRapidFire,
    DualShot,
    SideShots,
    TrackingShots,
    Shield,
}

impl Upgrade {
    pub fn name(&self) -> &'static str {
        match self {
            Upgrade::RapidFire => "Rapid Fire",
            Upgrade::SuperRapidFire => "Super Rapid Fire",
            Upgrade::UltraRapidFire => "Ultra Rapid Fire",
            Upgrade::MegaRapidFire => "Mega Rapid Fire",
            Upgrade::DualShot => "Dual Shot",
            Upgrade::SideShots => "Side Shots",
            Upgrade::TrackingShots => "Tracking Shots",
            Upgrade::Shield => "Forcefield",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Upgrade::RapidFire => "Double your fire rate",
            Upgrade::SuperRapidFire => "Double your fire rate again (4x total)",
            Upgrade::UltraRapidFire => "Double your fire rate again (8x total)",
            Upgrade::MegaRapidFire => "Double your fire rate again (16x total)",
            Upgrade::DualShot => "Shoot forward and backward",
            Upgrade::SideShots => "Shoot from both sides",
            Upgrade::TrackingShots => "Shots automatically target nearest asteroid",
            Upgrade::Shield => "Create a ring of protective shots around your ship",
        }
    }

    pub fn is_rapid_fire_tier(&self) -> bool {
        matches!(
            self,
            Upgrade::RapidFire | Upgrade::SuperRapidFire | Upgrade::UltraRapidFire | Upgrade::MegaRapidFire
        )
    }
}

/// Two upgrades to pick from, chosen by the decision tree
///
/// Returns `None` outside levels 2..=5.
pub fn offers_for(level: u32, taken: &BTreeSet<Upgrade>) -> Option<[Upgrade; 2]> {
    use Upgrade::*;

    let dual = taken.contains(&DualShot);
    let side = taken.contains(&SideShots);
    let tracking = taken.contains(&TrackingShots);
    let rapid = taken.contains(&RapidFire);
    let super_rapid = taken.contains(&SuperRapidFire);

    let offer = match level {
        2 => [RapidFire, DualShot],
        3 if dual => [RapidFire, SideShots],
        3 => [DualShot, SuperRapidFire],
        4 if dual && side => [RapidFire, TrackingShots],
        4 if dual => [SideShots, SuperRapidFire],
        4 => [DualShot, UltraRapidFire],
        5 if dual && side && tracking => [RapidFire, Shield],
        5 if dual && side => [TrackingShots, MegaRapidFire],
        5 if dual => [SideShots, Shield],
        5 if rapid && super_rapid => [DualShot, Shield],
        5 => [SuperRapidFire, Shield],
        _ => return None,
    };
    Some(offer)
}

/// What `check_level_up` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    /// `None` past the last offer level: play simply continues
    pub offer: Option<[Upgrade; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub score: u32,
    pub level: u32,
    /// Score at which the next level starts
    pub next_threshold: u32,
    threshold_step: u32,
    taken: BTreeSet<Upgrade>,
    offer: Option<[Upgrade; 2]>,
}

impl Progression {
    pub fn new(threshold_step: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            next_threshold: threshold_step,
            threshold_step,
            taken: BTreeSet::new(),
            offer: None,
        }
    }

    pub fn register_kill(&mut self) {
        self.score += 1;
    }

    pub fn taken(&self) -> &BTreeSet<Upgrade> {
        &self.taken
    }

    pub fn offer(&self) -> Option<[Upgrade; 2]> {
        self.offer
    }

    pub fn awaiting_choice(&self) -> bool {
        self.offer.is_some()
    }

    /// Advance one level if the score has reached the threshold
    ///
    /// Does nothing while an offer is still waiting for a choice.
    pub fn check_level_up(&mut self) -> Option<LevelUp> {
        if self.awaiting_choice() || self.score < self.next_threshold {
            return None;
        }
        self.level += 1;
        self.next_threshold += self.threshold_step;
        self.offer = offers_for(self.level, &self.taken);

        match self.offer {
            Some([a, b]) => log::info!(
                "Level {} reached (score {}): offering {} / {}",
                self.level,
                self.score,
                a.name(),
                b.name()
            ),
            None => log::info!(
                "Level {} reached (score {}): no further upgrades",
                self.level,
                self.score
            ),
        }
        Some(LevelUp {
            level: self.level,
            offer: self.offer,
        })
    }

    /// Take option `index` of the pending offer
    pub fn choose(&mut self, index: usize) -> Result<Upgrade, UpgradeError> {
        let offer = self.offer.ok_or(UpgradeError::NoOfferPending)?;
        let upgrade = *offer.get(index).ok_or(UpgradeError::InvalidChoice {
            index,
            available: offer.len(),
        })?;
        self.offer = None;
        self.taken.insert(upgrade);
        Ok(upgrade)
    }

    /// 2^(rapid-fire tiers taken)
    pub fn fire_rate_multiplier(&self) -> f32 {
        let tiers = self.taken.iter().filter(|u| u.is_rapid_fire_tier()).count();
        2f32.powi(tiers as i32)
    }
}
