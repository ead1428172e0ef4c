//! Session state and the shared entity capability trait
//!
//! A [`GameState`] is one play session: tuning, seeded RNG, the ship, typed
//! arenas for everything else, and progression. There are no globals; every
//! simulation step takes the session explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::fragment::{Asteroid, DestructionEffect};
use super::kinematics::Bounds;
use super::progression::{Progression, Upgrade};
use super::projectile::Projectile;
use super::ship::Ship;
use super::spawner::{AsteroidSource, EdgeSpawner};
use crate::error::UpgradeError;
use crate::tuning::Tuning;

/// Session RNG: seeded, so a session replays identically
pub type SimRng = Pcg32;

/// Position / velocity / radius / alive capabilities shared by every entity
pub trait Body {
    fn pos(&self) -> Vec2;
    fn vel(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn is_alive(&self) -> bool;
    /// Mark dead; the owning arena drops it on the next sweep
    fn kill(&mut self);

    /// Radius used for collisions, `None` for purely cosmetic entities
    fn collision_radius(&self) -> Option<f32> {
        Some(self.radius())
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Waiting for an upgrade choice
    LevelUp,
    /// Ship destroyed; the host starts a new session
    GameOver,
}

/// Things that happened during a tick, for audio, rendering and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotsFired { count: usize, tracking: bool },
    AsteroidDestroyed { pos: Vec2, radius: f32, children: usize },
    ShieldHit { hits_taken: u32, remaining: usize },
    ShieldDepleted,
    LevelUp { level: u32, offer: Option<[Upgrade; 2]> },
    UpgradeChosen(Upgrade),
    ShipDestroyed { pos: Vec2 },
}

/// Read-only view of one entity for rendering
#[derive(Debug, Clone, Copy)]
pub enum EntityView<'a> {
    Ship(&'a Ship),
    Asteroid(&'a Asteroid),
    /// Free-flying shots and shield orbs
    Projectile(&'a Projectile),
    Effect(&'a DestructionEffect),
}

impl EntityView<'_> {
    pub fn pos(&self) -> Vec2 {
        match self {
            EntityView::Ship(s) => s.pos,
            EntityView::Asteroid(a) => a.pos,
            EntityView::Projectile(p) => p.pos,
            EntityView::Effect(e) => e.pos,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            EntityView::Ship(s) => s.radius,
            EntityView::Asteroid(a) => a.radius,
            EntityView::Projectile(p) => p.radius,
            EntityView::Effect(e) => e.radius,
        }
    }

    /// Facing for ships and shots, outline rotation for asteroids
    pub fn heading(&self) -> f32 {
        match self {
            EntityView::Ship(s) => s.facing,
            EntityView::Asteroid(a) => a.rotation,
            EntityView::Projectile(p) => p.facing,
            EntityView::Effect(_) => 0.0,
        }
    }
}

/// One play session
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Simulated seconds since the session started
    pub time: f32,
    pub phase: GamePhase,
    pub ship: Ship,
    pub asteroids: Arena<Asteroid>,
    pub projectiles: Arena<Projectile>,
    pub effects: Arena<DestructionEffect>,
    pub progression: Progression,
    pub(crate) rng: SimRng,
    pub(crate) source: Box<dyn AsteroidSource>,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New session with default tuning and the edge spawner
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::with_source(seed, tuning, Box::new(EdgeSpawner::new()))
    }

    pub fn with_source(seed: u64, tuning: Tuning, source: Box<dyn AsteroidSource>) -> Self {
        let bounds = Bounds::new(tuning.arena_width, tuning.arena_height);
        let ship = Ship::new(bounds.center(), &tuning);
        let progression = Progression::new(tuning.level_threshold_step);
        log::info!("New session (seed {seed})");
        Self {
            seed,
            time: 0.0,
            phase: GamePhase::Playing,
            ship,
            asteroids: Arena::new(),
            projectiles: Arena::new(),
            effects: Arena::new(),
            progression,
            rng: SimRng::seed_from_u64(seed),
            source,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.tuning.arena_width, self.tuning.arena_height)
    }

    pub fn score(&self) -> u32 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    /// Upgrades waiting for a choice, if any
    pub fn offer(&self) -> Option<[Upgrade; 2]> {
        self.progression.offer()
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add an externally created asteroid; it joins play on the next flush
    pub fn spawn_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.spawn(asteroid);
    }

    /// Kill every asteroid, including ones not merged yet
    pub fn clear_asteroids(&mut self) {
        let count = self.asteroids.alive().count() + self.asteroids.pending_len();
        self.asteroids.clear();
        log::debug!("Cleared {count} asteroids");
    }

    /// Take option `index` of the pending offer and resume play
    ///
    /// The field is cleared and the ship recentered at rest.
    pub fn choose_upgrade(&mut self, index: usize) -> Result<Upgrade, UpgradeError> {
        let upgrade = self.progression.choose(index)?;
        let center = self.bounds().center();
        self.ship.recenter(center, &self.tuning);
        self.ship
            .apply_upgrade(upgrade, self.progression.fire_rate_multiplier(), &self.tuning);
        self.clear_asteroids();
        if self.phase == GamePhase::LevelUp {
            self.phase = GamePhase::Playing;
        }
        self.events.push(GameEvent::UpgradeChosen(upgrade));
        log::info!("Upgrade chosen: {} ({})", upgrade.name(), upgrade.description());
        Ok(upgrade)
    }

    /// Every live entity, ship first
    pub fn entities(&self) -> impl Iterator<Item = EntityView<'_>> {
        let ship = self
            .ship
            .is_alive()
            .then_some(EntityView::Ship(&self.ship));
        ship.into_iter()
            .chain(self.ship.shield.orbs().iter().map(EntityView::Projectile))
            .chain(self.asteroids.alive().map(EntityView::Asteroid))
            .chain(self.projectiles.alive().map(EntityView::Projectile))
            .chain(self.effects.alive().map(EntityView::Effect))
    }
}
