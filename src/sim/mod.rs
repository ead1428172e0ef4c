//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (by entity handle)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod collision;
pub mod fragment;
pub mod kinematics;
pub mod progression;
pub mod projectile;
pub mod shield;
pub mod ship;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::{Arena, EntityId};
pub use collision::{Bounce, circles_overlap, collides, nearest_point, shield_bounce};
pub use fragment::{Asteroid, DestructionEffect, SplitOutcome, split};
pub use kinematics::{Bounds, Motion, integrate};
pub use progression::{LevelUp, MAX_OFFER_LEVEL, Progression, Upgrade, offers_for};
pub use projectile::{Projectile, ProjectileKind};
pub use shield::{HitOutcome, Shield, ShieldStage, shot_slots};
pub use ship::{Loadout, Ship};
pub use spawner::{AsteroidSource, EdgeSpawner, NoAsteroids, speed_range, spawn_interval};
pub use state::{Body, EntityView, GameEvent, GamePhase, GameState, SimRng};
pub use tick::{Action, ActionQuery, TickInput, advance, resolve_collisions, tick};
