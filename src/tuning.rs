//! Data-driven game balance
//!
//! [`Tuning`] mirrors every constant in [`crate::consts`]. Any subset can be
//! overridden from JSON; missing keys fall back to the compile-time defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Runtime-tunable balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Ship ===
    pub ship_radius: f32,
    pub ship_max_speed: f32,
    pub ship_acceleration: f32,
    /// Per-frame velocity multiplier
    pub ship_drag: f32,
    /// Radians per second
    pub ship_turn_speed: f32,

    // === Firing ===
    /// Seconds between shots at multiplier 1
    pub fire_interval: f32,
    pub shot_speed: f32,
    pub shot_radius: f32,
    pub tracking_every: u32,
    /// Radians per second
    pub tracking_turn_rate: f32,

    // === Shield ===
    pub shield_ring_size: usize,
    pub shield_orbit_radius: f32,
    /// Radians per second
    pub shield_rotation_speed: f32,
    pub shield_max_hits: u32,
    pub shield_hit_cooldown: f32,
    pub shield_bounce_factor: f32,
    pub shield_bounce_margin: f32,

    // === Asteroids ===
    pub asteroid_min_radius: f32,
    pub asteroid_kinds: u32,
    pub split_angle_min_deg: f32,
    pub split_angle_max_deg: f32,
    pub split_boost: f32,
    pub outline_min_vertices: usize,
    pub outline_max_vertices: usize,
    pub asteroid_max_spin: f32,

    // === Destruction effect ===
    pub effect_lifetime: f32,
    pub effect_min_lines: usize,
    pub effect_max_lines: usize,

    // === Spawner ===
    pub spawn_interval: f32,
    pub spawn_interval_decay: f32,
    pub spawn_interval_floor: f32,
    pub spawn_speed_min: f32,
    pub spawn_speed_max: f32,
    pub spawn_speed_growth: f32,
    pub spawn_speed_cap: f32,
    pub spawn_spread_deg: f32,

    // === Progression ===
    pub level_threshold_step: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            ship_radius: SHIP_RADIUS,
            ship_max_speed: SHIP_MAX_SPEED,
            ship_acceleration: SHIP_ACCELERATION,
            ship_drag: SHIP_DRAG,
            ship_turn_speed: SHIP_TURN_SPEED,

            fire_interval: FIRE_INTERVAL,
            shot_speed: SHOT_SPEED,
            shot_radius: SHOT_RADIUS,
            tracking_every: TRACKING_EVERY,
            tracking_turn_rate: TRACKING_TURN_RATE,

            shield_ring_size: SHIELD_RING_SIZE,
            shield_orbit_radius: SHIELD_ORBIT_RADIUS,
            shield_rotation_speed: SHIELD_ROTATION_SPEED,
            shield_max_hits: SHIELD_MAX_HITS,
            shield_hit_cooldown: SHIELD_HIT_COOLDOWN,
            shield_bounce_factor: SHIELD_BOUNCE_FACTOR,
            shield_bounce_margin: SHIELD_BOUNCE_MARGIN,

            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_kinds: ASTEROID_KINDS,
            split_angle_min_deg: SPLIT_ANGLE_MIN_DEG,
            split_angle_max_deg: SPLIT_ANGLE_MAX_DEG,
            split_boost: SPLIT_BOOST,
            outline_min_vertices: OUTLINE_MIN_VERTICES,
            outline_max_vertices: OUTLINE_MAX_VERTICES,
            asteroid_max_spin: ASTEROID_MAX_SPIN,

            effect_lifetime: EFFECT_LIFETIME,
            effect_min_lines: EFFECT_MIN_LINES,
            effect_max_lines: EFFECT_MAX_LINES,

            spawn_interval: SPAWN_INTERVAL,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            spawn_interval_floor: SPAWN_INTERVAL_FLOOR,
            spawn_speed_min: SPAWN_SPEED_MIN,
            spawn_speed_max: SPAWN_SPEED_MAX,
            spawn_speed_growth: SPAWN_SPEED_GROWTH,
            spawn_speed_cap: SPAWN_SPEED_CAP,
            spawn_spread_deg: SPAWN_SPREAD_DEG,

            level_threshold_step: LEVEL_THRESHOLD_STEP,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Radius of the largest asteroid tier
    pub fn asteroid_max_radius(&self) -> f32 {
        self.asteroid_min_radius * self.asteroid_kinds as f32
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(name: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    name,
                    value,
                    reason: "must be positive and finite",
                })
            }
        }
        fn at_least_one(name: &'static str, value: usize) -> Result<(), TuningError> {
            if value >= 1 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    name,
                    value: value as f32,
                    reason: "must be at least 1",
                })
            }
        }

        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("ship_radius", self.ship_radius)?;
        positive("ship_acceleration", self.ship_acceleration)?;
        positive("ship_max_speed", self.ship_max_speed)?;
        positive("fire_interval", self.fire_interval)?;
        positive("shot_speed", self.shot_speed)?;
        positive("shot_radius", self.shot_radius)?;
        positive("asteroid_min_radius", self.asteroid_min_radius)?;
        positive("effect_lifetime", self.effect_lifetime)?;
        positive("spawn_interval_floor", self.spawn_interval_floor)?;
        positive("tracking_turn_rate", self.tracking_turn_rate)?;
        positive("shield_orbit_radius", self.shield_orbit_radius)?;
        at_least_one("tracking_every", self.tracking_every as usize)?;
        at_least_one("shield_ring_size", self.shield_ring_size)?;
        at_least_one("shield_max_hits", self.shield_max_hits as usize)?;
        at_least_one("asteroid_kinds", self.asteroid_kinds as usize)?;
        at_least_one("level_threshold_step", self.level_threshold_step as usize)?;

        if !(0.0..=1.0).contains(&self.ship_drag) || self.ship_drag == 0.0 {
            return Err(TuningError::Invalid {
                name: "ship_drag",
                value: self.ship_drag,
                reason: "must be in (0, 1]",
            });
        }
        if self.split_boost <= 1.0 {
            return Err(TuningError::Invalid {
                name: "split_boost",
                value: self.split_boost,
                reason: "children must be faster than their parent",
            });
        }
        if self.split_angle_min_deg < 0.0 || self.split_angle_min_deg > self.split_angle_max_deg {
            return Err(TuningError::Invalid {
                name: "split_angle_min_deg",
                value: self.split_angle_min_deg,
                reason: "must be non-negative and not above split_angle_max_deg",
            });
        }
        if self.outline_min_vertices < 3 {
            return Err(TuningError::Invalid {
                name: "outline_min_vertices",
                value: self.outline_min_vertices as f32,
                reason: "an outline needs at least 3 vertices",
            });
        }
        if self.outline_max_vertices < self.outline_min_vertices {
            return Err(TuningError::Invalid {
                name: "outline_max_vertices",
                value: self.outline_max_vertices as f32,
                reason: "must not be below outline_min_vertices",
            });
        }
        if self.effect_max_lines < self.effect_min_lines {
            return Err(TuningError::Invalid {
                name: "effect_max_lines",
                value: self.effect_max_lines as f32,
                reason: "must not be below effect_min_lines",
            });
        }
        if self.spawn_speed_min < 0.0 || self.spawn_speed_max < self.spawn_speed_min {
            return Err(TuningError::Invalid {
                name: "spawn_speed_max",
                value: self.spawn_speed_max,
                reason: "speed range must be non-negative and ordered",
            });
        }
        Ok(())
    }
}
