//! Per-entity motion integration and playfield boundaries

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How an entity's velocity is damped and limited each step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Velocity multiplier applied every step (1.0 = no drag)
    pub drag: f32,
    /// Speed clamp, `None` = unbounded
    pub max_speed: Option<f32>,
}

impl Motion {
    /// Undamped, unbounded motion (asteroids, shots)
    pub const FREE: Motion = Motion {
        drag: 1.0,
        max_speed: None,
    };
}

/// Advance one step with semi-implicit Euler
///
/// Velocity is updated (acceleration, then drag, then clamp) before it moves
/// the position. Drag and clamp run even when acceleration is zero.
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, acc: Vec2, motion: Motion, dt: f32) {
    *vel += acc * dt;
    *vel *= motion.drag;
    if let Some(max_speed) = motion.max_speed {
        // clamp_length_max leaves a zero vector untouched
        *vel = vel.clamp_length_max(max_speed);
    }
    *pos += *vel * dt;
}

/// Axis-aligned playfield, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True once a circle's bounding box has completely left the playfield
    /// grown by `margin` on every side
    pub fn fully_outside(&self, pos: Vec2, radius: f32, margin: f32) -> bool {
        pos.x + radius < -margin
            || pos.x - radius > self.width + margin
            || pos.y + radius < -margin
            || pos.y - radius > self.height + margin
    }

    /// Wrap a circle to the opposite edge once its bounding box fully exits
    ///
    /// The circle re-enters just touching the far edge. Returns true if it wrapped.
    pub fn wrap(&self, pos: &mut Vec2, radius: f32) -> bool {
        let mut wrapped = false;
        if pos.x - radius > self.width {
            pos.x = -radius;
            wrapped = true;
        } else if pos.x + radius < 0.0 {
            pos.x = self.width + radius;
            wrapped = true;
        }
        if pos.y - radius > self.height {
            pos.y = -radius;
            wrapped = true;
        } else if pos.y + radius < 0.0 {
            pos.y = self.height + radius;
            wrapped = true;
        }
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_semi_implicit() {
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        integrate(&mut pos, &mut vel, Vec2::new(10.0, 0.0), Motion::FREE, 0.5);
        // New velocity moves the position in the same step
        assert_eq!(vel, Vec2::new(5.0, 0.0));
        assert_eq!(pos, Vec2::new(2.5, 0.0));
    }

    #[test]
    fn test_drag_decelerates_without_thrust() {
        let motion = Motion {
            drag: 0.98,
            max_speed: Some(400.0),
        };
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::new(100.0, 0.0);
        let mut last = vel.length();
        for _ in 0..60 {
            integrate(&mut pos, &mut vel, Vec2::ZERO, motion, 1.0 / 60.0);
            assert!(vel.length() < last);
            last = vel.length();
        }
        assert!(last < 100.0 * 0.31);
    }

    #[test]
    fn test_speed_is_clamped() {
        let motion = Motion {
            drag: 1.0,
            max_speed: Some(50.0),
        };
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::new(30.0, 40.0);
        integrate(&mut pos, &mut vel, Vec2::new(1000.0, 1000.0), motion, 1.0);
        assert!((vel.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_velocity_clamp_is_safe() {
        let motion = Motion {
            drag: 0.98,
            max_speed: Some(10.0),
        };
        let mut pos = Vec2::new(3.0, 4.0);
        let mut vel = Vec2::ZERO;
        integrate(&mut pos, &mut vel, Vec2::ZERO, motion, 1.0 / 60.0);
        assert_eq!(vel, Vec2::ZERO);
        assert_eq!(pos, Vec2::new(3.0, 4.0));
        assert!(!pos.is_nan());
    }

    #[test]
    fn test_fully_outside() {
        let bounds = Bounds::new(100.0, 50.0);
        assert!(!bounds.fully_outside(Vec2::new(-4.0, 10.0), 5.0, 0.0));
        assert!(bounds.fully_outside(Vec2::new(-6.0, 10.0), 5.0, 0.0));
        assert!(bounds.fully_outside(Vec2::new(50.0, 56.0), 5.0, 0.0));
        // Margin widens the playfield
        assert!(!bounds.fully_outside(Vec2::new(-20.0, 10.0), 5.0, 20.0));
    }

    #[test]
    fn test_wrap_reenters_from_opposite_edge() {
        let bounds = Bounds::new(100.0, 50.0);

        let mut pos = Vec2::new(106.0, 25.0);
        assert!(bounds.wrap(&mut pos, 5.0));
        assert_eq!(pos, Vec2::new(-5.0, 25.0));
        // Touching the edge again does not bounce it back
        assert!(!bounds.wrap(&mut pos, 5.0));

        let mut pos = Vec2::new(50.0, -6.0);
        assert!(bounds.wrap(&mut pos, 5.0));
        assert_eq!(pos, Vec2::new(50.0, 55.0));

        let mut pos = Vec2::new(99.0, 25.0);
        assert!(!bounds.wrap(&mut pos, 5.0));
    }
}
