//! Crab Arena - A local multiplayer bumper arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, overlap layers, collision response, lifecycle)
//! - `settings`: Data-driven arena tuning
//! - `snapshot`: Read-only per-body views for the draw layer
//! - `error`: Construction and lookup failures

pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use error::SimError;
pub use settings::{DamagePolicy, Settings};
pub use snapshot::{BodyInstance, BodySnapshot};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the draw rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player body defaults
    pub const PLAYER_RADIUS: f32 = 25.0;
    /// Acceleration applied at full drive input (pixels/s²)
    pub const PLAYER_ACCEL: f32 = 500.0;
    /// Speed cap (pixels/s)
    pub const PLAYER_MAX_SPEED: f32 = 250.0;
    /// Most players a round supports (one per spawn slot)
    pub const MAX_PLAYERS: usize = 4;

    /// Health lost by each body per resolved collision
    pub const COLLISION_DAMAGE: f32 = 0.1;

    /// Layer every player body joins
    pub const PLAYERS_LAYER: &str = "players";
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Scale a digital drive vector down by 1/√2 when it points diagonally.
///
/// Eight-way key input yields unit-square vectors; diagonals would otherwise
/// accelerate √2 times harder than straight lines.
#[inline]
pub fn normalize_if_both_nonzero(v: Vec2) -> Vec2 {
    if v.x != 0.0 && v.y != 0.0 {
        v * std::f32::consts::FRAC_1_SQRT_2
    } else {
        v
    }
}

/// Direction from `b` to `a` in radians.
///
/// Coincident points give `atan2(0, 0) == 0`.
#[inline]
pub fn relative_angle(a: Vec2, b: Vec2) -> f32 {
    (a.y - b.y).atan2(a.x - b.x)
}

/// Closing speed of `a` relative to `b` along the line of centers.
///
/// Negative means `a` is approaching `b`.
#[inline]
pub fn relative_speed(a_pos: Vec2, a_vel: Vec2, b_pos: Vec2, b_vel: Vec2) -> f32 {
    let axis = polar_to_cartesian(1.0, relative_angle(a_pos, b_pos));
    (a_vel - b_vel).dot(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_diagonal_only() {
        let diag = normalize_if_both_nonzero(Vec2::new(1.0, -1.0));
        assert!((diag.length() - 1.0).abs() < 1e-6);

        let straight = normalize_if_both_nonzero(Vec2::new(0.0, 1.0));
        assert_eq!(straight, Vec2::new(0.0, 1.0));
        assert_eq!(normalize_if_both_nonzero(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_relative_angle_points_from_b_to_a() {
        let angle = relative_angle(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!((angle - PI).abs() < 1e-6);
        assert_eq!(relative_angle(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0)), 0.0);
    }

    #[test]
    fn test_relative_speed_sign() {
        // a left of b, moving right toward it
        let closing = relative_speed(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::ZERO,
        );
        assert!((closing + 10.0).abs() < 1e-5);

        let separating = relative_speed(
            Vec2::new(0.0, 0.0),
            Vec2::new(-10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::ZERO,
        );
        assert!(separating > 0.0);
    }

    #[test]
    fn test_relative_speed_coincident_is_finite() {
        let s = relative_speed(Vec2::ONE, Vec2::new(5.0, 5.0), Vec2::ONE, Vec2::ZERO);
        assert!(s.is_finite());
    }

    #[test]
    fn test_polar_to_cartesian_quarter_turn() {
        let v = polar_to_cartesian(2.0, PI / 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
    }
}
