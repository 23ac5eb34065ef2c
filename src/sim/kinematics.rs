//! Per-body kinematics
//!
//! Drive input shaping, braking, velocity integration, speed cap, and wall
//! handling. Collision impulses are applied by the resolver between
//! [`integrate_velocity`] and [`integrate_position`] so they respect the cap.

use glam::Vec2;

use super::state::Body;
use crate::normalize_if_both_nonzero;
use crate::settings::Settings;

/// Turn the raw drive input (plus brake, if held) into a unit-bounded acceleration
pub fn shaped_acceleration(body: &Body) -> Vec2 {
    let input = if body.accel_input.is_finite() {
        body.accel_input.clamp(Vec2::NEG_ONE, Vec2::ONE)
    } else {
        Vec2::ZERO
    };
    let mut accel = normalize_if_both_nonzero(input);

    if body.braking {
        // Unit vector against the direction of travel (none while at rest)
        let brake = -body.vel.normalize_or_zero();
        // Brake only on axes where the player isn't already steering with the motion
        if accel.x == 0.0 || accel.x * body.vel.x < 0.0 {
            accel.x += brake.x;
        }
        if accel.y == 0.0 || accel.y * body.vel.y < 0.0 {
            accel.y += brake.y;
        }
    }

    accel
}

/// Apply shaped acceleration for `dt`. Braking never reverses an axis, only stops it.
pub fn integrate_velocity(body: &mut Body, accel_rate: f32, dt: f32) {
    let before = body.vel;
    body.vel += shaped_acceleration(body) * accel_rate * dt;

    if body.braking {
        if before.x * body.vel.x < 0.0 {
            body.vel.x = 0.0;
        }
        if before.y * body.vel.y < 0.0 {
            body.vel.y = 0.0;
        }
    }
}

/// Uniformly rescale velocity down to `max_speed`
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    vel.clamp_length_max(max_speed)
}

/// Clamp a body center so the whole circle stays inside the arena
pub fn clamp_to_arena(pos: Vec2, radius: f32, settings: &Settings) -> Vec2 {
    let min = Vec2::splat(radius);
    let max = Vec2::new(settings.width - radius, settings.height - radius).max(min);
    pos.clamp(min, max)
}

/// Cap speed, move the body, keep it inside the walls, and bounce or stop it on contact.
///
/// Returns true if the body touched a wall this step.
pub fn integrate_position(body: &mut Body, settings: &Settings, dt: f32) -> bool {
    body.vel = clamp_speed(body.vel, settings.max_speed);
    body.pos = clamp_to_arena(body.pos + body.vel * dt, body.radius, settings);

    let min = Vec2::splat(body.radius);
    let max = Vec2::new(settings.width - body.radius, settings.height - body.radius);

    let hit_x = wall_response(&mut body.vel.x, body.pos.x, min.x, max.x, settings.elastic_walls);
    let hit_y = wall_response(&mut body.vel.y, body.pos.y, min.y, max.y, settings.elastic_walls);
    hit_x || hit_y
}

/// Reflect or absorb one velocity axis when the position sits on a bound.
///
/// Only velocity pointing into the wall is affected, so a body resting
/// against a wall and pulling away keeps its heading.
fn wall_response(vel: &mut f32, pos: f32, min: f32, max: f32, elastic: bool) -> bool {
    let into_wall = (pos <= min && *vel < 0.0) || (pos >= max && *vel > 0.0);
    if !into_wall {
        return false;
    }
    *vel = if elastic { -*vel } else { 0.0 };
    true
}
