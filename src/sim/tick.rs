//! Fixed timestep simulation tick
//!
//! Advances the arena one step. Order:
//! 1. rebuild overlap sets from the positions integrated last tick
//! 2. drive input and braking into velocity
//! 3. resolve closing pairs (lower id first), per-collision damage
//! 4. speed cap, position, walls
//! 5. continuous damage, then remove eliminated bodies

use super::collision::{canonical_pairs, pair_mut, resolve_pair};
use super::kinematics::{integrate_position, integrate_velocity};
use super::state::{ArenaState, BodyId, SimEvent};
use crate::settings::DamagePolicy;

/// Advance the arena state by one timestep of `dt` seconds
pub fn tick(state: &mut ArenaState, dt: f32) {
    // Zero, negative, or non-finite steps leave the arena untouched
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }

    state.time_ticks += 1;

    // Overlaps
    state.registry.recompute(&mut state.bodies);

    // Drive and brake
    let accel_rate = state.settings.accel_rate;
    for body in &mut state.bodies {
        integrate_velocity(body, accel_rate, dt);
    }

    // Pair response
    resolve_collisions(state);

    // Move and bounce
    let mut wall_hits = Vec::new();
    for body in &mut state.bodies {
        if integrate_position(body, &state.settings, dt) {
            log::debug!("Body {} bounced off a wall", body.id);
            wall_hits.push(body.id);
        }
    }
    for id in wall_hits {
        state.push_event(SimEvent::WallBounce { id });
    }

    if let DamagePolicy::Continuous { per_second } = state.settings.damage {
        for body in &mut state.bodies {
            body.health.damage(per_second * dt);
        }
    }

    state.sweep_eliminated();
}

fn resolve_collisions(state: &mut ArenaState) {
    let elastic = state.settings.elastic_collisions;
    let collision_damage = match state.settings.damage {
        DamagePolicy::PerCollision { amount } => Some(amount),
        _ => None,
    };

    for (a_id, b_id) in canonical_pairs(&state.bodies) {
        let lookup = |id: BodyId| state.bodies.binary_search_by_key(&id, |b| b.id).ok();
        let (Some(i), Some(j)) = (lookup(a_id), lookup(b_id)) else {
            continue;
        };

        let (a, b) = pair_mut(&mut state.bodies, i, j);
        // Out of the round as soon as health hits zero, even before the sweep
        if a.health.is_eliminated() || b.health.is_eliminated() {
            continue;
        }
        let Some(impulse) = resolve_pair(a, b, elastic) else {
            continue;
        };

        if let Some(amount) = collision_damage {
            a.health.damage(amount);
            b.health.damage(amount);
        }

        log::debug!(
            "Collision {} <-> {}: closing speed {:.1}, bounce {}",
            a_id,
            b_id,
            impulse.magnitude,
            impulse.bounce
        );
        state.push_event(SimEvent::Collision {
            a: a_id,
            b: b_id,
            impulse: impulse.magnitude,
        });
    }
}
