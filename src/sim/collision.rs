//! Collision response between overlapping bodies
//!
//! Overlap alone does nothing: a pair is only resolved while it is closing.
//! Velocity is exchanged along the line of centers; tangential motion is kept.

use glam::Vec2;

use super::state::{Body, BodyId};
use crate::{polar_to_cartesian, relative_angle, relative_speed};

/// Result of resolving one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    /// Signed closing speed that was exchanged (negative: approaching)
    pub magnitude: f32,
    /// Velocity change applied to `b` (and subtracted from `a`)
    pub bounce: Vec2,
}

/// Resolve a single overlapping pair.
///
/// Returns `None` when the bodies are separating or sliding past each other.
pub fn resolve_pair(a: &mut Body, b: &mut Body, elastic: bool) -> Option<Impulse> {
    let rel_speed = relative_speed(a.pos, a.vel, b.pos, b.vel);
    if rel_speed.is_nan() || rel_speed >= 0.0 {
        return None;
    }

    let rel_angle = relative_angle(a.pos, b.pos);
    let magnitude = if elastic { rel_speed } else { rel_speed / 2.0 };
    let bounce = polar_to_cartesian(magnitude, rel_angle);

    a.vel -= bounce;
    b.vel += bounce;

    Some(Impulse { magnitude, bounce })
}

/// Every overlapping pair once, lower id first
pub fn canonical_pairs(bodies: &[Body]) -> Vec<(BodyId, BodyId)> {
    bodies
        .iter()
        .flat_map(|a| {
            a.overlaps
                .iter()
                .filter(move |&&b| a.id < b)
                .map(move |&b| (a.id, b))
        })
        .collect()
}

/// Borrow two distinct bodies mutably by index
pub(crate) fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
