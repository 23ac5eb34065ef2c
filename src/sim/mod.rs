//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - Timestep supplied by the caller, never assumed
//! - Stable iteration order (by body ID)
//! - No rendering, input, or platform dependencies

pub mod collision;
pub mod kinematics;
pub mod layers;
pub mod state;
pub mod tick;

pub use collision::{Impulse, canonical_pairs, resolve_pair};
pub use layers::CollisionRegistry;
pub use state::{ArenaState, Body, BodyId, Health, SimEvent};
pub use tick::tick;
