//! Simulation error types
//!
//! Only construction and lookup can fail. A tick itself never returns an error:
//! degenerate geometry falls back to stable defaults instead.

use std::fmt;

use crate::sim::BodyId;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Body radius must be positive and finite
    InvalidRadius { radius: f32 },
    /// Spawn position had a NaN or infinite component
    NonFinitePosition { x: f32, y: f32 },
    /// Handle does not name a live body (never spawned, eliminated, or removed)
    UnknownBody { id: BodyId },
    /// All spawn slots for this arena are taken or the slot index is out of range
    NoSpawnSlot { slot: usize },
    /// Settings failed validation
    InvalidSettings { field: &'static str, reason: &'static str },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidRadius { radius } => {
                write!(f, "body radius must be positive and finite, got {}", radius)
            }
            SimError::NonFinitePosition { x, y } => {
                write!(f, "body position must be finite, got ({}, {})", x, y)
            }
            SimError::UnknownBody { id } => write!(f, "no live body with id {}", id),
            SimError::NoSpawnSlot { slot } => write!(f, "no spawn slot {}", slot),
            SimError::InvalidSettings { field, reason } => {
                write!(f, "invalid setting `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for SimError {}
