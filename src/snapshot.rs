//! Read-only body views for the draw layer
//!
//! Snapshots are taken between ticks, never mid-update.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use crate::sim::{Body, BodyId};

/// What the draw layer needs to place, rotate, and tint one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub position: Vec2,
    pub radius: f32,
    /// Sprite heading in radians
    pub velocity_angle: f32,
    pub is_colliding: bool,
    pub health: f32,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            position: body.pos,
            radius: body.radius,
            velocity_angle: body.velocity_angle(),
            is_colliding: body.is_colliding(),
            health: body.health.value(),
        }
    }
}

/// Tint for a body: white while in contact, otherwise green fading to red with health
pub fn health_color(health: f32, colliding: bool) -> [f32; 4] {
    if colliding {
        return [1.0, 1.0, 1.0, 1.0];
    }
    let t = health.clamp(0.0, 1.0);
    [1.0 - 0.8 * t, 0.2 + 0.6 * t, 0.2, 1.0]
}

/// Per-instance data for a circle sprite, ready for a vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub angle: f32,
    pub color: [f32; 4],
}

impl From<&BodySnapshot> for BodyInstance {
    fn from(snapshot: &BodySnapshot) -> Self {
        Self {
            center: snapshot.position.to_array(),
            radius: snapshot.radius,
            angle: snapshot.velocity_angle,
            color: health_color(snapshot.health, snapshot.is_colliding),
        }
    }
}

/// Pack snapshots into bytes for upload
pub fn instance_bytes(snapshots: &[BodySnapshot]) -> Vec<u8> {
    let instances: Vec<BodyInstance> = snapshots.iter().map(BodyInstance::from).collect();
    bytemuck::cast_slice(&instances).to_vec()
}
