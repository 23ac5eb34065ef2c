//! Arena state and core simulation types
//!
//! `ArenaState` is the simulation context: it owns every live body, the layer
//! registry, and the event queue. Bodies are addressed by `BodyId` handles.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layers::CollisionRegistry;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;
use crate::snapshot::BodySnapshot;

/// Stable handle for a body. Ids are never reused within an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Health of a body, monotonically non-increasing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Health {
    /// Health in (0, 1]
    Alive(f32),
    /// Terminal
    Eliminated,
}

impl Default for Health {
    fn default() -> Self {
        Health::Alive(1.0)
    }
}

impl Health {
    pub fn value(&self) -> f32 {
        match *self {
            Health::Alive(h) => h,
            Health::Eliminated => 0.0,
        }
    }

    pub fn is_eliminated(&self) -> bool {
        matches!(self, Health::Eliminated)
    }

    /// Lose `amount` health. Negative or NaN amounts are ignored.
    pub fn damage(&mut self, amount: f32) {
        if let Health::Alive(h) = *self {
            if amount.is_nan() || amount <= 0.0 {
                return;
            }
            let remaining = (h - amount).min(1.0);
            *self = if remaining > 0.0 {
                Health::Alive(remaining)
            } else {
                Health::Eliminated
            };
        }
    }
}

/// A simulated circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Desired drive direction, set by the input layer
    pub accel_input: Vec2,
    pub radius: f32,
    pub braking: bool,
    pub health: Health,
    /// Layers this body collides in
    pub layers: Vec<String>,
    /// Bodies overlapping this one as of the last recompute (sorted by id)
    #[serde(skip)]
    pub overlaps: Vec<BodyId>,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, radius: f32, layers: Vec<String>) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            accel_input: Vec2::ZERO,
            radius,
            braking: false,
            health: Health::default(),
            layers,
            overlaps: Vec::new(),
        }
    }

    pub fn is_colliding(&self) -> bool {
        !self.overlaps.is_empty()
    }

    /// Heading of travel in radians (0 when at rest)
    pub fn velocity_angle(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }

    pub fn overlaps_with(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The resolver exchanged velocity between two approaching bodies
    Collision { a: BodyId, b: BodyId, impulse: f32 },
    /// A body hit an arena wall
    WallBounce { id: BodyId },
    /// A body's health reached zero and it left the arena
    Eliminated { id: BodyId },
    /// At most one body remains. Emitted once per round.
    RoundOver { winner: Option<BodyId> },
}

/// Complete arena state (deterministic, single-threaded)
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub settings: Settings,
    /// Live bodies (sorted by id for determinism)
    pub bodies: Vec<Body>,
    pub registry: CollisionRegistry,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Elimination order for the current round, first out first
    pub eliminated: Vec<BodyId>,
    round_contested: bool,
    round_over: bool,
    events: Vec<SimEvent>,
    /// Next entity ID
    next_id: u32,
}

impl ArenaState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            bodies: Vec::new(),
            registry: CollisionRegistry::default(),
            time_ticks: 0,
            eliminated: Vec::new(),
            round_contested: false,
            round_over: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Arena with `count` players at the first `count` spawn slots
    pub fn with_players(settings: Settings, count: usize) -> Result<Self, SimError> {
        let mut state = Self::new(settings);
        for slot in 0..count {
            state.spawn_player(slot)?;
        }
        Ok(state)
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a body to the arena. Its position is clamped inside the walls.
    pub fn spawn_body<S: Into<String>>(
        &mut self,
        pos: Vec2,
        radius: f32,
        layers: impl IntoIterator<Item = S>,
    ) -> Result<BodyId, SimError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidRadius { radius });
        }
        if !pos.is_finite() {
            return Err(SimError::NonFinitePosition { x: pos.x, y: pos.y });
        }

        let mut layers: Vec<String> = layers.into_iter().map(Into::into).collect();
        layers.sort();
        layers.dedup();

        let id = self.next_entity_id();
        let pos = super::kinematics::clamp_to_arena(pos, radius, &self.settings);
        for layer in &layers {
            self.registry.insert(layer, id);
        }
        self.bodies.push(Body::new(id, pos, radius, layers));
        if self.bodies.len() >= 2 {
            self.round_contested = true;
        }

        log::info!("Spawned body {} at ({:.1}, {:.1})", id, pos.x, pos.y);
        Ok(id)
    }

    /// Spawn a player body at the given spawn slot in the players layer
    pub fn spawn_player(&mut self, slot: usize) -> Result<BodyId, SimError> {
        let pos = *self
            .settings
            .spawn_slots
            .get(slot)
            .ok_or(SimError::NoSpawnSlot { slot })?;
        let radius = self.settings.player_radius;
        self.spawn_body(pos, radius, [PLAYERS_LAYER])
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    /// Replace the drive input of a body. Repeating a call has no further effect.
    pub fn set_acceleration_input(&mut self, id: BodyId, input: Vec2) -> Result<(), SimError> {
        let body = self.body_mut(id).ok_or(SimError::UnknownBody { id })?;
        body.accel_input = if input.is_finite() {
            input.clamp(Vec2::NEG_ONE, Vec2::ONE)
        } else {
            log::warn!("Ignoring non-finite drive input for body {}", id);
            Vec2::ZERO
        };
        Ok(())
    }

    pub fn set_braking(&mut self, id: BodyId, braking: bool) -> Result<(), SimError> {
        let body = self.body_mut(id).ok_or(SimError::UnknownBody { id })?;
        body.braking = braking;
        Ok(())
    }

    /// Take a body out of the arena and out of every layer
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body, SimError> {
        let index = self.index_of(id).ok_or(SimError::UnknownBody { id })?;
        let body = self.bodies.remove(index);
        for layer in &body.layers {
            self.registry.remove(layer, id);
        }
        for other in &mut self.bodies {
            other.overlaps.retain(|&o| o != id);
        }
        Ok(body)
    }

    /// Remove every eliminated body and report round end
    pub(crate) fn sweep_eliminated(&mut self) {
        let gone: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|b| b.health.is_eliminated())
            .map(|b| b.id)
            .collect();

        for id in gone {
            if self.remove_body(id).is_ok() {
                log::info!("Body {} eliminated", id);
                self.eliminated.push(id);
                self.events.push(SimEvent::Eliminated { id });
            }
        }

        if self.round_contested && !self.round_over && self.bodies.len() <= 1 {
            self.round_over = true;
            let winner = self.winner();
            match winner {
                Some(id) => log::info!("Round over, body {} wins", id),
                None => log::info!("Round over, no survivors"),
            }
            self.events.push(SimEvent::RoundOver { winner });
        }
    }

    /// Last body standing, once the round is decided
    pub fn winner(&self) -> Option<BodyId> {
        if self.round_over && self.bodies.len() == 1 {
            Some(self.bodies[0].id)
        } else {
            None
        }
    }

    pub fn is_round_over(&self) -> bool {
        self.round_over
    }

    /// Destroy every body and layer. Ids keep counting up.
    pub fn end_round(&mut self) {
        log::info!("Ending round with {} bodies left", self.bodies.len());
        self.bodies.clear();
        self.registry.clear();
        self.eliminated.clear();
        self.events.clear();
        self.round_contested = false;
        self.round_over = false;
    }

    pub(crate) fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain, in order
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view of every live body, for drawing
    pub fn snapshots(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(BodySnapshot::from).collect()
    }
}
