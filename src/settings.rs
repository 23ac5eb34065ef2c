//! Arena settings and tuning
//!
//! Persisted as JSON next to the binary. Missing keys fall back to `consts`.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// How bodies lose health
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DamagePolicy {
    /// Bodies never take damage
    None,
    /// Both bodies lose `amount` each time the resolver fires on their pair
    PerCollision { amount: f32 },
    /// Every body loses `per_second * dt` each tick, collisions or not
    Continuous { per_second: f32 },
}

impl Default for DamagePolicy {
    fn default() -> Self {
        DamagePolicy::PerCollision {
            amount: COLLISION_DAMAGE,
        }
    }
}

impl DamagePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DamagePolicy::None => "None",
            DamagePolicy::PerCollision { .. } => "PerCollision",
            DamagePolicy::Continuous { .. } => "Continuous",
        }
    }
}

/// Arena settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub width: f32,
    pub height: f32,

    // === Bodies ===
    /// Radius given to spawned players
    pub player_radius: f32,
    /// Acceleration at full drive input (pixels/s²)
    pub accel_rate: f32,
    /// Speed cap (pixels/s)
    pub max_speed: f32,

    // === Collisions ===
    /// Walls reflect velocity (true) or absorb it (false)
    pub elastic_walls: bool,
    /// Body pairs fully exchange closing velocity (true) or lose half of it (false)
    pub elastic_collisions: bool,
    pub damage: DamagePolicy,

    // === Spawning ===
    /// Player start positions, one per slot
    pub spawn_slots: Vec<Vec2>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,

            player_radius: PLAYER_RADIUS,
            accel_rate: PLAYER_ACCEL,
            max_speed: PLAYER_MAX_SPEED,

            elastic_walls: true,
            elastic_collisions: true,
            damage: DamagePolicy::default(),

            spawn_slots: quarter_slots(SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }
}

/// The four quarter-points of an arena, bottom row first
pub fn quarter_slots(width: f32, height: f32) -> Vec<Vec2> {
    vec![
        Vec2::new(width / 4.0, height / 4.0),
        Vec2::new(width * 3.0 / 4.0, height / 4.0),
        Vec2::new(width / 4.0, height * 3.0 / 4.0),
        Vec2::new(width * 3.0 / 4.0, height * 3.0 / 4.0),
    ]
}

impl Settings {
    /// Default settings with both walls and pairs inelastic
    pub fn inelastic() -> Self {
        Self {
            elastic_walls: false,
            elastic_collisions: false,
            ..Self::default()
        }
    }

    /// Reject values the kinematics cannot work with
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = |field: &'static str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SimError::InvalidSettings {
                    field,
                    reason: "must be positive and finite",
                })
            }
        };
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("player_radius", self.player_radius)?;
        positive("accel_rate", self.accel_rate)?;
        positive("max_speed", self.max_speed)?;

        if 2.0 * self.player_radius > self.width.min(self.height) {
            return Err(SimError::InvalidSettings {
                field: "player_radius",
                reason: "body does not fit inside the arena",
            });
        }

        let damage_ok = match self.damage {
            DamagePolicy::None => true,
            DamagePolicy::PerCollision { amount } => amount.is_finite() && amount >= 0.0,
            DamagePolicy::Continuous { per_second } => per_second.is_finite() && per_second >= 0.0,
        };
        if !damage_ok {
            return Err(SimError::InvalidSettings {
                field: "damage",
                reason: "damage must be non-negative and finite",
            });
        }

        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults.
    ///
    /// Entry point for embedders. A missing, unreadable, or invalid file is logged and
    /// replaced by `Settings::default()`, so a host never fails to start over config.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => {
                        log::info!("Loaded settings from {}", path.display());
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Failed to parse {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
