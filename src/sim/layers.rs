//! Collision layers
//!
//! A layer is a named group of bodies tested against each other for overlap.
//! The registry only records membership; bodies are owned by `ArenaState`.

use std::collections::BTreeMap;

use super::state::{Body, BodyId};

#[derive(Debug, Clone, Default)]
pub struct CollisionRegistry {
    /// Layer name -> member ids (sorted)
    layers: BTreeMap<String, Vec<BodyId>>,
}

impl CollisionRegistry {
    pub fn insert(&mut self, layer: &str, id: BodyId) {
        let members = self.layers.entry(layer.to_string()).or_default();
        if let Err(pos) = members.binary_search(&id) {
            members.insert(pos, id);
        }
    }

    /// Drop `id` from a layer. Empty layers are forgotten.
    pub fn remove(&mut self, layer: &str, id: BodyId) {
        if let Some(members) = self.layers.get_mut(layer) {
            members.retain(|&m| m != id);
            if members.is_empty() {
                self.layers.remove(layer);
            }
        }
    }

    pub fn members(&self, layer: &str) -> &[BodyId] {
        self.layers.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Rebuild every body's overlap set from current positions.
    ///
    /// Each unordered pair is tested once per layer. A body in several layers
    /// collects overlaps from all of them.
    pub fn recompute(&self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.overlaps.clear();
        }

        for members in self.layers.values() {
            let indices: Vec<usize> = members
                .iter()
                .filter_map(|&id| bodies.binary_search_by_key(&id, |b| b.id).ok())
                .collect();

            for (n, &i) in indices.iter().enumerate() {
                for &j in &indices[n + 1..] {
                    if bodies[i].overlaps_with(&bodies[j]) {
                        let (a, b) = (bodies[i].id, bodies[j].id);
                        bodies[i].overlaps.push(b);
                        bodies[j].overlaps.push(a);
                    }
                }
            }
        }

        for body in bodies.iter_mut() {
            body.overlaps.sort_unstable();
            body.overlaps.dedup();
        }
    }
}
