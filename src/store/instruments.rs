use crate::instrument::{
    category_color, Instrument, InstrumentMetadata, InstrumentPatch, NewInstrument, Position,
};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::storage::Collection;
use super::{new_id, Change};

/// New instruments land at a random point inside this box.
const SPAWN_WIDTH: f32 = 800.0;
const SPAWN_HEIGHT: f32 = 600.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentStore {
    instruments: Vec<Instrument>,
}

impl Collection for InstrumentStore {
    const KEY: &'static str = "instrument-storage";
}

impl InstrumentStore {
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|inst| inst.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|inst| inst.id == id)
    }

    pub fn add(&mut self, data: NewInstrument) -> Change {
        let mut rng = rand::thread_rng();
        let id = new_id();

        let color = data
            .color
            .unwrap_or_else(|| category_color(data.category).to_string());

        self.instruments.push(Instrument {
            id: id.clone(),
            name: data.name,
            developer: data.developer,
            host: data.host,
            category: data.category,
            tags: data.tags,
            notes: data.notes,
            position: Position::new(
                rng.gen_range(0.0..SPAWN_WIDTH),
                rng.gen_range(0.0..SPAWN_HEIGHT),
            ),
            pairings: Vec::new(),
            color,
            metadata: InstrumentMetadata {
                created_at: Utc::now(),
                last_used: None,
                usage_count: 0,
            },
        });

        Change::Added(id)
    }

    pub fn update(&mut self, id: &str, patch: InstrumentPatch) -> Option<Change> {
        if patch.is_empty() {
            return None;
        }
        let instrument = self.get_mut(id)?;
        patch.apply(instrument);
        Some(Change::Updated(id.to_string()))
    }

    /// Removes the instrument and every pairing that points at it.
    pub fn delete(&mut self, id: &str) -> Option<Change> {
        let index = self.instruments.iter().position(|inst| inst.id == id)?;
        self.instruments.remove(index);

        for inst in &mut self.instruments {
            inst.pairings.retain(|pair_id| pair_id != id);
        }

        Some(Change::Removed(id.to_string()))
    }

    /// Links `a` and `b` on both sides. Self-pairings and pairings with
    /// unknown instruments are ignored, and existing pairings are left as is.
    pub fn create_pairing(&mut self, a: &str, b: &str) -> Option<Change> {
        if a == b || self.get(a).is_none() || self.get(b).is_none() {
            return None;
        }

        let mut changed = false;
        for inst in &mut self.instruments {
            let partner = if inst.id == a {
                b
            } else if inst.id == b {
                a
            } else {
                continue;
            };

            if !inst.is_paired_with(partner) {
                inst.pairings.push(partner.to_string());
                changed = true;
            }
        }

        changed.then(|| Change::Paired(a.to_string(), b.to_string()))
    }

    pub fn remove_pairing(&mut self, a: &str, b: &str) -> Option<Change> {
        let mut changed = false;
        for inst in &mut self.instruments {
            let partner = if inst.id == a {
                b
            } else if inst.id == b {
                a
            } else {
                continue;
            };

            let before = inst.pairings.len();
            inst.pairings.retain(|pair_id| pair_id != partner);
            changed |= inst.pairings.len() != before;
        }

        changed.then(|| Change::Unpaired(a.to_string(), b.to_string()))
    }

    pub fn mark_used(&mut self, id: &str) -> Option<Change> {
        let instrument = self.get_mut(id)?;
        instrument.metadata.usage_count += 1;
        instrument.metadata.last_used = Some(Utc::now());
        Some(Change::Updated(id.to_string()))
    }

    /// Sorted, deduplicated union of every instrument's tags.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .instruments
            .iter()
            .flat_map(|inst| inst.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}
