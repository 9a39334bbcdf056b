use crate::instrument::Position;
use serde::{Deserialize, Serialize};

use super::storage::Collection;
use super::{new_id, Change};

/// A named cluster of instrument ids. Membership is not cleaned up when an
/// instrument is deleted, so ids may dangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instruments: Vec<String>,
    pub position: Position,
    pub color: String,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub name: String,
    pub description: String,
    pub instruments: Vec<String>,
    pub position: Position,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instruments: Option<Vec<String>>,
    pub position: Option<Position>,
    pub color: Option<String>,
    pub collapsed: Option<bool>,
}

impl GroupPatch {
    fn apply(self, group: &mut InstrumentGroup) {
        if let Some(name) = self.name {
            group.name = name;
        }
        if let Some(description) = self.description {
            group.description = description;
        }
        if let Some(instruments) = self.instruments {
            group.instruments = instruments;
        }
        if let Some(position) = self.position {
            group.position = position;
        }
        if let Some(color) = self.color {
            group.color = color;
        }
        if let Some(collapsed) = self.collapsed {
            group.collapsed = collapsed;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupStore {
    groups: Vec<InstrumentGroup>,
}

impl Collection for GroupStore {
    const KEY: &'static str = "group-storage";
}

impl GroupStore {
    pub fn groups(&self) -> &[InstrumentGroup] {
        &self.groups
    }

    pub fn get(&self, id: &str) -> Option<&InstrumentGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut InstrumentGroup> {
        self.groups.iter_mut().find(|group| group.id == id)
    }

    pub fn add(&mut self, data: NewGroup) -> Change {
        let id = new_id();
        self.groups.push(InstrumentGroup {
            id: id.clone(),
            name: data.name,
            description: data.description,
            instruments: data.instruments,
            position: data.position,
            color: data.color,
            collapsed: false,
        });
        Change::Added(id)
    }

    pub fn update(&mut self, id: &str, patch: GroupPatch) -> Option<Change> {
        patch.apply(self.get_mut(id)?);
        Some(Change::Updated(id.to_string()))
    }

    pub fn delete(&mut self, id: &str) -> Option<Change> {
        let index = self.groups.iter().position(|group| group.id == id)?;
        self.groups.remove(index);
        Some(Change::Removed(id.to_string()))
    }

    pub fn toggle_collapse(&mut self, id: &str) -> Option<Change> {
        let group = self.get_mut(id)?;
        group.collapsed = !group.collapsed;
        Some(Change::Updated(id.to_string()))
    }

    pub fn add_instrument(&mut self, group_id: &str, instrument_id: &str) -> Option<Change> {
        let group = self.get_mut(group_id)?;
        if group.instruments.iter().any(|id| id == instrument_id) {
            return None;
        }
        group.instruments.push(instrument_id.to_string());
        Some(Change::Updated(group_id.to_string()))
    }

    pub fn remove_instrument(&mut self, group_id: &str, instrument_id: &str) -> Option<Change> {
        let group = self.get_mut(group_id)?;
        let before = group.instruments.len();
        group.instruments.retain(|id| id != instrument_id);
        (group.instruments.len() != before).then(|| Change::Updated(group_id.to_string()))
    }
}
