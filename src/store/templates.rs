use crate::instrument::{InstrumentPatch, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::instruments::InstrumentStore;
use super::storage::Collection;
use super::{new_id, Change};

/// Where a loaded template's layout origin is placed on the canvas.
pub const VIEWPORT_CENTER: Position = Position { x: 400.0, y: 300.0 };

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePairing {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TemplatePairing {
    pub fn same_edge(&self, other: &TemplatePairing) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

/// Structural snapshot of a selection: members, pairings among them and
/// their offsets from the first member. Instrument attributes are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub instruments: Vec<String>,
    pub pairings: Vec<TemplatePairing>,
    pub layout: BTreeMap<String, Position>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub instruments: Vec<String>,
    pub pairings: Vec<TemplatePairing>,
    pub layout: BTreeMap<String, Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub instruments: Option<Vec<String>>,
    pub pairings: Option<Vec<TemplatePairing>>,
    pub layout: Option<BTreeMap<String, Position>>,
}

impl TemplatePatch {
    fn apply(self, template: &mut Template) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(tags) = self.tags {
            template.tags = tags;
        }
        if let Some(instruments) = self.instruments {
            template.instruments = instruments;
        }
        if let Some(pairings) = self.pairings {
            template.pairings = pairings;
        }
        if let Some(layout) = self.layout {
            template.layout = layout;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateStore {
    templates: Vec<Template>,
}

impl Collection for TemplateStore {
    const KEY: &'static str = "template-storage";
}

impl TemplateStore {
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub fn add(&mut self, data: NewTemplate) -> Change {
        let id = new_id();
        self.templates.push(Template {
            id: id.clone(),
            name: data.name,
            description: data.description,
            tags: data.tags,
            instruments: data.instruments,
            pairings: data.pairings,
            layout: data.layout,
        });
        Change::Added(id)
    }

    pub fn update(&mut self, id: &str, patch: TemplatePatch) -> Option<Change> {
        let template = self.templates.iter_mut().find(|t| t.id == id)?;
        patch.apply(template);
        Some(Change::Updated(id.to_string()))
    }

    pub fn delete(&mut self, id: &str) -> Option<Change> {
        let index = self.templates.iter().position(|t| t.id == id)?;
        self.templates.remove(index);
        Some(Change::Removed(id.to_string()))
    }

    /// Replays the template onto instruments that still exist: pairings are
    /// recreated and layout offsets are placed around [`VIEWPORT_CENTER`].
    /// Members that no longer exist are not recreated.
    pub fn load(&self, id: &str, instruments: &mut InstrumentStore) -> Vec<Change> {
        let Some(template) = self.get(id) else {
            return Vec::new();
        };

        let mut changes: Vec<Change> = template
            .pairings
            .iter()
            .filter_map(|pairing| instruments.create_pairing(&pairing.from, &pairing.to))
            .collect();

        for (instrument_id, offset) in &template.layout {
            let position = Position::new(VIEWPORT_CENTER.x + offset.x, VIEWPORT_CENTER.y + offset.y);
            changes.extend(instruments.update(instrument_id, InstrumentPatch::position(position)));
        }

        let missing = template
            .instruments
            .iter()
            .filter(|id| instruments.get(id).is_none())
            .count();
        if missing > 0 {
            log::warn!(
                "Template '{}' references {} instruments that no longer exist",
                template.name,
                missing
            );
        }

        changes
    }
}
