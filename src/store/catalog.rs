use crate::instrument::{InstrumentPatch, NewInstrument};
use crate::scanner::{import_items, ScannedItem};
use crate::utils::error::Result;

use super::groups::{GroupPatch, GroupStore, NewGroup};
use super::instruments::InstrumentStore;
use super::storage::{JsonFileStorage, Repository, Storage};
use super::templates::{NewTemplate, TemplatePatch, TemplateStore};
use super::Change;

/// Owns the instrument, group and template stores and writes each one back
/// through the repository after every change to it.
pub struct Catalog<S = JsonFileStorage> {
    repository: Repository<S>,
    instruments: InstrumentStore,
    groups: GroupStore,
    templates: TemplateStore,
}

impl<S: Storage> Catalog<S> {
    pub fn open(storage: S) -> Result<Self> {
        let repository = Repository::new(storage);
        let instruments: InstrumentStore = repository.load()?;
        let groups: GroupStore = repository.load()?;
        let templates: TemplateStore = repository.load()?;

        log::info!(
            "Loaded {} instruments, {} groups, {} templates",
            instruments.instruments().len(),
            groups.groups().len(),
            templates.templates().len()
        );

        Ok(Self {
            repository,
            instruments,
            groups,
            templates,
        })
    }

    pub fn instruments(&self) -> &InstrumentStore {
        &self.instruments
    }

    pub fn groups(&self) -> &GroupStore {
        &self.groups
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        self.repository.storage()
    }

    fn commit_instruments(&self, change: Option<Change>) -> Result<Option<Change>> {
        self.repository.commit(&self.instruments, &change)?;
        Ok(change)
    }

    fn commit_groups(&self, change: Option<Change>) -> Result<Option<Change>> {
        self.repository.commit(&self.groups, &change)?;
        Ok(change)
    }

    fn commit_templates(&self, change: Option<Change>) -> Result<Option<Change>> {
        self.repository.commit(&self.templates, &change)?;
        Ok(change)
    }

    // Instruments

    pub fn add_instrument(&mut self, data: NewInstrument) -> Result<String> {
        let change = self.instruments.add(data);
        let id = change.id().to_string();
        self.commit_instruments(Some(change))?;
        Ok(id)
    }

    pub fn update_instrument(&mut self, id: &str, patch: InstrumentPatch) -> Result<Option<Change>> {
        let change = self.instruments.update(id, patch);
        self.commit_instruments(change)
    }

    /// Group and template membership is left alone.
    pub fn delete_instrument(&mut self, id: &str) -> Result<Option<Change>> {
        let change = self.instruments.delete(id);
        self.commit_instruments(change)
    }

    pub fn create_pairing(&mut self, a: &str, b: &str) -> Result<Option<Change>> {
        let change = self.instruments.create_pairing(a, b);
        self.commit_instruments(change)
    }

    pub fn remove_pairing(&mut self, a: &str, b: &str) -> Result<Option<Change>> {
        let change = self.instruments.remove_pairing(a, b);
        self.commit_instruments(change)
    }

    pub fn mark_used(&mut self, id: &str) -> Result<Option<Change>> {
        let change = self.instruments.mark_used(id);
        self.commit_instruments(change)
    }

    /// Adds one instrument per reviewed item that carries parsed fields.
    pub fn import_scanned(&mut self, items: &[ScannedItem]) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for data in import_items(items) {
            ids.push(self.add_instrument(data)?);
        }
        log::info!("Imported {} of {} scanned items", ids.len(), items.len());
        Ok(ids)
    }

    // Groups

    pub fn add_group(&mut self, data: NewGroup) -> Result<Option<Change>> {
        let change = self.groups.add(data);
        self.commit_groups(Some(change))
    }

    pub fn update_group(&mut self, id: &str, patch: GroupPatch) -> Result<Option<Change>> {
        let change = self.groups.update(id, patch);
        self.commit_groups(change)
    }

    pub fn delete_group(&mut self, id: &str) -> Result<Option<Change>> {
        let change = self.groups.delete(id);
        self.commit_groups(change)
    }

    pub fn toggle_group_collapse(&mut self, id: &str) -> Result<Option<Change>> {
        let change = self.groups.toggle_collapse(id);
        self.commit_groups(change)
    }

    pub fn add_instrument_to_group(
        &mut self,
        group_id: &str,
        instrument_id: &str,
    ) -> Result<Option<Change>> {
        let change = self.groups.add_instrument(group_id, instrument_id);
        self.commit_groups(change)
    }

    pub fn remove_instrument_from_group(
        &mut self,
        group_id: &str,
        instrument_id: &str,
    ) -> Result<Option<Change>> {
        let change = self.groups.remove_instrument(group_id, instrument_id);
        self.commit_groups(change)
    }

    // Templates

    pub fn add_template(&mut self, data: NewTemplate) -> Result<Option<Change>> {
        let change = self.templates.add(data);
        self.commit_templates(Some(change))
    }

    pub fn update_template(&mut self, id: &str, patch: TemplatePatch) -> Result<Option<Change>> {
        let change = self.templates.update(id, patch);
        self.commit_templates(change)
    }

    pub fn delete_template(&mut self, id: &str) -> Result<Option<Change>> {
        let change = self.templates.delete(id);
        self.commit_templates(change)
    }

    /// Re-applies a template's pairings and layout to existing instruments.
    pub fn load_template(&mut self, id: &str) -> Result<Vec<Change>> {
        let changes = self.templates.load(id, &mut self.instruments);
        if let Some(last) = changes.last().cloned() {
            self.commit_instruments(Some(last))?;
        }
        Ok(changes)
    }
}
