use crate::canvas::{self, CanvasGraph};
use crate::instrument::Position;
use crate::scanner::{ScanProgress, ScannedItem};
use crate::store::{Catalog, GroupPatch, JsonFileStorage, NewGroup, TemplatePatch};
use crate::ui_state::UiState;
use crate::utils::config::Config;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;

use super::forms::{GroupForm, InstrumentForm, TemplateForm};
use super::scan::{ScanEvent, ScanJob, ScanRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Canvas,
    Collection,
}

/// User gestures collected while drawing a frame and applied afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MarkUsed(String),
    Edit(String),
    Delete(String),
    ConfirmDelete(String),
    ToggleCard(String),
    PairWithSelection(String),
    RemovePairing(String, String),
    NodeDragged(String, Position),
    GroupMoved(String, Position),
    NodeClicked(String),
    Connect(String, String),
    LoadTemplate(String),
    RecaptureTemplate(String),
    DeleteTemplate(String),
    ToggleGroup(String),
    DeleteGroup(String),
    AddToGroup(String, String),
    RemoveFromGroup(String, String),
}

pub struct CatalogApp {
    pub config: Config,
    pub catalog: Catalog,
    pub ui: UiState,
    pub view: View,
    pub scan_job: Option<ScanJob>,
    pub scan_progress: Option<ScanProgress>,
    pub scanned_items: Vec<ScannedItem>,
    pub selected_items: HashSet<PathBuf>,
    pub selected_developers: HashSet<String>,
    pub selected_node_ids: Vec<String>,
    pub connect_from: Option<String>,
    /// Instrument being dragged on the canvas and its live position.
    pub dragging: Option<(String, Position)>,
    pub pending_delete: Option<String>,
    pub instrument_form: InstrumentForm,
    pub template_form: TemplateForm,
    pub group_form: GroupForm,
    pub error_message: Option<String>,
    pending: Vec<Action>,
}

impl CatalogApp {
    pub fn new(config: Config) -> Result<Self> {
        let storage = JsonFileStorage::new(&config.data_dir);
        log::info!("Using data directory {}", storage.dir().display());
        let catalog = Catalog::open(storage).context("Failed to load the catalog")?;

        Ok(Self {
            config,
            catalog,
            ui: UiState::new(),
            view: View::Canvas,
            scan_job: None,
            scan_progress: None,
            scanned_items: Vec::new(),
            selected_items: HashSet::new(),
            selected_developers: HashSet::new(),
            selected_node_ids: Vec::new(),
            connect_from: None,
            dragging: None,
            pending_delete: None,
            instrument_form: InstrumentForm::default(),
            template_form: TemplateForm::default(),
            group_form: GroupForm::default(),
            error_message: None,
            pending: Vec::new(),
        })
    }

    pub fn scanning(&self) -> bool {
        self.scan_job.is_some()
    }

    pub fn graph(&self) -> CanvasGraph {
        CanvasGraph::project(
            self.catalog.instruments().instruments(),
            self.catalog.groups().groups(),
        )
    }

    /// Instruments picked in the active view: canvas nodes or collection cards.
    pub fn current_selection(&self) -> Vec<String> {
        match self.view {
            View::Canvas => self.selected_node_ids.clone(),
            View::Collection => self.ui.collection().selected_card_ids.clone(),
        }
    }

    pub fn queue(&mut self, action: Action) {
        self.pending.push(action);
    }

    pub fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            log::error!("{:#}", e);
            self.error_message = Some(format!("{:#}", e));
        }
    }

    // Scanning

    pub fn start_scan(&mut self, request: ScanRequest) {
        if self.scanning() {
            return;
        }
        self.scanned_items.clear();
        self.selected_items.clear();
        self.selected_developers.clear();
        self.scan_progress = None;
        self.scan_job = Some(ScanJob::spawn(request));
    }

    pub fn start_auto_scan(&mut self) {
        let paths = self.config.scan_paths.clone();
        self.start_scan(ScanRequest::Defaults(paths));
    }

    pub fn poll_scan(&mut self) {
        let Some(job) = &self.scan_job else {
            return;
        };

        for event in job.poll() {
            match event {
                ScanEvent::Progress(progress) => self.scan_progress = Some(progress),
                ScanEvent::Finished(result) => {
                    self.scan_job = None;
                    self.scan_progress = None;
                    match result {
                        Ok(items) => self.scanned_items = items,
                        Err(e) => self.report(Err(e.context("Scan failed"))),
                    }
                    break;
                }
            }
        }
    }

    // Forms

    pub fn submit_instrument_form(&mut self) -> Result<()> {
        if let Some(id) = self.ui.editing_instrument_id().map(str::to_string) {
            let patch = self.instrument_form.to_patch()?;
            self.catalog.update_instrument(&id, patch)?;
            self.ui.close_edit_instrument();
        } else {
            let data = self.instrument_form.to_new()?;
            self.catalog.add_instrument(data)?;
            self.ui.close_add_instrument();
        }
        self.instrument_form = InstrumentForm::default();
        Ok(())
    }

    pub fn create_template_from_selection(&mut self) -> Result<()> {
        let name = self.template_form.name.trim().to_string();
        if name.is_empty() {
            return Ok(());
        }

        let template = canvas::capture_template(
            self.catalog.instruments().instruments(),
            &self.current_selection(),
            &name,
            self.template_form.description.trim(),
        )
        .context("Select at least one instrument to create a template")?;

        self.catalog.add_template(template)?;
        self.template_form = TemplateForm::default();
        Ok(())
    }

    pub fn create_group_from_selection(&mut self) -> Result<()> {
        let name = self.group_form.name.trim().to_string();
        if name.is_empty() {
            return Ok(());
        }

        let instruments = self.catalog.instruments();
        let members: Vec<String> = self
            .current_selection()
            .into_iter()
            .filter(|id| instruments.get(id).is_some())
            .collect();
        let position = members
            .first()
            .and_then(|id| instruments.get(id))
            .map(|inst| Position::new(inst.position.x - 20.0, inst.position.y - 60.0))
            .unwrap_or_default();

        let change = self.catalog.add_group(NewGroup {
            name,
            description: self.group_form.description.trim().to_string(),
            instruments: Vec::new(),
            position,
            color: self.group_form.color.clone(),
        })?;

        if let Some(change) = change {
            for member in &members {
                self.catalog.add_instrument_to_group(change.id(), member)?;
            }
        }
        self.group_form = GroupForm::default();
        Ok(())
    }

    // Actions

    pub fn apply_pending(&mut self) {
        for action in std::mem::take(&mut self.pending) {
            let result = self.apply(action);
            self.report(result);
        }
    }

    fn apply(&mut self, action: Action) -> Result<()> {
        match action {
            Action::MarkUsed(id) => {
                self.catalog.mark_used(&id)?;
            }
            Action::Edit(id) => {
                if let Some(inst) = self.catalog.instruments().get(&id) {
                    self.instrument_form = InstrumentForm::from_instrument(inst);
                    self.ui.open_edit_instrument(&id);
                }
            }
            Action::Delete(id) => self.pending_delete = Some(id),
            Action::ConfirmDelete(id) => {
                self.pending_delete = None;
                self.catalog.delete_instrument(&id)?;
                self.selected_node_ids.retain(|s| s != &id);
                if self.ui.is_card_selected(&id) {
                    self.ui.toggle_card_selection(&id);
                }
            }
            Action::ToggleCard(id) => self.ui.toggle_card_selection(&id),
            Action::PairWithSelection(id) => {
                if let Some(first) = self.current_selection().first().cloned() {
                    if first != id {
                        self.catalog.create_pairing(&id, &first)?;
                    }
                }
            }
            Action::RemovePairing(a, b) => {
                self.catalog.remove_pairing(&a, &b)?;
            }
            Action::NodeDragged(id, position) => {
                self.dragging = None;
                canvas::on_node_drag_stop(&mut self.catalog, &id, position)?;
            }
            Action::NodeClicked(id) => {
                self.selected_node_ids = self.graph().click_selection(&id);
            }
            Action::Connect(source, target) => {
                canvas::on_connect(&mut self.catalog, &source, &target)?;
                self.connect_from = None;
            }
            Action::LoadTemplate(id) => {
                self.catalog.load_template(&id)?;
            }
            Action::RecaptureTemplate(id) => {
                let Some(template) = self.catalog.templates().get(&id) else {
                    return Ok(());
                };
                let captured = canvas::capture_template(
                    self.catalog.instruments().instruments(),
                    &self.current_selection(),
                    &template.name,
                    &template.description,
                )
                .context("Select at least one instrument to update a template")?;
                self.catalog.update_template(
                    &id,
                    TemplatePatch {
                        instruments: Some(captured.instruments),
                        pairings: Some(captured.pairings),
                        layout: Some(captured.layout),
                        ..Default::default()
                    },
                )?;
            }
            Action::DeleteTemplate(id) => {
                self.catalog.delete_template(&id)?;
            }
            Action::ToggleGroup(id) => {
                self.catalog.toggle_group_collapse(&id)?;
            }
            Action::DeleteGroup(id) => {
                self.catalog.delete_group(&id)?;
            }
            Action::GroupMoved(id, position) => {
                self.dragging = None;
                self.catalog.update_group(
                    &id,
                    GroupPatch {
                        position: Some(position),
                        ..Default::default()
                    },
                )?;
            }
            Action::AddToGroup(group_id, instrument_id) => {
                self.catalog.add_instrument_to_group(&group_id, &instrument_id)?;
            }
            Action::RemoveFromGroup(group_id, instrument_id) => {
                self.catalog
                    .remove_instrument_from_group(&group_id, &instrument_id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::Category;
    use crate::fixtures::new_instrument;

    fn app(dir: &tempfile::TempDir) -> (CatalogApp, String, String) {
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            scan_paths: Vec::new(),
        };
        let mut app = CatalogApp::new(config).unwrap();
        let a = app
            .catalog
            .add_instrument(new_instrument("Strings", Category::Orchestral))
            .unwrap();
        let b = app
            .catalog
            .add_instrument(new_instrument("Brass", Category::Orchestral))
            .unwrap();
        (app, a, b)
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, a, _) = app(&dir);

        app.queue(Action::Delete(a.clone()));
        app.apply_pending();
        assert_eq!(app.pending_delete.as_deref(), Some(a.as_str()));
        assert!(app.catalog.instruments().get(&a).is_some());

        app.queue(Action::ConfirmDelete(a.clone()));
        app.apply_pending();
        assert!(app.pending_delete.is_none());
        assert!(app.catalog.instruments().get(&a).is_none());
    }

    #[test]
    fn pair_with_selection_uses_first_selected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, a, b) = app(&dir);

        app.queue(Action::NodeClicked(a.clone()));
        app.apply_pending();
        assert_eq!(app.selected_node_ids, vec![a.clone()]);

        app.queue(Action::PairWithSelection(b.clone()));
        app.apply_pending();
        assert!(app.catalog.instruments().get(&a).unwrap().is_paired_with(&b));

        app.queue(Action::NodeClicked(a.clone()));
        app.apply_pending();
        assert_eq!(app.selected_node_ids, vec![a, b]);
    }

    #[test]
    fn group_is_created_from_collection_selection() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, a, b) = app(&dir);
        app.view = View::Collection;
        app.ui.toggle_card_selection(&b);
        app.ui.toggle_card_selection("ghost");
        app.group_form.name = "Section".to_string();

        app.create_group_from_selection().unwrap();

        let group = &app.catalog.groups().groups()[0];
        assert_eq!(group.name, "Section");
        assert_eq!(group.instruments, vec![b]);
        assert!(!group.collapsed);
        assert!(!group.instruments.contains(&a));
        assert!(app.group_form.name.is_empty());
    }

    #[test]
    fn template_needs_a_selection_and_can_be_recaptured() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, a, b) = app(&dir);
        app.template_form.name = "Tutti".to_string();
        assert!(app.create_template_from_selection().is_err());

        app.selected_node_ids = vec![a.clone()];
        app.create_template_from_selection().unwrap();
        let id = app.catalog.templates().templates()[0].id.clone();
        assert_eq!(app.catalog.templates().templates()[0].instruments, vec![a.clone()]);

        app.selected_node_ids = vec![a.clone(), b.clone()];
        app.queue(Action::RecaptureTemplate(id.clone()));
        app.apply_pending();

        let template = app.catalog.templates().get(&id).unwrap();
        assert_eq!(template.name, "Tutti");
        assert_eq!(template.instruments.len(), 2);
        assert!(app.error_message.is_none());
    }

    #[test]
    fn failures_land_in_the_error_window() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _, _) = app(&dir);
        app.instrument_form.name = "No developer".to_string();
        app.ui.open_add_instrument();

        let result = app.submit_instrument_form();
        app.report(result);

        assert!(app.error_message.is_some());
        assert!(app.ui.is_add_instrument_open());
    }
}
