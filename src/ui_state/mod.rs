mod analytics;
mod discovery;

pub use analytics::Analytics;
use discovery::pick_suggestion;

use crate::instrument::{Category, Host, Instrument};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Recent,
    Category,
    Developer,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Recent,
        SortKey::Category,
        SortKey::Developer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Recent => "Recently added",
            SortKey::Category => "Category",
            SortKey::Developer => "Developer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    Compact,
    #[default]
    Spacious,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionView {
    pub sort_by: SortKey,
    pub density: Density,
    pub selected_card_ids: Vec<String>,
}

/// Transient view state. Nothing here is persisted.
///
/// Filters and dialogs are independent: clearing filters leaves dialogs
/// and the card selection alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub search_query: String,
    selected_tags: Vec<String>,
    selected_categories: Vec<Category>,
    selected_hosts: Vec<Host>,
    add_instrument_open: bool,
    edit_instrument_open: bool,
    editing_instrument_id: Option<String>,
    suggested_instrument_id: Option<String>,
    collection: CollectionView,
}

fn toggle<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if let Some(index) = set.iter().position(|v| *v == value) {
        set.remove(index);
    } else {
        set.push(value);
    }
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.selected_tags
    }

    pub fn selected_categories(&self) -> &[Category] {
        &self.selected_categories
    }

    pub fn selected_hosts(&self) -> &[Host] {
        &self.selected_hosts
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        toggle(&mut self.selected_tags, tag.to_string());
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.selected_categories, category);
    }

    pub fn toggle_host(&mut self, host: Host) {
        toggle(&mut self.selected_hosts, host);
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty()
            || !self.selected_tags.is_empty()
            || !self.selected_categories.is_empty()
            || !self.selected_hosts.is_empty()
    }

    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.selected_tags.clear();
        self.selected_categories.clear();
        self.selected_hosts.clear();
    }

    // Dialogs

    pub fn is_add_instrument_open(&self) -> bool {
        self.add_instrument_open
    }

    pub fn open_add_instrument(&mut self) {
        self.add_instrument_open = true;
    }

    pub fn close_add_instrument(&mut self) {
        self.add_instrument_open = false;
    }

    pub fn is_edit_instrument_open(&self) -> bool {
        self.edit_instrument_open
    }

    pub fn editing_instrument_id(&self) -> Option<&str> {
        self.editing_instrument_id.as_deref()
    }

    pub fn open_edit_instrument(&mut self, id: &str) {
        self.edit_instrument_open = true;
        self.editing_instrument_id = Some(id.to_string());
    }

    pub fn close_edit_instrument(&mut self) {
        self.edit_instrument_open = false;
        self.editing_instrument_id = None;
    }

    // Discovery

    pub fn suggested_instrument_id(&self) -> Option<&str> {
        self.suggested_instrument_id.as_deref()
    }

    pub fn set_suggested_instrument(&mut self, id: Option<String>) {
        self.suggested_instrument_id = id;
    }

    /// Picks a weighted-random suggestion. An empty collection leaves the
    /// current suggestion untouched.
    pub fn surprise_me(&mut self, instruments: &[Instrument]) {
        let now = chrono::Utc::now();
        if let Some(id) = pick_suggestion(instruments, now, &mut rand::thread_rng()) {
            log::debug!("Suggesting instrument {}", id);
            self.suggested_instrument_id = Some(id.to_string());
        }
    }

    // Collection view

    pub fn collection(&self) -> &CollectionView {
        &self.collection
    }

    pub fn set_collection_sort(&mut self, sort_by: SortKey) {
        self.collection.sort_by = sort_by;
    }

    pub fn set_view_density(&mut self, density: Density) {
        self.collection.density = density;
    }

    pub fn toggle_card_selection(&mut self, id: &str) {
        toggle(&mut self.collection.selected_card_ids, id.to_string());
    }

    pub fn is_card_selected(&self, id: &str) -> bool {
        self.collection.selected_card_ids.iter().any(|c| c == id)
    }

    pub fn clear_selection(&mut self) {
        self.collection.selected_card_ids.clear();
    }

    // Filtering

    /// Collection list filter: search over name, developer and tags, plus
    /// the category and host filters.
    pub fn matches_collection(&self, inst: &Instrument) -> bool {
        let query = self.search_query.trim().to_lowercase();
        let matches_search = query.is_empty()
            || inst.name.to_lowercase().contains(&query)
            || inst.developer.to_lowercase().contains(&query)
            || inst.tags.iter().any(|t| t.to_lowercase().contains(&query));

        matches_search && self.matches_category(inst) && self.matches_host(inst)
    }

    /// Canvas visibility: search over name, developer and category, any
    /// selected tag, plus the category and host filters.
    pub fn visible_on_canvas(&self, inst: &Instrument) -> bool {
        let query = self.search_query.to_lowercase();
        let matches_search = query.is_empty()
            || inst.name.to_lowercase().contains(&query)
            || inst.developer.to_lowercase().contains(&query)
            || inst.category.as_str().to_lowercase().contains(&query);

        let matches_tags =
            self.selected_tags.is_empty() || self.selected_tags.iter().any(|t| inst.has_tag(t));

        matches_search && matches_tags && self.matches_category(inst) && self.matches_host(inst)
    }

    fn matches_category(&self, inst: &Instrument) -> bool {
        self.selected_categories.is_empty() || self.selected_categories.contains(&inst.category)
    }

    fn matches_host(&self, inst: &Instrument) -> bool {
        self.selected_hosts.is_empty() || self.selected_hosts.contains(&inst.host)
    }

    /// Filtered and sorted view of the collection.
    pub fn collection_items<'a>(&self, instruments: &'a [Instrument]) -> Vec<&'a Instrument> {
        let mut items: Vec<&Instrument> = instruments
            .iter()
            .filter(|inst| self.matches_collection(inst))
            .collect();

        let sort_by = self.collection.sort_by;
        items.sort_by(|a, b| compare(sort_by, a, b));
        items
    }
}

fn compare(sort_by: SortKey, a: &Instrument, b: &Instrument) -> Ordering {
    match sort_by {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Recent => b.metadata.created_at.cmp(&a.metadata.created_at),
        SortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        SortKey::Developer => a.developer.to_lowercase().cmp(&b.developer.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::instrument;
    use chrono::{Duration, Utc};

    #[test]
    fn toggling_a_tag_twice_restores_state() {
        let mut ui = UiState::new();
        ui.toggle_tag("Pads");
        ui.toggle_tag("Pads");
        assert!(ui.selected_tags().is_empty());
    }

    #[test]
    fn toggled_tags_keep_insertion_order() {
        let mut ui = UiState::new();
        ui.toggle_tag("Pads");
        ui.toggle_tag("Hidden Gem");
        ui.toggle_tag("Ambient");
        assert_eq!(ui.selected_tags(), ["Pads", "Hidden Gem", "Ambient"]);
    }

    #[test]
    fn category_and_host_toggles() {
        let mut ui = UiState::new();
        ui.toggle_category(Category::Synth);
        ui.toggle_host(Host::AU);
        ui.toggle_category(Category::Keys);
        ui.toggle_category(Category::Synth);

        assert_eq!(ui.selected_categories(), [Category::Keys]);
        assert_eq!(ui.selected_hosts(), [Host::AU]);
    }

    #[test]
    fn clear_filters_leaves_dialogs_and_selection() {
        let mut ui = UiState::new();
        ui.set_search_query("piano");
        ui.toggle_tag("Pads");
        ui.toggle_category(Category::Keys);
        ui.toggle_host(Host::Kontakt);
        ui.open_edit_instrument("a");
        ui.open_add_instrument();
        ui.toggle_card_selection("a");
        ui.set_suggested_instrument(Some("a".to_string()));

        ui.clear_filters();

        assert!(!ui.has_active_filters());
        assert!(ui.is_add_instrument_open());
        assert!(ui.is_edit_instrument_open());
        assert_eq!(ui.editing_instrument_id(), Some("a"));
        assert!(ui.is_card_selected("a"));
        assert_eq!(ui.suggested_instrument_id(), Some("a"));
    }

    #[test]
    fn edit_dialog_tracks_target() {
        let mut ui = UiState::new();
        ui.open_edit_instrument("x");
        assert!(ui.is_edit_instrument_open());
        ui.close_edit_instrument();
        assert!(!ui.is_edit_instrument_open());
        assert_eq!(ui.editing_instrument_id(), None);
        assert!(!ui.is_add_instrument_open());
    }

    #[test]
    fn card_selection_toggles() {
        let mut ui = UiState::new();
        ui.toggle_card_selection("a");
        ui.toggle_card_selection("b");
        ui.toggle_card_selection("a");
        assert_eq!(ui.collection().selected_card_ids, vec!["b".to_string()]);
        ui.clear_selection();
        assert!(ui.collection().selected_card_ids.is_empty());
    }

    #[test]
    fn view_preferences() {
        let mut ui = UiState::new();
        assert_eq!(ui.collection().sort_by, SortKey::Name);
        assert_eq!(ui.collection().density, Density::Spacious);
        ui.set_collection_sort(SortKey::Developer);
        ui.set_view_density(Density::Compact);
        assert_eq!(ui.collection().sort_by, SortKey::Developer);
        assert_eq!(ui.collection().density, Density::Compact);
    }

    #[test]
    fn collection_search_covers_name_developer_and_tags() {
        let mut pads = instrument("1", "Pigments");
        pads.tags = vec!["Warm Pads".to_string()];
        let mut diva = instrument("2", "Diva");
        diva.developer = "u-he".to_string();
        let instruments = vec![pads, diva];
        let mut ui = UiState::new();

        ui.set_search_query("pads");
        let names: Vec<_> = ui.collection_items(&instruments).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Pigments"]);

        ui.set_search_query("U-HE");
        let names: Vec<_> = ui.collection_items(&instruments).iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Diva"]);
    }

    #[test]
    fn collection_sorts() {
        let now = Utc::now();
        let mut a = instrument("1", "beta");
        a.developer = "Zeta".to_string();
        a.category = Category::Synth;
        a.metadata.created_at = now - Duration::days(2);
        let mut b = instrument("2", "Alpha");
        b.developer = "arturia".to_string();
        b.category = Category::Keys;
        b.metadata.created_at = now;
        let instruments = vec![a, b];
        let mut ui = UiState::new();

        let order = |ui: &UiState| -> Vec<String> {
            ui.collection_items(&instruments).iter().map(|i| i.id.clone()).collect()
        };

        assert_eq!(order(&ui), vec!["2", "1"]);
        ui.set_collection_sort(SortKey::Recent);
        assert_eq!(order(&ui), vec!["2", "1"]);
        ui.set_collection_sort(SortKey::Category);
        assert_eq!(order(&ui), vec!["2", "1"]);
        ui.set_collection_sort(SortKey::Developer);
        assert_eq!(order(&ui), vec!["2", "1"]);
    }

    #[test]
    fn category_and_host_filters_apply() {
        let mut keys = instrument("1", "Piano");
        keys.category = Category::Keys;
        keys.host = Host::Kontakt;
        let mut synth = instrument("2", "Pigments");
        synth.category = Category::Synth;
        let instruments = vec![keys, synth];
        let mut ui = UiState::new();

        ui.toggle_category(Category::Keys);
        assert_eq!(ui.collection_items(&instruments).len(), 1);
        ui.toggle_host(Host::VST3);
        assert!(ui.collection_items(&instruments).is_empty());
    }

    #[test]
    fn canvas_visibility_uses_any_tag_and_category_search() {
        let mut inst = instrument("1", "Pigments");
        inst.category = Category::Synth;
        inst.tags = vec!["Pads".to_string()];
        let mut ui = UiState::new();

        ui.set_search_query("synth");
        assert!(ui.visible_on_canvas(&inst));
        assert!(!ui.matches_collection(&inst));

        ui.clear_filters();
        ui.toggle_tag("Leads");
        assert!(!ui.visible_on_canvas(&inst));
        ui.toggle_tag("Pads");
        assert!(ui.visible_on_canvas(&inst));
    }

    #[test]
    fn surprise_me_on_empty_collection_selects_nothing() {
        let mut ui = UiState::new();
        ui.surprise_me(&[]);
        assert_eq!(ui.suggested_instrument_id(), None);
    }

    #[test]
    fn surprise_me_picks_from_collection() {
        let mut ui = UiState::new();
        let instruments = vec![instrument("only", "Only")];
        ui.surprise_me(&instruments);
        assert_eq!(ui.suggested_instrument_id(), Some("only"));
    }
}
