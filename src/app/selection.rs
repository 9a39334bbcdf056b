use super::state::CatalogApp;
use crate::scanner::ScannedItem;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

const UNKNOWN_DEVELOPER: &str = "Unknown";

/// Strips trailing company suffixes so "Arturia Inc." and "Arturia" review
/// under one heading.
pub fn clean_developer_name(name: &str) -> String {
    static SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)[\s,]+(ltd|llc|inc|gmbh|corp|co|ag|a/s)\.?$").unwrap()
    });
    SUFFIX_REGEX.replace_all(name.trim(), "").trim().to_string()
}

fn review_key(item: &ScannedItem) -> String {
    let cleaned = item.developer().map(clean_developer_name).unwrap_or_default();
    if cleaned.is_empty() {
        UNKNOWN_DEVELOPER.to_string()
    } else {
        cleaned
    }
}

impl CatalogApp {
    /// Scan results grouped by developer, each group sorted by name.
    pub fn review_groups(&self) -> BTreeMap<String, Vec<ScannedItem>> {
        let mut grouped: BTreeMap<String, Vec<ScannedItem>> = BTreeMap::new();
        for item in &self.scanned_items {
            grouped.entry(review_key(item)).or_default().push(item.clone());
        }
        for items in grouped.values_mut() {
            items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        grouped
    }

    fn developer_paths(&self, developer: &str) -> Vec<PathBuf> {
        self.scanned_items
            .iter()
            .filter(|item| review_key(item) == developer)
            .map(|item| item.path.clone())
            .collect()
    }

    pub fn toggle_developer(&mut self, developer: &str) {
        let paths = self.developer_paths(developer);
        if self.selected_developers.contains(developer) {
            self.selected_developers.remove(developer);
            for path in &paths {
                self.selected_items.remove(path);
            }
        } else {
            self.selected_developers.insert(developer.to_string());
            self.selected_items.extend(paths);
        }
    }

    pub fn toggle_scanned_item(&mut self, item: &ScannedItem) {
        if self.selected_items.contains(&item.path) {
            self.selected_items.remove(&item.path);
        } else {
            self.selected_items.insert(item.path.clone());
        }

        let developer = review_key(item);
        let all_selected = self
            .developer_paths(&developer)
            .iter()
            .all(|p| self.selected_items.contains(p));
        if all_selected {
            self.selected_developers.insert(developer);
        } else {
            self.selected_developers.remove(&developer);
        }
    }

    pub fn select_all_scanned(&mut self) {
        self.selected_items = self.scanned_items.iter().map(|i| i.path.clone()).collect();
        self.selected_developers = self.scanned_items.iter().map(review_key).collect();
    }

    pub fn clear_scan_selection(&mut self) {
        self.selected_items.clear();
        self.selected_developers.clear();
    }

    /// Imports the checked scan results and drops them from the review list.
    pub fn import_selected(&mut self) -> Result<usize> {
        if self.selected_items.is_empty() {
            return Ok(0);
        }

        let chosen: Vec<ScannedItem> = self
            .scanned_items
            .iter()
            .filter(|item| self.selected_items.contains(&item.path))
            .cloned()
            .collect();
        let ids = self.catalog.import_scanned(&chosen)?;
        log::info!("Imported {} of {} selected items", ids.len(), chosen.len());

        self.scanned_items
            .retain(|item| !self.selected_items.contains(&item.path));
        self.clear_scan_selection();
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ParsedFields;
    use crate::utils::config::Config;

    fn item(name: &str, developer: Option<&str>) -> ScannedItem {
        ScannedItem {
            name: name.to_string(),
            path: PathBuf::from("/plugins").join(name),
            is_directory: true,
            parsed: Some(ParsedFields {
                developer: developer.map(str::to_string),
                instrument_name: Some(name.to_string()),
                ..Default::default()
            }),
        }
    }

    fn app(dir: &tempfile::TempDir) -> CatalogApp {
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            scan_paths: Vec::new(),
        };
        let mut app = CatalogApp::new(config).unwrap();
        app.scanned_items = vec![
            item("Pigments", Some("Arturia Inc.")),
            item("Analog Lab", Some("Arturia")),
            item("Keyscape", Some("Spectrasonics")),
            item("Mystery", None),
        ];
        app
    }

    #[test]
    fn cleans_company_suffixes() {
        assert_eq!(clean_developer_name("Arturia Inc."), "Arturia");
        assert_eq!(clean_developer_name("Native Instruments GmbH"), "Native Instruments");
        assert_eq!(clean_developer_name("Spitfire Audio, Ltd"), "Spitfire Audio");
        assert_eq!(clean_developer_name("Cocoa"), "Cocoa");
    }

    #[test]
    fn review_groups_merge_suffix_variants() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);
        let groups = app.review_groups();

        let names: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Arturia", "Spectrasonics", "Unknown"]);
        assert_eq!(groups["Arturia"][0].name, "Analog Lab");
        assert_eq!(groups["Arturia"][1].name, "Pigments");
    }

    #[test]
    fn developer_checkbox_tracks_its_items() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        app.toggle_developer("Arturia");
        assert_eq!(app.selected_items.len(), 2);

        let pigments = app.scanned_items[0].clone();
        app.toggle_scanned_item(&pigments);
        assert!(!app.selected_developers.contains("Arturia"));

        app.toggle_scanned_item(&pigments);
        assert!(app.selected_developers.contains("Arturia"));

        app.toggle_developer("Arturia");
        assert!(app.selected_items.is_empty());
    }

    #[test]
    fn import_selected_adds_and_removes_from_review() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        assert_eq!(app.import_selected().unwrap(), 0);

        app.toggle_developer("Spectrasonics");
        assert_eq!(app.import_selected().unwrap(), 1);

        let instruments = app.catalog.instruments().instruments();
        assert_eq!(instruments.len(), 1);
        assert_eq!(instruments[0].name, "Keyscape");
        assert_eq!(instruments[0].developer, "Spectrasonics");
        assert_eq!(app.scanned_items.len(), 3);
        assert!(app.selected_items.is_empty());
        assert!(dir.path().join("instrument-storage.json").exists());
    }

    #[test]
    fn select_all_covers_every_developer() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.select_all_scanned();
        assert_eq!(app.selected_items.len(), 4);
        assert_eq!(app.selected_developers.len(), 3);
        app.clear_scan_selection();
        assert!(app.selected_developers.is_empty());
    }
}
