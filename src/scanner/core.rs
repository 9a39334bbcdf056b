use crate::utils::error::{CatalogError, Result};
use std::path::{Path, PathBuf};

use super::lister::{DirectoryLister, FsLister, ListedEntry};
use super::parse::ScannedItem;

/// Deepest directory level listed below a scan root.
pub const MAX_SCAN_DEPTH: usize = 5;

const PLUGIN_FILE_EXTENSION: &str = ".vst3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    /// One-based index of the path being scanned.
    pub current: usize,
    pub total: usize,
    pub path: PathBuf,
    pub found: usize,
}

pub struct Scanner<L = FsLister> {
    lister: L,
}

impl Scanner<FsLister> {
    pub fn new() -> Self {
        Self { lister: FsLister }
    }
}

impl<L: DirectoryLister> Scanner<L> {
    pub fn with_lister(lister: L) -> Self {
        Self { lister }
    }

    /// Scans a user-chosen directory. Only folders are candidates.
    pub fn scan(&self, dir: &Path) -> Result<Vec<ScannedItem>> {
        let items: Vec<ScannedItem> = self
            .collect_entries(dir)?
            .into_iter()
            .filter(|entry| entry.is_directory)
            .map(ScannedItem::from_folder)
            .collect();

        log::info!("Scanned {}: {} candidates", dir.display(), items.len());
        Ok(items)
    }

    /// Scans each default path in turn. Folders and plugin files are
    /// candidates. Unreadable paths are skipped; an overall empty result is
    /// reported as [`CatalogError::NothingFound`].
    pub fn auto_scan<F>(&self, paths: &[PathBuf], mut on_progress: F) -> Result<Vec<ScannedItem>>
    where
        F: FnMut(ScanProgress),
    {
        let mut items = Vec::new();
        let total = paths.len();

        for (index, path) in paths.iter().enumerate() {
            let progress = |found| ScanProgress {
                current: index + 1,
                total,
                path: path.clone(),
                found,
            };
            on_progress(progress(items.len()));

            match self.scan_plugin_directory(path) {
                Ok(found) => {
                    items.extend(found);
                    on_progress(progress(items.len()));
                }
                Err(e) => {
                    log::warn!("Could not scan path {}: {}", path.display(), e);
                }
            }
        }

        if items.is_empty() {
            return Err(CatalogError::NothingFound);
        }

        log::info!("Auto-scan found {} candidates in {} paths", items.len(), total);
        Ok(items)
    }

    fn scan_plugin_directory(&self, dir: &Path) -> Result<Vec<ScannedItem>> {
        let items = self
            .collect_entries(dir)?
            .into_iter()
            .filter_map(|entry| {
                if entry.is_directory {
                    Some(ScannedItem::from_folder(entry))
                } else if is_plugin_file(&entry.name) {
                    Some(ScannedItem::from_plugin_file(entry))
                } else {
                    None
                }
            })
            .collect();

        Ok(items)
    }

    /// Lists `root` and everything below it down to [`MAX_SCAN_DEPTH`], in
    /// pre-order. Only a failure to list `root` itself is an error.
    fn collect_entries(&self, root: &Path) -> Result<Vec<ListedEntry>> {
        let listed = self.lister.list(root).map_err(|source| CatalogError::Access {
            path: root.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        self.descend(listed, 1, &mut entries);
        Ok(entries)
    }

    fn descend(&self, listed: Vec<ListedEntry>, depth: usize, out: &mut Vec<ListedEntry>) {
        for entry in listed {
            let child_dir = (entry.is_directory && depth <= MAX_SCAN_DEPTH).then(|| entry.path.clone());
            out.push(entry);

            if let Some(dir) = child_dir {
                match self.lister.list(&dir) {
                    Ok(children) => self.descend(children, depth + 1, out),
                    Err(e) => log::debug!("Skipping {}: {}", dir.display(), e),
                }
            }
        }
    }
}

fn is_plugin_file(name: &str) -> bool {
    name.to_lowercase().ends_with(PLUGIN_FILE_EXTENSION)
}

#[cfg(target_os = "windows")]
pub fn default_scan_paths() -> Vec<PathBuf> {
    super::windows::default_scan_paths()
}

#[cfg(target_os = "macos")]
pub fn default_scan_paths() -> Vec<PathBuf> {
    super::macos::default_scan_paths()
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn default_scan_paths() -> Vec<PathBuf> {
    Vec::new()
}
