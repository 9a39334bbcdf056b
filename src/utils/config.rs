use std::path::PathBuf;

use crate::scanner::default_scan_paths;

const APP_DIR_NAME: &str = "instrument-catalog";
const DATA_DIR_ENV: &str = "INSTRUMENT_CATALOG_DATA_DIR";
const SCAN_PATHS_ENV: &str = "INSTRUMENT_CATALOG_SCAN_PATHS";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one JSON file per persisted store.
    pub data_dir: PathBuf,
    /// Directories walked by the automatic scan, in order.
    pub scan_paths: Vec<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let scan_paths = std::env::var_os(SCAN_PATHS_ENV)
            .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
            .filter(|paths| !paths.is_empty())
            .unwrap_or_else(default_scan_paths);

        Self {
            data_dir,
            scan_paths,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
