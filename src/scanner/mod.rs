mod core;
mod import;
mod lister;
mod parse;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

pub use self::core::{default_scan_paths, ScanProgress, Scanner};
pub use import::import_items;
pub use parse::{ParsedFields, ScannedItem};
