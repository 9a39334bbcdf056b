use std::path::PathBuf;

pub(super) fn default_scan_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("/Library/Audio/Plug-Ins/VST3"),
        PathBuf::from("/Library/Audio/Plug-Ins/Components"),
    ];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("Library/Audio/Plug-Ins/VST3"));
        paths.push(home.join("Library/Audio/Plug-Ins/Components"));
    }
    paths
}
