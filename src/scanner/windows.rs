use std::path::PathBuf;

pub(super) fn default_scan_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files\Common Files\VST3\"),
        PathBuf::from(r"C:\Program Files\VSTPlugins\"),
        PathBuf::from(r"C:\Program Files (x86)\Common Files\VST3\"),
    ]
}
