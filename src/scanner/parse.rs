use crate::instrument::{Category, Host};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use super::lister::ListedEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFields {
    pub developer: Option<String>,
    pub instrument_name: Option<String>,
    pub host: Option<Host>,
    pub category: Option<Category>,
}

/// A filesystem entry that looks importable, pending user review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedItem {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub parsed: Option<ParsedFields>,
}

impl ScannedItem {
    pub(super) fn from_folder(entry: ListedEntry) -> Self {
        let parsed = parse_folder_name(&entry.name);
        Self::with_inferred(entry, parsed)
    }

    pub(super) fn from_plugin_file(entry: ListedEntry) -> Self {
        let parsed = parse_plugin_file_name(&entry.name);
        Self::with_inferred(entry, parsed)
    }

    fn with_inferred(entry: ListedEntry, parsed: ParsedFields) -> Self {
        let path_text = entry.path.to_string_lossy();
        let host = detect_host(&path_text, &entry.name);
        let category = detect_category(&entry.name);

        Self {
            parsed: Some(ParsedFields {
                host: Some(host),
                category: Some(category),
                ..parsed
            }),
            name: entry.name,
            path: entry.path,
            is_directory: entry.is_directory,
        }
    }

    /// Developer shown during review, before import fallbacks apply.
    pub fn developer(&self) -> Option<&str> {
        self.parsed.as_ref().and_then(|p| p.developer.as_deref())
    }
}

/// Splits "Developer - Instrument" folder names. Falls back to the first
/// bare hyphen, then to the whole name with no developer.
pub fn parse_folder_name(name: &str) -> ParsedFields {
    let parts: Vec<&str> = name.split(" - ").collect();
    if parts.len() >= 2 {
        return ParsedFields {
            developer: Some(parts[0].trim().to_string()),
            instrument_name: Some(parts[1..].join(" - ").trim().to_string()),
            ..Default::default()
        };
    }

    if let Some(index) = name.find('-').filter(|&i| i > 0) {
        return ParsedFields {
            developer: Some(name[..index].trim().to_string()),
            instrument_name: Some(name[index + 1..].trim().to_string()),
            ..Default::default()
        };
    }

    ParsedFields {
        instrument_name: Some(name.to_string()),
        ..Default::default()
    }
}

/// Plugin files split on hyphens or underscores once the extension is gone.
pub fn parse_plugin_file_name(file_name: &str) -> ParsedFields {
    static EXTENSION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.vst3$").unwrap());
    static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]").unwrap());

    let stem = EXTENSION_REGEX.replace(file_name, "");
    let parts: Vec<&str> = SEPARATOR_REGEX.split(&stem).collect();

    if parts.len() >= 2 {
        return ParsedFields {
            developer: Some(parts[0].trim().to_string()),
            instrument_name: Some(parts[1..].join(" ").trim().to_string()),
            ..Default::default()
        };
    }

    ParsedFields {
        instrument_name: Some(stem.into_owned()),
        ..Default::default()
    }
}

// (path keyword, name keyword, host). First match wins.
const HOST_RULES: &[(&str, &str, Host)] = &[
    ("kontakt", "kontakt", Host::Kontakt),
    ("soundbox", "soundbox", Host::Soundbox),
    ("sine", "sine", Host::SINE),
    ("opus", "opus", Host::Opus),
    ("vst", "vst", Host::VST3),
    (".component", "au", Host::AU),
];

const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["orchestr", "string", "brass", "woodwind"], Category::Orchestral),
    (&["synth"], Category::Synth),
    (&["drum", "percussion", "kick", "snare"], Category::Drums),
    (&["piano", "key"], Category::Keys),
    (&["vocal", "choir", "voice"], Category::Vocal),
    (&["world", "ethnic"], Category::World),
    (&["effect", "reverb", "delay", "eq"], Category::Effects),
];

pub fn detect_host(path: &str, name: &str) -> Host {
    let path = path.to_lowercase();
    let name = name.to_lowercase();

    HOST_RULES
        .iter()
        .find(|(path_kw, name_kw, _)| path.contains(path_kw) || name.contains(name_kw))
        .map(|&(_, _, host)| host)
        .unwrap_or(Host::Other)
}

pub fn detect_category(name: &str) -> Category {
    let name = name.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| name.contains(kw)))
        .map(|&(_, category)| category)
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_with_spaced_separator() {
        let parsed = parse_folder_name("Spitfire Audio - BBC Symphony Orchestra");
        assert_eq!(parsed.developer.as_deref(), Some("Spitfire Audio"));
        assert_eq!(parsed.instrument_name.as_deref(), Some("BBC Symphony Orchestra"));
    }

    #[test]
    fn folder_keeps_later_separators_in_name() {
        let parsed = parse_folder_name("Native Instruments - Kontakt - Factory Library");
        assert_eq!(parsed.developer.as_deref(), Some("Native Instruments"));
        assert_eq!(parsed.instrument_name.as_deref(), Some("Kontakt - Factory Library"));
    }

    #[test]
    fn folder_with_bare_hyphen() {
        let parsed = parse_folder_name("Arturia-Pigments");
        assert_eq!(parsed.developer.as_deref(), Some("Arturia"));
        assert_eq!(parsed.instrument_name.as_deref(), Some("Pigments"));
    }

    #[test]
    fn folder_without_hyphen() {
        let parsed = parse_folder_name("SomeSynth");
        assert_eq!(parsed.developer, None);
        assert_eq!(parsed.instrument_name.as_deref(), Some("SomeSynth"));
    }

    #[test]
    fn folder_with_leading_hyphen_has_no_developer() {
        let parsed = parse_folder_name("-Hidden");
        assert_eq!(parsed.developer, None);
        assert_eq!(parsed.instrument_name.as_deref(), Some("-Hidden"));
    }

    #[test]
    fn plugin_file_with_underscores() {
        let parsed = parse_plugin_file_name("Arturia_Pigments_5.vst3");
        assert_eq!(parsed.developer.as_deref(), Some("Arturia"));
        assert_eq!(parsed.instrument_name.as_deref(), Some("Pigments 5"));
    }

    #[test]
    fn plugin_file_with_spaced_hyphen() {
        let parsed = parse_plugin_file_name("u-he - Diva.VST3");
        assert_eq!(parsed.developer.as_deref(), Some("u"));
        assert_eq!(parsed.instrument_name.as_deref(), Some("he   Diva"));
    }

    #[test]
    fn plugin_file_without_separator() {
        let parsed = parse_plugin_file_name("Serum.vst3");
        assert_eq!(parsed.developer, None);
        assert_eq!(parsed.instrument_name.as_deref(), Some("Serum"));
    }

    #[test]
    fn host_inference() {
        assert_eq!(detect_host("/libs/Kontakt Library", "Kontakt Library"), Host::Kontakt);
        assert_eq!(
            detect_host("/p/Audio Unit.component", "Audio Unit.component"),
            Host::AU
        );
        assert_eq!(detect_host("/p/Unknown Plugin", "Unknown Plugin"), Host::Other);
        assert_eq!(detect_host("C:/Program Files/Common Files/VST3/x", "x"), Host::VST3);
        assert_eq!(detect_host("/p/SINE Player", "Strings"), Host::SINE);
    }

    #[test]
    fn host_inference_is_ordered() {
        // Both markers present: the earlier rule wins.
        assert_eq!(detect_host("/VST3/Kontakt", "Kontakt"), Host::Kontakt);
    }

    #[test]
    fn category_inference() {
        assert_eq!(detect_category("Orchestra Strings"), Category::Orchestral);
        assert_eq!(detect_category("Drum Machine"), Category::Drums);
        assert_eq!(detect_category("Random Instrument"), Category::Other);
        assert_eq!(detect_category("Grand PIANO"), Category::Keys);
        assert_eq!(detect_category("Epic Choir"), Category::Vocal);
        assert_eq!(detect_category("Ethnic Flutes"), Category::World);
        assert_eq!(detect_category("Valhalla Reverb"), Category::Effects);
        assert_eq!(detect_category("Analog Synth Brass"), Category::Orchestral);
    }

    #[test]
    fn scanned_folder_carries_inferred_fields() {
        let item = ScannedItem::from_folder(ListedEntry {
            name: "Spitfire Audio - Epic Choir".to_string(),
            path: PathBuf::from("/libs/Kontakt/Spitfire Audio - Epic Choir"),
            is_directory: true,
        });

        let parsed = item.parsed.unwrap();
        assert_eq!(parsed.developer.as_deref(), Some("Spitfire Audio"));
        assert_eq!(parsed.instrument_name.as_deref(), Some("Epic Choir"));
        assert_eq!(parsed.host, Some(Host::Kontakt));
        assert_eq!(parsed.category, Some(Category::Vocal));
    }
}
