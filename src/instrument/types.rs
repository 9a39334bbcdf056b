use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Host {
    Kontakt,
    Standalone,
    VST3,
    AU,
    Soundbox,
    SINE,
    Opus,
    Other,
}

impl Host {
    pub const ALL: [Host; 8] = [
        Host::Kontakt,
        Host::Standalone,
        Host::VST3,
        Host::AU,
        Host::Soundbox,
        Host::SINE,
        Host::Opus,
        Host::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Host::Kontakt => "Kontakt",
            Host::Standalone => "Standalone",
            Host::VST3 => "VST3",
            Host::AU => "AU",
            Host::Soundbox => "Soundbox",
            Host::SINE => "SINE",
            Host::Opus => "Opus",
            Host::Other => "Other",
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Orchestral,
    Synth,
    Drums,
    Effects,
    Keys,
    World,
    Vocal,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Orchestral,
        Category::Synth,
        Category::Drums,
        Category::Effects,
        Category::Keys,
        Category::World,
        Category::Vocal,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Orchestral => "Orchestral",
            Category::Synth => "Synth",
            Category::Drums => "Drums",
            Category::Effects => "Effects",
            Category::Keys => "Keys",
            Category::World => "World",
            Category::Vocal => "Vocal",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentMetadata {
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub usage_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub name: String,
    pub developer: String,
    pub host: Host,
    pub category: Category,
    pub tags: Vec<String>,
    pub notes: String,
    pub position: Position,
    /// Partner ids. Never holds duplicates or the instrument's own id, and
    /// every partner lists this instrument back.
    pub pairings: Vec<String>,
    pub color: String,
    pub metadata: InstrumentMetadata,
}

impl Instrument {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_paired_with(&self, id: &str) -> bool {
        self.pairings.iter().any(|p| p == id)
    }
}

/// Caller-supplied fields for a new instrument. The store assigns the id,
/// position, pairings and metadata. A missing color is derived from the
/// category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInstrument {
    pub name: String,
    pub developer: String,
    pub host: Host,
    pub category: Category,
    pub tags: Vec<String>,
    pub notes: String,
    pub color: Option<String>,
}

/// Partial update for an instrument. Identity, pairings and usage metadata
/// are deliberately absent: they change only through their own operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentPatch {
    pub name: Option<String>,
    pub developer: Option<String>,
    pub host: Option<Host>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub position: Option<Position>,
    pub color: Option<String>,
}

impl InstrumentPatch {
    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, instrument: &mut Instrument) {
        if let Some(name) = self.name {
            instrument.name = name;
        }
        if let Some(developer) = self.developer {
            instrument.developer = developer;
        }
        if let Some(host) = self.host {
            instrument.host = host;
        }
        if let Some(category) = self.category {
            instrument.category = category;
        }
        if let Some(tags) = self.tags {
            instrument.tags = tags;
        }
        if let Some(notes) = self.notes {
            instrument.notes = notes;
        }
        if let Some(position) = self.position {
            instrument.position = position;
        }
        if let Some(color) = self.color {
            instrument.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instrument {
        Instrument {
            id: "a".to_string(),
            name: "Pigments".to_string(),
            developer: "Arturia".to_string(),
            host: Host::VST3,
            category: Category::Synth,
            tags: vec!["Pads".to_string()],
            notes: String::new(),
            position: Position::new(10.0, 20.0),
            pairings: vec![],
            color: "#8b5cf6".to_string(),
            metadata: InstrumentMetadata {
                created_at: Utc::now(),
                last_used: None,
                usage_count: 0,
            },
        }
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut instrument = sample();
        InstrumentPatch {
            name: Some("Pigments 5".to_string()),
            position: Some(Position::new(1.0, 2.0)),
            ..Default::default()
        }
        .apply(&mut instrument);

        assert_eq!(instrument.name, "Pigments 5");
        assert_eq!(instrument.position, Position::new(1.0, 2.0));
        assert_eq!(instrument.developer, "Arturia");
        assert_eq!(instrument.tags, vec!["Pads".to_string()]);
        assert_eq!(instrument.id, "a");
    }

    #[test]
    fn serializes_with_camel_case_and_dates() {
        let mut instrument = sample();
        instrument.metadata.last_used = Some(Utc::now());
        let json = serde_json::to_value(&instrument).unwrap();

        assert!(json["metadata"]["createdAt"].is_string());
        assert!(json["metadata"]["usageCount"].is_number());
        assert_eq!(json["host"], "VST3");

        let back: Instrument = serde_json::from_value(json).unwrap();
        assert_eq!(back, instrument);
    }

    #[test]
    fn missing_last_used_is_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json["metadata"].get("lastUsed").is_none());
    }
}
