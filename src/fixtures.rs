use crate::instrument::{Category, Host, Instrument, InstrumentMetadata, NewInstrument, Position};
use chrono::{DateTime, Utc};

pub fn instrument(id: &str, name: &str) -> Instrument {
    Instrument {
        id: id.to_string(),
        name: name.to_string(),
        developer: "Dev".to_string(),
        host: Host::VST3,
        category: Category::Other,
        tags: Vec::new(),
        notes: String::new(),
        position: Position::default(),
        pairings: Vec::new(),
        color: "#6b7280".to_string(),
        metadata: InstrumentMetadata {
            created_at: Utc::now(),
            last_used: None,
            usage_count: 0,
        },
    }
}

pub fn used(mut instrument: Instrument, count: u32, last_used: DateTime<Utc>) -> Instrument {
    instrument.metadata.usage_count = count;
    instrument.metadata.last_used = Some(last_used);
    instrument
}

pub fn new_instrument(name: &str, category: Category) -> NewInstrument {
    NewInstrument {
        name: name.to_string(),
        developer: "Dev".to_string(),
        host: Host::VST3,
        category,
        tags: Vec::new(),
        notes: String::new(),
        color: None,
    }
}
