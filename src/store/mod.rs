mod catalog;
mod groups;
mod instruments;
mod storage;
mod templates;

pub use catalog::Catalog;
pub use groups::{GroupPatch, InstrumentGroup, NewGroup};
pub use storage::{JsonFileStorage, Storage};
pub use templates::{NewTemplate, TemplatePairing, TemplatePatch};

#[cfg(test)]
pub use storage::MemoryStorage;

/// What a store operation changed. Operations that change nothing return
/// `None` instead, and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added(String),
    Updated(String),
    Removed(String),
    Paired(String, String),
    Unpaired(String, String),
}

impl Change {
    /// The entity the change is about; for pairings, the first side.
    pub fn id(&self) -> &str {
        match self {
            Change::Added(id) | Change::Updated(id) | Change::Removed(id) => id,
            Change::Paired(a, _) | Change::Unpaired(a, _) => a,
        }
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
