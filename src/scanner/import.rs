use crate::instrument::{Category, Host, NewInstrument, DEFAULT_IMPORT_COLOR};

use super::parse::ScannedItem;

/// Maps reviewed scan results onto new instruments, one per item. Items
/// without parsed fields are skipped.
pub fn import_items(items: &[ScannedItem]) -> Vec<NewInstrument> {
    items
        .iter()
        .filter_map(|item| {
            let parsed = item.parsed.as_ref()?;

            Some(NewInstrument {
                name: non_empty(&parsed.instrument_name).unwrap_or_else(|| item.name.clone()),
                developer: non_empty(&parsed.developer).unwrap_or_else(|| "Unknown".to_string()),
                host: parsed.host.unwrap_or(Host::Other),
                category: parsed.category.unwrap_or(Category::Other),
                tags: Vec::new(),
                notes: format!("Imported from: {}", item.path.display()),
                color: Some(DEFAULT_IMPORT_COLOR.to_string()),
            })
        })
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
