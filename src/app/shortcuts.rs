use eframe::egui::{Event, Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    FocusSearch,
    NewInstrument,
    ClearSearch,
}

pub fn key_shortcut(key: Key, modifiers: Modifiers, search_focused: bool) -> Option<Shortcut> {
    match key {
        Key::K if modifiers.command => Some(Shortcut::FocusSearch),
        Key::N if modifiers.command => Some(Shortcut::NewInstrument),
        Key::Escape if search_focused => Some(Shortcut::ClearSearch),
        _ => None,
    }
}

/// `/` jumps to the search box unless some text field already has focus.
pub fn text_shortcut(text: &str, typing: bool) -> Option<Shortcut> {
    (text == "/" && !typing).then_some(Shortcut::FocusSearch)
}

pub fn shortcuts(events: &[Event], search_focused: bool, typing: bool) -> Vec<Shortcut> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => key_shortcut(*key, *modifiers, search_focused),
            Event::Text(text) => text_shortcut(text, typing),
            _ => None,
        })
        .collect()
}
