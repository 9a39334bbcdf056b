mod forms;
mod gui;
mod scan;
mod selection;
mod shortcuts;
mod state;

pub use state::CatalogApp;
