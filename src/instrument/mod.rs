mod types;
mod utils;

pub use types::{
    Category, Host, Instrument, InstrumentMetadata, InstrumentPatch, NewInstrument, Position,
};
pub use utils::{category_color, rarity_tier, DEFAULT_IMPORT_COLOR};
