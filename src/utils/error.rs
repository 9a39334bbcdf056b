use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not scan {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no plugins found in the default plugin directories")]
    NothingFound,

    #[error("could not access stored data for '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored data for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode '{key}' for storage: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
