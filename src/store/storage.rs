use crate::utils::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

use super::Change;

/// Key-value blob storage, one key per logical store.
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
}

/// A store whose whole state is persisted under one key.
pub trait Collection: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
}

pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CatalogError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let storage_err = |source| CatalogError::Storage {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(storage_err)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, blob).map_err(storage_err)?;
        std::fs::rename(&tmp, &path).map_err(storage_err)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    blobs: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blob(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Loads whole collections and writes them back after a change.
pub struct Repository<S> {
    storage: S,
}

impl<S: Storage> Repository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load<C: Collection>(&self) -> Result<C> {
        match self.storage.load(C::KEY)? {
            Some(blob) => serde_json::from_str(&blob).map_err(|source| CatalogError::Corrupt {
                key: C::KEY.to_string(),
                source,
            }),
            None => Ok(C::default()),
        }
    }

    /// Persists `collection` when `change` is present.
    pub fn commit<C: Collection>(&self, collection: &C, change: &Option<Change>) -> Result<()> {
        let Some(change) = change else {
            return Ok(());
        };

        let blob = serde_json::to_string(collection).map_err(|source| CatalogError::Encode {
            key: C::KEY.to_string(),
            source,
        })?;
        self.storage.save(C::KEY, &blob)?;

        log::debug!("Committed {} after {:?}", C::KEY, change);
        Ok(())
    }
}
