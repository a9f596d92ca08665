//! Embedded append-only prediction log backed by sled.
//!
//! Layout:
//! - tree `predictions`: big-endian `u64` id → JSON `PersistedPrediction`
//! - tree `meta`: `schema_version` → `SCHEMA_VERSION`

use std::path::Path;

use crate::persistence::record::{PersistedPrediction, PredictionEntry};
use crate::persistence::{PersistenceError, PredictionLog};

const PREDICTIONS_TREE: &str = "predictions";
const META_TREE: &str = "meta";
const SCHEMA_KEY: &[u8] = b"schema_version";

/// Current record layout version.
pub const SCHEMA_VERSION: &str = "1";

pub struct PredictionStore {
    db: sled::Db,
    predictions: sled::Tree,
    meta: sled::Tree,
}

impl PredictionStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        }
        Self::from_db(sled::open(path)?)
    }

    /// In-memory store removed on drop.
    pub fn temporary() -> Result<Self, PersistenceError> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self, PersistenceError> {
        let predictions = db.open_tree(PREDICTIONS_TREE)?;
        let meta = db.open_tree(META_TREE)?;
        Ok(Self {
            db,
            predictions,
            meta,
        })
    }

    /// Number of stored predictions.
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Highest assigned id, read from the end of the tree.
    pub fn last_id(&self) -> Result<Option<u64>, PersistenceError> {
        Ok(self
            .predictions
            .last()?
            .and_then(|(key, _)| <[u8; 8]>::try_from(key.as_ref()).ok())
            .map(u64::from_be_bytes))
    }

    pub fn get(&self, id: u64) -> Result<Option<PersistedPrediction>, PersistenceError> {
        match self.predictions.get(id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All records in insertion order.
    pub fn records(&self) -> Result<Vec<PersistedPrediction>, PersistenceError> {
        self.predictions
            .iter()
            .values()
            .map(|value| -> Result<PersistedPrediction, PersistenceError> {
                Ok(serde_json::from_slice(&value?)?)
            })
            .collect()
    }
}

impl PredictionLog for PredictionStore {
    fn ensure_schema(&self) -> Result<(), PersistenceError> {
        match self.meta.get(SCHEMA_KEY)? {
            None => {
                self.meta.insert(SCHEMA_KEY, SCHEMA_VERSION.as_bytes())?;
                self.meta.flush()?;
                Ok(())
            }
            Some(found) if found.as_ref() == SCHEMA_VERSION.as_bytes() => Ok(()),
            Some(found) => Err(PersistenceError::SchemaMismatch {
                found: String::from_utf8_lossy(&found).into_owned(),
                expected: SCHEMA_VERSION,
            }),
        }
    }

    fn append(&self, entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError> {
        // generate_id is monotonic across restarts and starts at 0
        let id = self.db.generate_id()? + 1;
        let record = entry.with_id(id);
        let value = serde_json::to_vec(&record)?;

        self.predictions
            .compare_and_swap(id.to_be_bytes(), None as Option<&[u8]>, Some(value))?
            .map_err(|_| PersistenceError::DuplicateId(id))?;
        self.predictions.flush()?;

        Ok(record)
    }
}
