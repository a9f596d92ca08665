//! Prediction persistence subsystem.
//!
//! # Data Flow
//! ```text
//! PredictionResult (after the response is decided)
//!     → recorder.rs (fresh request_id, try_send to the writer thread, drop when full)
//!     → store.rs (sled tree, append-only)
//!
//! Failures:
//!     → log target `churn_serve::persistence` + `churn_persistence_writes_total`
//!     → never returned to the request handler
//! ```
//!
//! # Design Decisions
//! - Only derived outputs are stored; request_id gives traceability
//! - Schema setup is idempotent and runs on every start
//! - No update or delete path exists

pub mod record;
pub mod recorder;
pub mod store;

use thiserror::Error;

pub use record::{PersistedPrediction, PredictionEntry};
pub use recorder::{PredictionRecorder, RecordHandle};
pub use store::PredictionStore;

/// Log target for every persistence event.
pub const PERSISTENCE_TARGET: &str = "churn_serve::persistence";

/// Storage faults. Only ever logged.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("record encoding error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store schema version {found}, expected {expected}")]
    SchemaMismatch { found: String, expected: &'static str },

    #[error("record id {0} already exists")]
    DuplicateId(u64),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only sink for prediction outcomes.
pub trait PredictionLog: Send + Sync {
    /// Create the backing structures if missing. Safe to call repeatedly.
    fn ensure_schema(&self) -> Result<(), PersistenceError>;

    /// Store one entry and return it with its assigned id.
    fn append(&self, entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError>;
}
