//! Model subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     artifact path (config)
//!     → artifact.rs (read, parse, check against feature contract)
//!     → logistic.rs (LogisticModel)
//!     → predictor.rs (Predictor, shared via Arc)
//!
//! Per request:
//!     FeatureRow → Predictor::score → PredictionResult
//! ```
//!
//! # Design Decisions
//! - Load failure is fatal; the service never starts without a model
//! - Models are immutable after load and must be `Send + Sync`
//! - Scoring errors are per-request and never retried

pub mod artifact;
pub mod logistic;
pub mod predictor;

use thiserror::Error;

use crate::features::FeatureRow;

pub use artifact::{load_model, ModelLoadError};
pub use logistic::{LogisticArtifact, LogisticModel};
pub use predictor::{PredictionResult, Predictor};

/// A failure while scoring a single row.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("row has {actual} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("column {index} is not a finite number")]
    NonFiniteInput { index: usize },

    #[error("model produced probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    #[error("model produced label {0}, expected 0 or 1")]
    InvalidLabel(u8),

    #[error("scoring task failed: {0}")]
    Runtime(String),
}

/// A loaded classifier that scores one row at a time.
///
/// Implementations are shared across request handlers without locking, so
/// scoring must not mutate internal state.
pub trait ScoringModel: Send + Sync {
    /// Human-readable model name.
    fn name(&self) -> &str;

    /// Version tag reported with every prediction.
    fn version(&self) -> &str;

    /// Class label (0 or 1) for a single-row batch.
    fn predict(&self, row: &FeatureRow) -> Result<u8, ScoringError>;

    /// Positive-class probability for a single-row batch.
    fn predict_probability(&self, row: &FeatureRow) -> Result<f64, ScoringError>;
}
