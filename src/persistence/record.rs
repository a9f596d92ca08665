//! Prediction log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prediction outcome waiting for an id.
///
/// Carries derived outputs only; the request payload is never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionEntry {
    pub request_id: Uuid,
    pub model_version: String,
    pub probability: f64,
    pub churn_label: bool,
    pub created_at: DateTime<Utc>,
}

impl PredictionEntry {
    /// New entry with a fresh request id, stamped now.
    pub fn new(model_version: impl Into<String>, probability: f64, churn_label: bool) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            model_version: model_version.into(),
            probability,
            churn_label,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn with_id(self, id: u64) -> PersistedPrediction {
        PersistedPrediction {
            id,
            request_id: self.request_id,
            model_version: self.model_version,
            probability: self.probability,
            churn_label: self.churn_label,
            created_at: self.created_at,
        }
    }
}

/// One row of the append-only prediction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPrediction {
    pub id: u64,
    pub request_id: Uuid,
    pub model_version: String,
    pub probability: f64,
    pub churn_label: bool,
    pub created_at: DateTime<Utc>,
}
