//! Shared, read-only scoring handle.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::features::FeatureRow;
use crate::model::{ScoringError, ScoringModel};

/// Outcome of scoring one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub churn_label: bool,
    pub probability: f64,
    pub model_version: String,
}

/// Wraps the model loaded at startup.
///
/// Constructed once before the listener binds and shared by `Arc`; the model
/// is never replaced or mutated afterwards.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn ScoringModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn ScoringModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn model_version(&self) -> &str {
        self.model.version()
    }

    /// Score one row: label from `predict`, probability from `predict_probability`.
    pub fn score(&self, row: &FeatureRow) -> Result<PredictionResult, ScoringError> {
        let label = self.model.predict(row)?;
        let probability = self.model.predict_probability(row)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::InvalidProbability(probability));
        }
        let churn_label = match label {
            0 => false,
            1 => true,
            other => return Err(ScoringError::InvalidLabel(other)),
        };

        Ok(PredictionResult {
            churn_label,
            probability,
            model_version: self.model.version().to_string(),
        })
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model_name", &self.model.name())
            .field("model_version", &self.model.version())
            .finish()
    }
}
