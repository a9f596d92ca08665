//! Projection of a validated request onto the model's column order.

use serde::Serialize;
use thiserror::Error;

use crate::features::contract::FEATURE_NAMES;
use crate::features::request::ChurnRequest;

/// A contract feature with no source on the request (schema/contract drift).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("feature '{0}' has no corresponding request field")]
    MissingFeature(String),
}

/// One model-ready row, ordered exactly as the model was trained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow(Vec<f64>);

impl FeatureRow {
    /// Wrap raw values. The caller is responsible for column order.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Map a request onto the contract's column order.
pub fn map(request: &ChurnRequest) -> Result<FeatureRow, MappingError> {
    map_columns(request, &FEATURE_NAMES)
}

/// Map a request onto an explicit column list.
pub fn map_columns(request: &ChurnRequest, columns: &[&str]) -> Result<FeatureRow, MappingError> {
    columns
        .iter()
        .map(|&name| {
            request
                .field(name)
                .ok_or_else(|| MappingError::MissingFeature(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(FeatureRow)
}
