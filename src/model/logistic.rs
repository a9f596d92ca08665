//! Binary logistic-regression scorer.

use serde::{Deserialize, Serialize};

use crate::features::FeatureRow;
use crate::model::{ScoringError, ScoringModel};

fn default_threshold() -> f64 {
    0.5
}

/// Serialized form of a trained logistic-regression classifier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogisticArtifact {
    /// Model family/name, e.g. `churn_logreg`.
    pub name: String,
    /// Version tag echoed back as `model_version`.
    pub version: String,
    /// Column names the coefficients were fitted against, in order.
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Probability above which the positive class is predicted.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Immutable, loaded logistic-regression model.
///
/// Holds plain data only, so concurrent scoring needs no lock.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    name: String,
    version: String,
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticModel {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        coefficients: Vec<f64>,
        intercept: f64,
        threshold: f64,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            coefficients,
            intercept,
            threshold,
        }
    }

    /// Raw decision value `intercept + w·x`.
    pub fn decision_function(&self, row: &FeatureRow) -> Result<f64, ScoringError> {
        if row.len() != self.coefficients.len() {
            return Err(ScoringError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }
        if let Some(index) = row.values().iter().position(|v| !v.is_finite()) {
            return Err(ScoringError::NonFiniteInput { index });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row.values())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

impl From<LogisticArtifact> for LogisticModel {
    fn from(artifact: LogisticArtifact) -> Self {
        Self::new(
            artifact.name,
            artifact.version,
            artifact.coefficients,
            artifact.intercept,
            artifact.threshold,
        )
    }
}

impl ScoringModel for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn predict(&self, row: &FeatureRow) -> Result<u8, ScoringError> {
        let probability = self.predict_probability(row)?;
        Ok(u8::from(probability > self.threshold))
    }

    fn predict_probability(&self, row: &FeatureRow) -> Result<f64, ScoringError> {
        let z = self.decision_function(row)?;
        Ok(sigmoid(z))
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
