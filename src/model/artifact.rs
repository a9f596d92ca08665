//! Loading a versioned model artifact from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::features::FEATURE_NAMES;
use crate::model::logistic::{LogisticArtifact, LogisticModel};

/// Errors that keep the service from starting.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact has {coefficients} coefficients for {features} features")]
    LengthMismatch { coefficients: usize, features: usize },

    #[error("artifact column {index} is '{found}', contract expects '{expected}'")]
    FeatureMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("artifact declares {found} features, contract has {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("artifact parameter '{0}' is not finite")]
    NonFinite(String),

    #[error("threshold {0} must lie strictly between 0 and 1")]
    Threshold(f64),

    #[error("artifact version tag is empty")]
    MissingVersion,
}

/// Read, parse and check an artifact against the feature contract.
pub fn load_model(path: &Path) -> Result<LogisticModel, ModelLoadError> {
    let content = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: LogisticArtifact =
        serde_json::from_str(&content).map_err(|source| ModelLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    check_artifact(&artifact)?;
    Ok(LogisticModel::from(artifact))
}

/// Semantic checks on a parsed artifact.
pub fn check_artifact(artifact: &LogisticArtifact) -> Result<(), ModelLoadError> {
    if artifact.version.trim().is_empty() {
        return Err(ModelLoadError::MissingVersion);
    }

    if artifact.coefficients.len() != artifact.feature_names.len() {
        return Err(ModelLoadError::LengthMismatch {
            coefficients: artifact.coefficients.len(),
            features: artifact.feature_names.len(),
        });
    }

    if artifact.feature_names.len() != FEATURE_NAMES.len() {
        return Err(ModelLoadError::FeatureCount {
            expected: FEATURE_NAMES.len(),
            found: artifact.feature_names.len(),
        });
    }

    for (index, (found, expected)) in artifact.feature_names.iter().zip(FEATURE_NAMES).enumerate() {
        if found != expected {
            return Err(ModelLoadError::FeatureMismatch {
                index,
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
    }

    if let Some(i) = artifact.coefficients.iter().position(|w| !w.is_finite()) {
        return Err(ModelLoadError::NonFinite(format!("coefficients[{}]", i)));
    }
    if !artifact.intercept.is_finite() {
        return Err(ModelLoadError::NonFinite("intercept".to_string()));
    }

    if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
        return Err(ModelLoadError::Threshold(artifact.threshold));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoringModel;
    use std::io::Write;

    fn artifact() -> LogisticArtifact {
        LogisticArtifact {
            name: "churn_logreg".into(),
            version: "churn_logreg_v1".into(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![0.01; FEATURE_NAMES.len()],
            intercept: -0.3,
            threshold: 0.5,
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&artifact()).unwrap().as_bytes())
            .unwrap();

        let model = load_model(file.path()).unwrap();
        assert_eq!(model.version(), "churn_logreg_v1");
        assert_eq!(model.name(), "churn_logreg");
    }

    #[test]
    fn test_missing_file() {
        let err = load_model(Path::new("/nonexistent/churn_model.json")).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }

    #[test]
    fn test_garbage_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95joblib").unwrap();
        assert!(load_model(file.path()).is_err());
    }

    #[test]
    fn test_reordered_columns_are_rejected() {
        let mut a = artifact();
        a.feature_names.swap(4, 5);
        match check_artifact(&a) {
            Err(ModelLoadError::FeatureMismatch { index, expected, found }) => {
                assert_eq!(index, 4);
                assert_eq!(expected, "female");
                assert_eq!(found, "male");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_coefficient_count_must_match() {
        let mut a = artifact();
        a.coefficients.pop();
        assert!(matches!(check_artifact(&a), Err(ModelLoadError::LengthMismatch { .. })));
    }

    #[test]
    fn test_extra_feature_is_rejected() {
        let mut a = artifact();
        a.feature_names.push("customer_id".into());
        a.coefficients.push(0.0);
        assert!(matches!(check_artifact(&a), Err(ModelLoadError::FeatureCount { .. })));
    }

    #[test]
    fn test_bad_parameters() {
        let mut a = artifact();
        a.intercept = f64::INFINITY;
        assert!(matches!(check_artifact(&a), Err(ModelLoadError::NonFinite(_))));

        let mut a = artifact();
        a.threshold = 1.0;
        assert!(matches!(check_artifact(&a), Err(ModelLoadError::Threshold(_))));

        let mut a = artifact();
        a.version = "  ".into();
        assert!(matches!(check_artifact(&a), Err(ModelLoadError::MissingVersion)));
    }
}
