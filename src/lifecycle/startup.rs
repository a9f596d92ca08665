//! Startup orchestration.
//!
//! # Responsibilities
//! - Verify the feature contract against the request schema
//! - Load the model artifact
//! - Open the prediction log
//!
//! # Design Decisions
//! - Fail fast: contract or model problems are fatal
//! - The prediction log is best-effort; failing to open it only disables it
//! - Listeners start last (traffic only when ready), see `main`

use std::sync::Arc;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::features::contract::{self, ContractError};
use crate::model::{load_model, ModelLoadError, Predictor, ScoringModel};
use crate::persistence::PredictionRecorder;

/// Errors that prevent the service from serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("feature contract is inconsistent: {0}")]
    Contract(#[from] ContractError),

    #[error("model could not be loaded: {0}")]
    ModelLoad(#[from] ModelLoadError),
}

/// Everything the HTTP layer needs, initialised once before serving.
pub struct Application {
    pub config: ServiceConfig,
    pub predictor: Predictor,
    pub recorder: Arc<PredictionRecorder>,
}

impl Application {
    /// Assemble from already-built parts.
    pub fn new(config: ServiceConfig, predictor: Predictor, recorder: PredictionRecorder) -> Self {
        Self {
            config,
            predictor,
            recorder: Arc::new(recorder),
        }
    }
}

/// Initialise subsystems in dependency order.
pub fn bootstrap(config: ServiceConfig) -> Result<Application, StartupError> {
    contract::verify()?;

    let model = load_model(&config.model.artifact_path)?;
    tracing::info!(
        model_name = model.name(),
        model_version = model.version(),
        artifact = %config.model.artifact_path.display(),
        "model_loaded"
    );
    let predictor = Predictor::new(Arc::new(model));

    let recorder = PredictionRecorder::open(&config.store);

    Ok(Application::new(config, predictor, recorder))
}
