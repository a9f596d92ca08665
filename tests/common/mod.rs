//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{Map, Value};
use tower::ServiceExt;

use churn_serve::config::ServiceConfig;
use churn_serve::features::{FeatureRow, FEATURE_NAMES};
use churn_serve::model::{LogisticArtifact, LogisticModel, Predictor, ScoringError, ScoringModel};
use churn_serve::persistence::{
    PersistedPrediction, PersistenceError, PredictionEntry, PredictionLog, PredictionRecorder, PredictionStore,
};
use churn_serve::{Application, HttpServer, Shutdown};

pub const MODEL_VERSION: &str = "churn_logreg_fixture_v1";

/// One option per group for the reference customer.
pub const SAMPLE_SELECTION: [&str; 15] = [
    "male",
    "no_partner",
    "no_dependents",
    "yes_phone_service",
    "no_multiple_lines",
    "fiber_optic_internet_service",
    "no_online_security",
    "no_online_backup",
    "no_device_protection",
    "no_tech_support",
    "no_streaming_tv",
    "no_streaming_movies",
    "month_to_month_contract",
    "yes_paperless_billing",
    "electronic_check_payment_method",
];

pub fn payload(selected: &[&str], tenure: i64, monthly: f64, total: f64) -> Value {
    let mut body = Map::new();
    for name in FEATURE_NAMES {
        let flag = if selected.contains(&name) { 1 } else { 0 };
        body.insert(name.to_string(), Value::from(flag));
    }
    body.insert("tenure".into(), Value::from(tenure));
    body.insert("monthly_charges".into(), Value::from(monthly));
    body.insert("total_charges".into(), Value::from(total));
    Value::Object(body)
}

/// tenure 12, monthly 70.0, total 1000.0
pub fn sample_payload() -> Value {
    payload(&SAMPLE_SELECTION, 12, 70.0, 1000.0)
}

/// Zero weights except fiber optic (+1.0), month-to-month (+1.2) and tenure (-0.05).
pub fn fixture_artifact() -> LogisticArtifact {
    let weight = |name: &str| match name {
        "fiber_optic_internet_service" => 1.0,
        "month_to_month_contract" => 1.2,
        "tenure" => -0.05,
        _ => 0.0,
    };
    LogisticArtifact {
        name: "churn_logreg".into(),
        version: MODEL_VERSION.into(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        coefficients: FEATURE_NAMES.iter().map(|n| weight(n)).collect(),
        intercept: -0.2,
        threshold: 0.5,
    }
}

/// Probability the fixture model assigns to `sample_payload()`: sigmoid(1.4).
pub fn sample_probability() -> f64 {
    1.0 / (1.0 + (-1.4f64).exp())
}

pub fn write_artifact(dir: &Path) -> PathBuf {
    let path = dir.join("churn_model.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&serde_json::to_vec(&fixture_artifact()).unwrap()).unwrap();
    path
}

pub fn fixture_model() -> Arc<dyn ScoringModel> {
    Arc::new(LogisticModel::from(fixture_artifact()))
}

/// A model that cannot score anything.
pub struct BrokenModel;

impl ScoringModel for BrokenModel {
    fn name(&self) -> &str {
        "broken"
    }
    fn version(&self) -> &str {
        "broken-0"
    }
    fn predict(&self, row: &FeatureRow) -> Result<u8, ScoringError> {
        Err(ScoringError::ShapeMismatch {
            expected: row.len() + 1,
            actual: row.len(),
        })
    }
    fn predict_probability(&self, row: &FeatureRow) -> Result<f64, ScoringError> {
        self.predict(row).map(f64::from)
    }
}

/// A store that rejects every write.
pub struct UnavailableStore;

impl PredictionLog for UnavailableStore {
    fn ensure_schema(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
    fn append(&self, _entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError> {
        Err(PersistenceError::Unavailable("database is locked".into()))
    }
}

/// A store where every write stalls for the given time, then fails.
pub struct HungStore(pub Duration);

impl PredictionLog for HungStore {
    fn ensure_schema(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
    fn append(&self, _entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError> {
        std::thread::sleep(self.0);
        Err(PersistenceError::Unavailable("write stalled".into()))
    }
}

pub fn temporary_store() -> Arc<PredictionStore> {
    let store = PredictionStore::temporary().unwrap();
    store.ensure_schema().unwrap();
    Arc::new(store)
}

/// `store` as the recorder's backing log.
pub fn logged_to(store: &Arc<PredictionStore>) -> Option<Arc<dyn PredictionLog>> {
    let log: Arc<dyn PredictionLog> = store.clone();
    Some(log)
}

pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.store.enabled = false;
    config
}

pub fn server(model: Arc<dyn ScoringModel>, log: Option<Arc<dyn PredictionLog>>, config: ServiceConfig) -> HttpServer {
    let recorder = match log {
        Some(log) => PredictionRecorder::new(log, 1024),
        None => PredictionRecorder::disabled(),
    };
    HttpServer::new(Application::new(config, Predictor::new(model), recorder))
}

/// Serve on an ephemeral local port until `shutdown` fires.
pub async fn spawn_server(server: HttpServer, shutdown: &Shutdown) -> (SocketAddr, tokio::task::JoinHandle<std::io::Result<()>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));
    (addr, task)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse { status, headers, body }
}

pub async fn post_json(router: Router, path: &str, body: &Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(router, request).await
}

pub async fn get(router: Router, path: &str) -> TestResponse {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(router, request).await
}

/// Poll until the store holds `count` records or five seconds pass.
pub async fn wait_for_records(store: &PredictionStore, count: usize) -> bool {
    for _ in 0..500 {
        if store.len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
