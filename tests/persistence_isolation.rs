//! A failing or stalled prediction store is visible in the logs and nowhere else.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};

use churn_serve::persistence::{PredictionLog, PERSISTENCE_TARGET};
use common::*;

fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}

async fn wait_for_event(logs: &LogBuffer, event: &str) -> Option<String> {
    for _ in 0..200 {
        if let Some(line) = logs.contents().lines().find(|line| line.contains(event)) {
            return Some(line.to_string());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test]
async fn test_store_failure_is_logged_but_response_succeeds() {
    let (logs, _guard) = capture_logs();

    let log: Arc<dyn PredictionLog> = Arc::new(UnavailableStore);
    let server = server(fixture_model(), Some(log), test_config());

    let res = post_json(server.router(), "/predict", &sample_payload()).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["model_version"], MODEL_VERSION);

    let event = wait_for_event(&logs, "prediction_persistence_failed")
        .await
        .unwrap_or_else(|| panic!("no persistence failure event in:\n{}", logs.contents()));
    assert!(event.contains(PERSISTENCE_TARGET));
    assert!(event.contains("database is locked"));
    assert!(logs.contents().contains("prediction_completed"));
}

#[tokio::test]
async fn test_persisted_event_carries_http_request_id() {
    let (logs, _guard) = capture_logs();

    let store = temporary_store();
    let server = server(fixture_model(), logged_to(&store), test_config());

    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .header("x-request-id", "req-7f3a-persist")
        .body(Body::from(serde_json::to_vec(&sample_payload()).unwrap()))
        .unwrap();
    let res = send(server.router(), request).await;
    assert_eq!(res.status, StatusCode::OK);

    let event = wait_for_event(&logs, "prediction_persisted")
        .await
        .unwrap_or_else(|| panic!("no persisted event in:\n{}", logs.contents()));
    assert!(event.contains("req-7f3a-persist"), "request id missing from: {}", event);

    let records = store.records().unwrap();
    assert_eq!(records.len(), 1);
    assert!(event.contains(&records[0].request_id.to_string()));
}

#[test]
fn test_stalled_store_does_not_delay_scoring() {
    // One blocking thread: scoring would queue behind any write sharing the pool.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .max_blocking_threads(1)
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let log: Arc<dyn PredictionLog> = Arc::new(HungStore(Duration::from_secs(3)));
        let server = server(fixture_model(), Some(log), test_config());

        for _ in 0..8 {
            let started = Instant::now();
            let res = post_json(server.router(), "/predict", &sample_payload()).await;
            let latency = started.elapsed();

            assert_eq!(res.status, StatusCode::OK);
            assert!(latency < Duration::from_millis(500), "prediction took {:?}", latency);
        }
    });
}
