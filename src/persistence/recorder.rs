//! Best-effort, non-blocking prediction recording.
//!
//! `record` hands the entry to a dedicated writer thread through a bounded
//! queue and returns at once. The writer is the only code that touches the
//! store, so a slow or hung store fills the queue and nothing else. When the
//! queue is full the record is dropped. Every outcome ends in this module as a
//! log event and a metric; nothing flows back to the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{Dispatch, Span};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::persistence::record::PredictionEntry;
use crate::persistence::store::PredictionStore;
use crate::persistence::{PredictionLog, PERSISTENCE_TARGET};

const WRITER_THREAD: &str = "churn-persistence";

/// One queued write. `span` is the request span the entry came from.
struct WriteJob {
    entry: PredictionEntry,
    span: Span,
    done: oneshot::Sender<()>,
}

/// Writes prediction outcomes to the log without blocking the response path.
pub struct PredictionRecorder {
    queue: Option<mpsc::Sender<WriteJob>>,
}

/// Completion handle for a queued write. Awaiting it never fails.
#[must_use = "dropping the handle detaches the write, which is usually what you want; await `finished` to wait for it"]
pub struct RecordHandle(Option<oneshot::Receiver<()>>);

impl RecordHandle {
    /// Wait until the write has succeeded or failed. Returns at once for
    /// dropped records.
    pub async fn finished(self) {
        if let Some(done) = self.0 {
            let _ = done.await;
        }
    }

    /// Let the write run on its own.
    pub fn detach(self) {}
}

impl PredictionRecorder {
    /// Start a writer thread for `log` that buffers up to `capacity` records.
    ///
    /// Events from the writer go to the subscriber that is current here. If the
    /// thread cannot be spawned the recorder starts disabled.
    pub fn new(log: Arc<dyn PredictionLog>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        let spawned = thread::Builder::new()
            .name(WRITER_THREAD.to_string())
            .spawn(move || run_writer(log, rx, dispatch));

        match spawned {
            Ok(_) => Self { queue: Some(tx) },
            Err(e) => {
                tracing::error!(target: PERSISTENCE_TARGET, error = %e, "Failed to start persistence writer");
                Self::disabled()
            }
        }
    }

    /// A recorder that drops every record.
    pub fn disabled() -> Self {
        Self { queue: None }
    }

    /// Open the configured store and make sure its schema exists.
    ///
    /// Storage problems are logged and leave the recorder disabled; they never
    /// stop the service from starting.
    pub fn open(config: &StoreConfig) -> Self {
        if !config.enabled {
            tracing::info!(target: PERSISTENCE_TARGET, "Prediction log disabled by configuration");
            return Self::disabled();
        }

        let opened = PredictionStore::open(&config.path).and_then(|store| {
            store.ensure_schema()?;
            let last_id = store.last_id()?;
            Ok((store, last_id))
        });

        match opened {
            Ok((store, last_id)) => {
                tracing::info!(
                    target: PERSISTENCE_TARGET,
                    db_path = %config.path.display(),
                    last_id = last_id.unwrap_or(0),
                    queue_capacity = config.queue_capacity,
                    "db_initialized"
                );
                Self::new(Arc::new(store), config.queue_capacity)
            }
            Err(e) => {
                tracing::error!(
                    target: PERSISTENCE_TARGET,
                    db_path = %config.path.display(),
                    error = %e,
                    "db_initialization_failed"
                );
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.queue.is_some()
    }

    /// Queue one prediction for persistence under a fresh request id.
    ///
    /// Never waits: a full queue drops the record.
    pub fn record(&self, model_version: &str, probability: f64, churn_label: bool) -> RecordHandle {
        let Some(queue) = &self.queue else {
            return RecordHandle(None);
        };

        let entry = PredictionEntry::new(model_version, probability, churn_label);
        let request_id = entry.request_id;
        let (done, finished) = oneshot::channel();
        let job = WriteJob {
            entry,
            span: Span::current(),
            done,
        };

        match queue.try_send(job) {
            Ok(()) => RecordHandle(Some(finished)),
            Err(mpsc::error::TrySendError::Full(_)) => {
                persistence_failed(request_id, "write queue is full", "dropped");
                RecordHandle(None)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                persistence_failed(request_id, "persistence writer has stopped", "dropped");
                RecordHandle(None)
            }
        }
    }
}

fn run_writer(log: Arc<dyn PredictionLog>, mut queue: mpsc::Receiver<WriteJob>, dispatch: Dispatch) {
    tracing::dispatcher::with_default(&dispatch, || {
        while let Some(WriteJob { entry, span, done }) = queue.blocking_recv() {
            let _entered = span.enter();
            let request_id = entry.request_id;

            match panic::catch_unwind(AssertUnwindSafe(|| log.append(entry))) {
                Ok(Ok(record)) => {
                    tracing::info!(
                        target: PERSISTENCE_TARGET,
                        prediction_id = %record.request_id,
                        id = record.id,
                        model_version = %record.model_version,
                        "prediction_persisted"
                    );
                    metrics::record_persistence("ok");
                }
                Ok(Err(e)) => persistence_failed(request_id, &e.to_string(), "error"),
                Err(_) => persistence_failed(request_id, "store panicked during append", "panic"),
            }

            let _ = done.send(());
        }
    });
}

fn persistence_failed(request_id: Uuid, error: &str, outcome: &'static str) {
    tracing::error!(
        target: PERSISTENCE_TARGET,
        prediction_id = %request_id,
        error = %error,
        outcome,
        "prediction_persistence_failed"
    );
    metrics::record_persistence(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use crate::persistence::record::PersistedPrediction;
    use crate::persistence::PersistenceError;

    struct Unavailable;

    impl PredictionLog for Unavailable {
        fn ensure_schema(&self) -> Result<(), PersistenceError> {
            Ok(())
        }
        fn append(&self, _entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError> {
            Err(PersistenceError::Unavailable("disk full".into()))
        }
    }

    struct Slow {
        delay: Duration,
        appended: AtomicUsize,
    }

    impl PredictionLog for Slow {
        fn ensure_schema(&self) -> Result<(), PersistenceError> {
            Ok(())
        }
        fn append(&self, entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError> {
            std::thread::sleep(self.delay);
            let id = self.appended.fetch_add(1, Ordering::SeqCst) as u64 + 1;
            Ok(entry.with_id(id))
        }
    }

    struct Panicking;

    impl PredictionLog for Panicking {
        fn ensure_schema(&self) -> Result<(), PersistenceError> {
            Ok(())
        }
        fn append(&self, _entry: PredictionEntry) -> Result<PersistedPrediction, PersistenceError> {
            panic!("corrupt page");
        }
    }

    #[tokio::test]
    async fn test_record_writes_to_store() {
        let store = Arc::new(PredictionStore::temporary().unwrap());
        store.ensure_schema().unwrap();
        let recorder = PredictionRecorder::new(store.clone(), 16);

        recorder.record("churn_v1", 0.73, true).finished().await;

        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].model_version, "churn_v1");
        assert_eq!(records[0].probability, 0.73);
        assert!(records[0].churn_label);
    }

    #[tokio::test]
    async fn test_each_record_gets_its_own_request_id() {
        let store = Arc::new(PredictionStore::temporary().unwrap());
        let recorder = PredictionRecorder::new(store.clone(), 16);

        recorder.record("v", 0.2, false).finished().await;
        recorder.record("v", 0.2, false).finished().await;

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].request_id, records[1].request_id);
    }

    #[tokio::test]
    async fn test_storage_failure_is_swallowed() {
        let recorder = PredictionRecorder::new(Arc::new(Unavailable), 16);
        recorder.record("v", 0.5, false).finished().await;
        assert!(recorder.is_enabled());
    }

    #[tokio::test]
    async fn test_writer_survives_a_panicking_store() {
        let recorder = PredictionRecorder::new(Arc::new(Panicking), 16);
        recorder.record("v", 0.5, false).finished().await;
        recorder.record("v", 0.5, false).finished().await;
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_waiting() {
        let log = Arc::new(Slow {
            delay: Duration::from_millis(200),
            appended: AtomicUsize::new(0),
        });
        let recorder = PredictionRecorder::new(log.clone(), 1);

        let started = Instant::now();
        let handles: Vec<_> = (0..4).map(|_| recorder.record("v", 0.5, false)).collect();
        assert!(started.elapsed() < Duration::from_millis(100));

        for handle in handles {
            handle.finished().await;
        }
        // At most one in the writer plus one in the queue.
        assert!(log.appended.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_record_outside_a_runtime() {
        let store = Arc::new(PredictionStore::temporary().unwrap());
        let recorder = PredictionRecorder::new(store.clone(), 16);

        recorder.record("v", 0.9, true).detach();

        let deadline = Instant::now() + Duration::from_secs(5);
        while store.is_empty() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_recorder_is_a_no_op() {
        let recorder = PredictionRecorder::disabled();
        assert!(!recorder.is_enabled());
        recorder.record("v", 0.5, false).finished().await;
    }

    #[tokio::test]
    async fn test_open_with_unusable_path_disables_recording() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = StoreConfig {
            enabled: true,
            path: file.path().join("predictions.db"),
            queue_capacity: 8,
        };
        assert!(!PredictionRecorder::open(&config).is_enabled());
    }

    #[tokio::test]
    async fn test_open_creates_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            enabled: true,
            path: dir.path().join("sql").join("predictions.db"),
            queue_capacity: 8,
        };
        assert!(PredictionRecorder::open(&config).is_enabled());
    }
}
