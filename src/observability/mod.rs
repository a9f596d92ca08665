//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, recorder, startup
//!     → logging.rs (tracing events; JSON lines or pretty)
//!     → metrics.rs (request/prediction/persistence counters, latency histogram)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape on `observability.metrics_address`
//! ```
//!
//! # Design Decisions
//! - Event names (`request_received`, `prediction_completed`, ...) are the
//!   message, context goes in fields
//! - Persistence events share one target so they can be filtered as a unit
//! - The exporter is opt-in; without it the metric macros are no-ops

pub mod logging;
pub mod metrics;
