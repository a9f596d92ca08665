//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! startup.rs:   contract check → model artifact → prediction log → Application
//! main:         Application → HttpServer → bind → serve
//! signals.rs:   SIGINT/SIGTERM → return from wait
//! shutdown.rs:  broadcast → server stops accepting → drain within grace → exit
//! ```
//!
//! # Design Decisions
//! - Nothing listens until the model is loaded
//! - A missing or inconsistent model aborts startup; a missing store does not
//! - Draining is bounded by `timeouts.shutdown_grace_secs`

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, Application, StartupError};
