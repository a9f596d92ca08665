//! Feature subsystem.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → request.rs (ChurnRequest, unknown/missing fields rejected)
//!     → validator.rs (one-hot exclusivity, binary flags)
//!     → mapper.rs (FeatureRow in trained column order)
//!     → model::Predictor
//! ```
//!
//! # Design Decisions
//! - contract.rs is the single source of truth for column order and groups
//! - Fields are resolved through a static accessor table, verified at startup
//! - Validation and mapping are pure; no I/O, no logging

pub mod contract;
pub mod mapper;
pub mod request;
pub mod validator;

pub use contract::{OneHotGroup, FEATURE_COUNT, FEATURE_NAMES, ONE_HOT_GROUPS};
pub use mapper::{map, FeatureRow, MappingError};
pub use request::ChurnRequest;
pub use validator::{validate, validate_with, ValidationError, ValidationMode};
