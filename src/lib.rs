//! Churn Prediction Service Library

pub mod config;
pub mod features;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod persistence;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown};
