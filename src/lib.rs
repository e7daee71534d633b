//! ElectraNow home services backend.
//!
//! Serves the service catalog, per-session carts, the two-step booking
//! flow, and the AI recommendation assistant behind a JSON HTTP API.

pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use observability::{init_observability, shutdown_observability};
