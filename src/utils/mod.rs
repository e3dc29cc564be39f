//! Utils Module
pub mod hardening;
pub mod otel;

pub use hardening::{BackendStatus, SystemHardening};
