//! Snapshot assembly.
//!
//! The fan-out coordinator and the single outbound response shape.

pub mod model;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use model::{AssetSnapshot, SnapshotOptions};
pub use service::SnapshotService;
