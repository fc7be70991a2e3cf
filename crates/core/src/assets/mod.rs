//! Asset classification.
//!
//! Classification gates which provider set and which fundamentals variant a
//! request uses downstream.

mod classifier;

pub use classifier::detect_asset_kind;
