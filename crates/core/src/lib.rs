//! Marketdeck Core
//!
//! The multi-source aggregation engine behind the dashboard endpoint: it
//! fans out to the configured provider adapters per request, tolerates
//! partial failure, reconciles news, synthesizes fundamentals, and hands
//! back one [`AssetSnapshot`] per symbol.
//!
//! # Overview
//!
//! - [`assets`] classifies a symbol into stock/crypto/ETF/index
//! - [`snapshot`] coordinates the per-request fan-out and assembles the
//!   response
//! - [`news`] deduplicates, scores, and ranks the merged article lists
//! - [`sentiment`] rolls per-article sentiment into one distribution
//! - [`fundamentals`] builds the tagged fundamentals record
//! - [`earnings`] runs the ordered first-successful-wins provider chain
//!
//! The transport layer (HTTP routing, CORS, client rate limiting) is an
//! external collaborator: it validates nothing but the wire format, calls
//! [`SnapshotService::snapshot`], and renders the result.
//!
//! # Failure model
//!
//! Only two things fail a request: an empty symbol and a primary-quote
//! failure. Every other upstream outcome degrades in place (absent
//! articles, estimated earnings, unknown fundamentals), and every degraded
//! value carries a source marker so consumers can tell real data from
//! placeholder data.

pub mod assets;
pub mod earnings;
pub mod errors;
pub mod fundamentals;
pub mod news;
pub mod sentiment;
pub mod settings;
pub mod snapshot;

pub use assets::detect_asset_kind;
pub use earnings::EarningsChain;
pub use errors::{Error, Result};
pub use sentiment::SentimentSummary;
pub use settings::Settings;
pub use snapshot::{AssetSnapshot, SnapshotOptions, SnapshotService};
