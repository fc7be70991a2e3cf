//! Fundamentals synthesis.
//!
//! Builds the tagged fundamentals record for a snapshot, preferring
//! authoritative provider data and degrading to explicit unknowns. The
//! synthesizer never fails a request: a failed lookup always lands on
//! defaults, logged but not surfaced.

mod synthesizer;

pub use synthesizer::synthesize;
