//! Local text statistics.
//!
//! Scoring itself happens in the AI service; this module only computes the
//! counts and summaries that never leave the machine.

pub mod stats;

pub use stats::*;
