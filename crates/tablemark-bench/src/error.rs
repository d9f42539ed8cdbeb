//! Benchmark runner errors.

use thiserror::Error;

/// Errors surfaced by a benchmark run.
///
/// There is no retry path: every variant terminates the run (fail fast, per
/// the tool's purpose of measuring happy-path latency).
#[derive(Debug, Error)]
pub enum Error {
    /// A store call failed.
    #[error("store error: {0}")]
    Store(#[from] tablemark_store::Error),

    /// Percentiles were requested from an empty sample.
    #[error("latency sample is empty")]
    EmptySample,

    /// The run was configured with zero iterations.
    #[error("iteration count must be at least 1")]
    NoIterations,
}
