//! Latency samples and percentile extraction.

use std::fmt;

use crate::error::Error;

/// Per-call latencies collected during one phase, in milliseconds.
///
/// Samples arrive in call order and are sorted ascending only when a summary
/// is taken.
#[derive(Debug, Default, Clone)]
pub struct LatencySample {
    samples: Vec<f64>,
}

impl LatencySample {
    /// Create an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sample sized for `n` recordings.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            samples: Vec::with_capacity(n),
        }
    }

    /// Record one call latency in milliseconds.
    pub fn record(&mut self, latency_ms: f64) {
        self.samples.push(latency_ms);
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no calls have been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sort the sample and extract the percentile summary.
    pub fn summary(&self) -> Result<LatencySummary, Error> {
        if self.samples.is_empty() {
            return Err(Error::EmptySample);
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(f64::total_cmp);

        Ok(LatencySummary {
            p0: sorted[0],
            p50: sorted[percentile_index(sorted.len(), 0.50)],
            p90: sorted[percentile_index(sorted.len(), 0.90)],
            p99: sorted[percentile_index(sorted.len(), 0.99)],
        })
    }
}

/// Index of the value reported for a percentile fraction: `floor(len * fraction)`,
/// clamped to the last element.
///
/// The unclamped floor lands one past the end whenever `len * fraction`
/// reaches `len` exactly.
fn percentile_index(len: usize, fraction: f64) -> usize {
    ((len as f64 * fraction) as usize).min(len - 1)
}

/// The five statistics reported after each phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    /// Minimum observed latency.
    pub p0: f64,
    /// Value at sorted index `floor(N * 0.50)`.
    pub p50: f64,
    /// Value at sorted index `floor(N * 0.90)`.
    pub p90: f64,
    /// Value at sorted index `floor(N * 0.99)`, clamped to the sample.
    pub p99: f64,
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p0: {:.3} ms, p50: {:.3} ms, p90: {:.3} ms, p99: {:.3} ms",
            self.p0, self.p50, self.p90, self.p99
        )
    }
}
