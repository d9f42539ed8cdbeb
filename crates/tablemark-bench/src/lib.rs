//! Tablemark benchmark runner.
//!
//! Executes five timed phases against a [`TableStore`](tablemark_store::TableStore),
//! in order: insert, retrieve, query, replace, delete. Each phase runs N
//! iterations, records one wall-clock latency per store call, and reports a
//! p0/p50/p90/p99 summary from the sorted sample.
//!
//! # Components
//!
//! - **Fixtures**: random entity generation from one process-scoped RNG
//! - **Stats**: latency samples and percentile extraction
//! - **Timer**: the seam that scopes measurement to exactly one store call
//! - **Runner**: the sequential phase state machine
//!
//! The runner never retries: any store error aborts the whole run.

pub mod error;
pub mod fixtures;
pub mod runner;
pub mod stats;
pub mod timer;

pub use error::Error;
pub use fixtures::{random_customer, random_string, INITIAL_PHONE, REPLACEMENT_PHONE};
pub use runner::{Phase, PhaseReport, Runner, RunnerConfig};
pub use stats::{LatencySample, LatencySummary};
pub use timer::{ScriptedTimer, Timer, WallTimer};
