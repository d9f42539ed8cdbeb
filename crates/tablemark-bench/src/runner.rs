//! The sequential phase state machine.

use std::io::{self, Write};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use tablemark_store::{Customer, TableStore, DEFAULT_TABLE};

use crate::error::Error;
use crate::fixtures::{random_customer, REPLACEMENT_PHONE};
use crate::stats::{LatencySample, LatencySummary};
use crate::timer::Timer;

/// The five timed operation categories, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Insert,
    Retrieve,
    Query,
    Replace,
    Delete,
}

impl Phase {
    /// All phases in execution order. No phase begins until the previous one
    /// has completed every iteration.
    pub const ALL: [Phase; 5] = [
        Phase::Insert,
        Phase::Retrieve,
        Phase::Query,
        Phase::Replace,
        Phase::Delete,
    ];

    /// Short label used in progress lines.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Insert => "Insert",
            Phase::Retrieve => "Retrieve",
            Phase::Query => "Query",
            Phase::Replace => "Replace",
            Phase::Delete => "Delete",
        }
    }

    fn banner(self) -> &'static str {
        match self {
            Phase::Insert => "Running inserts: ",
            Phase::Retrieve => "Running retrieves: ",
            Phase::Query => "Running query against secondary index: ",
            Phase::Replace => "Running replace: ",
            Phase::Delete => "Running deletes: ",
        }
    }
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Table every phase operates on.
    pub table: String,
    /// Iterations per phase.
    pub iterations: usize,
    /// RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Write per-iteration progress and phase summaries to stdout.
    pub progress: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            iterations: 100,
            seed: None,
            progress: true,
        }
    }
}

/// Percentile summary for one completed phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseReport {
    /// Which phase the sample belongs to.
    pub phase: Phase,
    /// Percentiles of the sorted latency sample.
    pub summary: LatencySummary,
}

/// Executes the five phases against a store, one latency sample per call.
///
/// Entities created by the insert phase are held in an in-memory list for the
/// whole run; the i-th entry is the subject of the i-th iteration of every
/// later phase. The list is never shrunk, even after the delete phase removes
/// the stored rows.
pub struct Runner<'a, S, T> {
    store: &'a S,
    timer: T,
    config: RunnerConfig,
    rng: StdRng,
    customers: Vec<Customer>,
}

impl<'a, S: TableStore, T: Timer> Runner<'a, S, T> {
    /// Create a runner over the given store and timer.
    pub fn new(store: &'a S, timer: T, config: RunnerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            timer,
            config,
            rng,
            customers: Vec::new(),
        }
    }

    /// Entities created so far, in insert order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Ensure the table, then run all five phases in order.
    ///
    /// Returns one report per phase. Any store error aborts the run
    /// immediately; nothing is retried.
    pub fn run(&mut self) -> Result<Vec<PhaseReport>, Error> {
        if self.config.iterations == 0 {
            return Err(Error::NoIterations);
        }

        if self.config.progress {
            println!("Creating table if it doesn't exist...");
        }
        self.store.ensure_table(&self.config.table)?;
        tracing::info!(
            table = %self.config.table,
            iterations = self.config.iterations,
            "table ensured, starting phases"
        );

        Phase::ALL
            .iter()
            .map(|&phase| self.run_phase(phase))
            .collect()
    }

    fn run_phase(&mut self, phase: Phase) -> Result<PhaseReport, Error> {
        if self.config.progress {
            println!("{}", phase.banner());
        }

        let mut sample = LatencySample::with_capacity(self.config.iterations);
        for i in 0..self.config.iterations {
            let latency = self.run_iteration(phase, i)?;
            let latency_ms = latency.as_secs_f64() * 1_000.0;

            if self.config.progress {
                // Overwrite the same line each iteration.
                print!(
                    "\r\t{} #{} completed in {:.3} ms",
                    phase.label(),
                    i + 1,
                    latency_ms
                );
                let _ = io::stdout().flush();
            }
            sample.record(latency_ms);
        }

        let summary = sample.summary()?;
        if self.config.progress {
            println!("\n\t{summary}\n");
        }
        tracing::info!(
            phase = phase.label(),
            p0 = summary.p0,
            p50 = summary.p50,
            p90 = summary.p90,
            p99 = summary.p99,
            "phase complete"
        );

        Ok(PhaseReport { phase, summary })
    }

    /// Run one iteration, timing exactly the store call.
    fn run_iteration(&mut self, phase: Phase, i: usize) -> Result<Duration, Error> {
        let store = self.store;
        let table = self.config.table.as_str();

        match phase {
            Phase::Insert => {
                // Construction happens outside the measured region.
                let customer = random_customer(&mut self.rng);
                let ((), latency) = self.timer.time(|| store.insert(table, &customer))?;
                self.customers.push(customer);
                Ok(latency)
            }
            Phase::Retrieve => {
                let key = &self.customers[i].key;
                let (_found, latency) = self.timer.time(|| store.retrieve(table, key))?;
                Ok(latency)
            }
            Phase::Query => {
                let email = &self.customers[i].email;
                let (matches, latency) = self.timer.time(|| store.query_by_email(table, email))?;

                let mut count = 0usize;
                for _ in &matches {
                    count += 1;
                }
                tracing::trace!(iteration = i, count, "query matches counted");
                Ok(latency)
            }
            Phase::Replace => {
                self.customers[i].phone_number = REPLACEMENT_PHONE.to_string();
                let customer = &self.customers[i];
                let ((), latency) = self.timer.time(|| store.replace(table, customer))?;
                Ok(latency)
            }
            Phase::Delete => {
                // Only the stored row goes away; the local list keeps the
                // entity as its logical identity.
                let key = &self.customers[i].key;
                let ((), latency) = self.timer.time(|| store.delete(table, key))?;
                Ok(latency)
            }
        }
    }
}
