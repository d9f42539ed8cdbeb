//! Timing seam for measured store calls.
//!
//! The timer must report elapsed time for exactly the closure it is given;
//! entity construction and bookkeeping stay outside the measured region.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Measures a single fallible call.
pub trait Timer {
    /// Run `f`, returning its value together with the measured duration.
    /// Errors from `f` propagate without producing a measurement.
    fn time<T, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<(T, Duration), E>;
}

/// Wall-clock timer backed by [`Instant`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WallTimer;

impl Timer for WallTimer {
    fn time<T, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<(T, Duration), E> {
        let start = Instant::now();
        let value = f()?;
        Ok((value, start.elapsed()))
    }
}

/// Timer that replays a scripted sequence of durations.
///
/// The closure still runs (the store must really be exercised); only the
/// measurement is substituted. Once the script is exhausted, zero is
/// reported. Test support for deterministic percentile assertions.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTimer {
    script: VecDeque<Duration>,
}

impl ScriptedTimer {
    /// Create a timer replaying the given durations in order.
    pub fn new(script: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Create a timer from whole-millisecond values.
    pub fn from_millis(millis: &[u64]) -> Self {
        Self::new(millis.iter().map(|&ms| Duration::from_millis(ms)))
    }

    /// Durations not yet replayed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Timer for ScriptedTimer {
    fn time<T, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<(T, Duration), E> {
        let value = f()?;
        let duration = self.script.pop_front().unwrap_or(Duration::ZERO);
        Ok((value, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_timer_measures_the_call() {
        let mut timer = WallTimer;
        let (value, duration) = timer
            .time(|| Ok::<_, std::convert::Infallible>(41 + 1))
            .unwrap();
        assert_eq!(value, 42);
        assert!(duration < Duration::from_secs(1));
    }

    #[test]
    fn test_scripted_timer_replays_in_order() {
        let mut timer = ScriptedTimer::from_millis(&[5, 2, 8]);
        let mut observed = Vec::new();
        for _ in 0..4 {
            let ((), d) = timer.time(|| Ok::<_, std::convert::Infallible>(())).unwrap();
            observed.push(d.as_millis() as u64);
        }
        // Exhausted script reports zero.
        assert_eq!(observed, vec![5, 2, 8, 0]);
    }

    #[test]
    fn test_scripted_timer_still_runs_the_closure() {
        let mut timer = ScriptedTimer::from_millis(&[1]);
        let mut called = false;
        let _ = timer.time(|| {
            called = true;
            Ok::<_, std::convert::Infallible>(())
        });
        assert!(called);
    }

    #[test]
    fn test_timer_propagates_errors() {
        let mut timer = ScriptedTimer::from_millis(&[1]);
        let result = timer.time(|| Err::<(), &str>("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        // Failed calls do not consume the script.
        assert_eq!(timer.remaining(), 1);
    }
}
