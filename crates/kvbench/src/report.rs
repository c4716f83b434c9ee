//! Timing results.

use std::time::Duration;

use serde::Serialize;

use crate::backends::BackendKind;
use crate::error::Error;
use crate::harness::Scenario;

/// Timing of one completed scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub backend: BackendKind,
    pub scenario: Scenario,
    /// Measured iterations (B).
    pub iterations: u64,
    /// Wall time of the timed region in nanoseconds.
    pub elapsed_ns: u64,
    pub ns_per_op: f64,
    pub ops_per_sec: f64,
}

impl ScenarioReport {
    pub fn new(backend: BackendKind, scenario: Scenario, iterations: u64, elapsed: Duration) -> Self {
        let elapsed_ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        let ns_per_op = if iterations == 0 {
            0.0
        } else {
            elapsed_ns as f64 / iterations as f64
        };
        let ops_per_sec = if elapsed_ns == 0 {
            0.0
        } else {
            iterations as f64 * 1e9 / elapsed_ns as f64
        };

        Self {
            backend,
            scenario,
            iterations,
            elapsed_ns,
            ns_per_op,
            ops_per_sec,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns)
    }
}

/// Outcome of one (backend, scenario) pair within a suite.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub backend: BackendKind,
    pub scenario: Scenario,
    pub result: Result<ScenarioReport, Error>,
}

impl ScenarioOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a full suite run, in execution order.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn push(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    /// Reports of the runs that completed.
    pub fn successes(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Runs that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&ScenarioOutcome, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_ok())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_op_math() {
        let report = ScenarioReport::new(
            BackendKind::Redb,
            Scenario::Write,
            1_000,
            Duration::from_millis(2),
        );
        assert_eq!(report.elapsed_ns, 2_000_000);
        assert_eq!(report.ns_per_op, 2_000.0);
        assert_eq!(report.ops_per_sec, 500_000.0);
        assert_eq!(report.elapsed(), Duration::from_millis(2));
    }

    #[test]
    fn test_zero_iterations() {
        let report = ScenarioReport::new(BackendKind::Lmdb, Scenario::Read, 0, Duration::ZERO);
        assert_eq!(report.ns_per_op, 0.0);
        assert_eq!(report.ops_per_sec, 0.0);
    }

    #[test]
    fn test_serializes_names() {
        let report = ScenarioReport::new(
            BackendKind::SledMemory,
            Scenario::WriteRead,
            10,
            Duration::from_micros(5),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["backend"], "sled-memory");
        assert_eq!(json["scenario"], "write-read");
        assert_eq!(json["iterations"], 10);
    }

    #[test]
    fn test_suite_failures() {
        let mut suite = SuiteReport::default();
        suite.push(ScenarioOutcome {
            backend: BackendKind::Redb,
            scenario: Scenario::Write,
            result: Ok(ScenarioReport::new(
                BackendKind::Redb,
                Scenario::Write,
                1,
                Duration::from_nanos(10),
            )),
        });
        suite.push(ScenarioOutcome {
            backend: BackendKind::Fjall,
            scenario: Scenario::Read,
            result: Err(Error::WorkloadTooSmall {
                required: 10,
                available: 5,
            }),
        });

        assert_eq!(suite.len(), 2);
        assert!(suite.has_failures());
        assert_eq!(suite.successes().count(), 1);
        let (outcome, _) = suite.failures().next().unwrap();
        assert_eq!(outcome.backend, BackendKind::Fjall);
    }
}
