//! Benchmark runner.
//!
//! Each (backend, scenario) run goes through the same steps:
//!
//! 1. **Setup**: open a fresh backend at a scenario-unique location.
//! 2. **Prepopulate** (`read` and `write-read`): write the first
//!    `population` workload entries.
//! 3. **Timed region**: `iterations` operations, timed from just before
//!    the first to just after the last.
//! 4. **Teardown**: close the backend and remove its artifacts, on every
//!    exit path.
//!
//! Runs are strictly sequential. A failing run stops immediately and
//! reports its error; the suite moves on to the next pair.

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::backends::{BackendKind, KvBackend, StorageLocation};
use crate::config::BenchConfig;
use crate::error::{EngineError, Error, Result};
use crate::fixtures::{AccessIndices, Workload};
use crate::report::{ScenarioOutcome, ScenarioReport, SuiteReport};

/// Measured operation mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Puts cycling through the workload.
    Write,
    /// Gets at precomputed access indices over a pre-populated store.
    Read,
    /// A put immediately followed by a get of the same key.
    WriteRead,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Write, Scenario::Read, Scenario::WriteRead];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Write => "write",
            Scenario::Read => "read",
            Scenario::WriteRead => "write-read",
        }
    }

    /// Whether the store is pre-populated before the timed region.
    pub fn prepopulates(&self) -> bool {
        matches!(self, Scenario::Read | Scenario::WriteRead)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scenario '{}' (known: write, read, write-read)", s))
    }
}

/// An open backend bound to its storage location.
///
/// Teardown runs exactly once: explicitly through [`Session::teardown`],
/// or from `Drop` if the session is abandoned by a panic.
struct Session {
    kind: BackendKind,
    location: StorageLocation,
    backend: Option<Box<dyn KvBackend>>,
    released: bool,
}

impl Session {
    fn setup(kind: BackendKind, location: StorageLocation, config: &BenchConfig) -> Result<Self> {
        let name = kind.name();

        if location.exists() {
            warn!(backend = name, location = %location, "removing stale artifact");
            remove_artifact(name, &location)?;
        }

        if let Some(parent) = location.path().and_then(|p| p.parent()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OpenFailure {
                backend: name,
                location: location.to_string(),
                source: EngineError::Io(e),
            })?;
        }

        let backend = match kind.open(&location, config) {
            Ok(backend) => backend,
            Err(source) => {
                if let Err(e) = location.remove() {
                    warn!(backend = name, error = %e, "cleanup after failed open");
                }
                return Err(Error::OpenFailure {
                    backend: name,
                    location: location.to_string(),
                    source,
                });
            }
        };

        debug!(backend = name, location = %location, "backend opened");
        Ok(Self {
            kind,
            location,
            backend: Some(backend),
            released: false,
        })
    }

    fn backend(&self) -> &dyn KvBackend {
        match &self.backend {
            Some(backend) => backend.as_ref(),
            None => unreachable!("session used after teardown"),
        }
    }

    fn teardown(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        self.released = true;
        let name = self.kind.name();

        let closed = match self.backend.take() {
            Some(backend) => backend.close().map_err(|source| Error::CloseFailure {
                backend: name,
                source,
            }),
            None => Ok(()),
        };
        let removed = remove_artifact(name, &self.location);

        debug!(backend = name, location = %self.location, "backend torn down");
        closed.and(removed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.release() {
                error!(backend = self.kind.name(), error = %e, "teardown failed");
            }
        }
    }
}

fn remove_artifact(backend: &'static str, location: &StorageLocation) -> Result<()> {
    location.remove().map_err(|source| Error::CleanupFailure {
        backend,
        path: location.path().map(|p| p.to_path_buf()).unwrap_or_default(),
        source,
    })
}

/// Write workload entries `0..population`. Returns the number written.
pub fn prepopulate(
    backend: &dyn KvBackend,
    name: &'static str,
    workload: &Workload,
    population: usize,
) -> Result<usize> {
    if workload.len() < population {
        return Err(Error::WorkloadTooSmall {
            required: population,
            available: workload.len(),
        });
    }

    for i in 0..population {
        let (key, value) = (workload.key(i), workload.value(i));
        backend
            .put(key, value)
            .map_err(|e| Error::write(name, i, key, value, e))?;
    }
    Ok(population)
}

/// Run `iterations` operations of `scenario` and return their wall time.
///
/// Only the operations themselves are timed; the store must already be
/// prepared for the scenario.
pub fn timed_region(
    backend: &dyn KvBackend,
    name: &'static str,
    scenario: Scenario,
    workload: &Workload,
    access: &AccessIndices,
    iterations: u64,
) -> Result<Duration> {
    if workload.is_empty() {
        return Err(Error::WorkloadTooSmall {
            required: 1,
            available: 0,
        });
    }
    let n = workload.len();

    match scenario {
        Scenario::Write => {
            let start = Instant::now();
            for i in 0..iterations as usize {
                let (key, value) = workload.cycle(i);
                backend
                    .put(key, value)
                    .map_err(|e| Error::write(name, i % n, key, value, e))?;
            }
            Ok(start.elapsed())
        }
        Scenario::Read => {
            if access.is_empty() {
                return Err(Error::InvalidConfig(
                    "read scenario needs at least one access index".to_string(),
                ));
            }
            if let Some(&max) = access.as_slice().iter().max() {
                if max >= n {
                    return Err(Error::WorkloadTooSmall {
                        required: max + 1,
                        available: n,
                    });
                }
            }
            let start = Instant::now();
            for i in 0..iterations as usize {
                let idx = access.at(i).unwrap_or_default();
                let (key, expected) = (workload.key(idx), workload.value(idx));
                match backend.get(key) {
                    Ok(Some(value)) => {
                        black_box(value);
                    }
                    Ok(None) => {
                        return Err(Error::read(name, idx, key, expected, EngineError::KeyNotFound))
                    }
                    Err(e) => return Err(Error::read(name, idx, key, expected, e)),
                }
            }
            Ok(start.elapsed())
        }
        Scenario::WriteRead => {
            let start = Instant::now();
            for i in 0..iterations as usize {
                let (key, value) = workload.cycle(i);
                backend
                    .put(key, value)
                    .map_err(|e| Error::write(name, i % n, key, value, e))?;
                match backend.get(key) {
                    Ok(Some(read)) => {
                        black_box(read);
                    }
                    Ok(None) => {
                        return Err(Error::read(name, i % n, key, value, EngineError::KeyNotFound))
                    }
                    Err(e) => return Err(Error::read(name, i % n, key, value, e)),
                }
            }
            Ok(start.elapsed())
        }
    }
}

/// Drives scenarios against backends using one shared workload.
pub struct Runner<'a> {
    config: &'a BenchConfig,
    workload: &'a Workload,
    access: AccessIndices,
}

impl<'a> Runner<'a> {
    /// Create a runner. Access indices are drawn once, from the configured
    /// access seed, so every backend reads the same keys in the same order.
    pub fn new(config: &'a BenchConfig, workload: &'a Workload) -> Self {
        let access = AccessIndices::seeded(
            config.access_seed,
            config.access_indices,
            config.population,
        );
        Self {
            config,
            workload,
            access,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        self.config
    }

    pub fn access_indices(&self) -> &AccessIndices {
        &self.access
    }

    /// Check the workload and configuration can drive `scenario` before
    /// anything is opened.
    pub fn validate(&self, scenario: Scenario) -> Result<()> {
        if self.workload.is_empty() {
            return Err(Error::WorkloadTooSmall {
                required: 1,
                available: 0,
            });
        }
        if scenario.prepopulates() {
            if self.config.population == 0 {
                return Err(Error::InvalidConfig(format!(
                    "{} scenario needs a non-zero population",
                    scenario
                )));
            }
            if self.workload.len() < self.config.population {
                return Err(Error::WorkloadTooSmall {
                    required: self.config.population,
                    available: self.workload.len(),
                });
            }
        }
        if scenario == Scenario::Read && self.access.is_empty() {
            return Err(Error::InvalidConfig(
                "read scenario needs at least one access index".to_string(),
            ));
        }
        Ok(())
    }

    /// Storage location a (backend, scenario) run uses.
    pub fn location(&self, kind: BackendKind, scenario: Scenario) -> StorageLocation {
        kind.location(&self.config.data_root, scenario.name())
    }

    /// Full run lifecycle, returning only the timed-region duration.
    ///
    /// Suitable for a host benchmark loop that supplies the iteration count.
    pub fn measure(&self, kind: BackendKind, scenario: Scenario, iterations: u64) -> Result<Duration> {
        self.validate(scenario)?;

        let name = kind.name();
        let session = Session::setup(kind, self.location(kind, scenario), self.config)?;

        let outcome = self.exercise(session.backend(), name, scenario, iterations);
        let teardown = session.teardown();

        match (outcome, teardown) {
            (Ok(elapsed), Ok(())) => Ok(elapsed),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(teardown_err)) => {
                warn!(
                    backend = name,
                    scenario = %scenario,
                    error = %teardown_err,
                    "teardown failed after scenario error"
                );
                Err(e)
            }
        }
    }

    fn exercise(
        &self,
        backend: &dyn KvBackend,
        name: &'static str,
        scenario: Scenario,
        iterations: u64,
    ) -> Result<Duration> {
        if scenario.prepopulates() {
            let written = prepopulate(backend, name, self.workload, self.config.population)?;
            debug!(backend = name, scenario = %scenario, written, "store pre-populated");
        }
        timed_region(backend, name, scenario, self.workload, &self.access, iterations)
    }

    /// Run one scenario and report its timing.
    pub fn run(&self, kind: BackendKind, scenario: Scenario, iterations: u64) -> Result<ScenarioReport> {
        debug!(backend = kind.name(), scenario = %scenario, iterations, "scenario starting");
        let elapsed = self.measure(kind, scenario, iterations)?;
        let report = ScenarioReport::new(kind, scenario, iterations, elapsed);
        info!(
            backend = kind.name(),
            scenario = %scenario,
            iterations,
            ns_per_op = report.ns_per_op,
            "scenario complete"
        );
        Ok(report)
    }

    /// Run every (backend, scenario) pair in order. Failures are recorded
    /// and do not stop the remaining pairs.
    pub fn run_suite(&self, kinds: &[BackendKind], scenarios: &[Scenario], iterations: u64) -> SuiteReport {
        let mut suite = SuiteReport::default();
        for &kind in kinds {
            for &scenario in scenarios {
                let result = self.run(kind, scenario, iterations);
                if let Err(e) = &result {
                    error!(backend = kind.name(), scenario = %scenario, error = %e, "scenario failed");
                }
                suite.push(ScenarioOutcome {
                    backend: kind,
                    scenario,
                    result,
                });
            }
        }
        suite
    }
}

/// Put/Get round trip with overwrite on a scratch instance of `kind`.
pub fn sanity_check(kind: BackendKind, config: &BenchConfig) -> Result<()> {
    let name = kind.name();
    let wrap = |e: Error| Error::SanityCheck {
        backend: name,
        source: Box::new(e),
    };

    let location = kind.location(&config.data_root, "sanity");
    let session = Session::setup(kind, location, config).map_err(wrap)?;
    let outcome = round_trip(session.backend(), name);
    let teardown = session.teardown();

    outcome.and(teardown).map_err(wrap)
}

fn round_trip(backend: &dyn KvBackend, name: &'static str) -> Result<()> {
    for (index, value) in [&b"v1"[..], &b"v2"[..]].into_iter().enumerate() {
        let key = &b"k1"[..];
        backend
            .put(key, value)
            .map_err(|e| Error::write(name, index, key, value, e))?;
        match backend.get(key) {
            Ok(Some(read)) if read == value => {}
            Ok(Some(read)) => {
                return Err(Error::read(
                    name,
                    index,
                    key,
                    value,
                    EngineError::ValueMismatch {
                        expected: value.len(),
                        actual: read.len(),
                    },
                ))
            }
            Ok(None) => {
                return Err(Error::read(name, index, key, value, EngineError::KeyNotFound))
            }
            Err(e) => return Err(Error::read(name, index, key, value, e)),
        }
    }
    Ok(())
}
