//! Integration tests running scenarios against the real engines.

use kvbench::{
    sanity_check, BackendKind, BenchConfig, Dictionary, Error, Runner, Scenario, Workload,
};

const POPULATION: usize = 200;
const ITERATIONS: u64 = 300;

struct TestContext {
    config: BenchConfig,
    workload: Workload,
    _data_dir: tempfile::TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self::with_words(500)
    }

    fn with_words(words: usize) -> Self {
        Self::configured(words, |config| config)
    }

    fn configured(words: usize, tune: impl FnOnce(BenchConfig) -> BenchConfig) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let config = tune(
            BenchConfig::new(data_dir.path().join("data"))
                .with_population(POPULATION)
                .with_access_indices(POPULATION)
                .with_lmdb_map_size(64 * 1024 * 1024)
                .with_sled_cache_capacity(4 * 1024 * 1024),
        );
        let dict = Dictionary::from_words((0..words).map(|i| format!("word{i:05}")));
        let workload = Workload::generate(&dict, config.seed, config.value_len);

        Self {
            config,
            workload,
            _data_dir: data_dir,
        }
    }

    fn runner(&self) -> Runner<'_> {
        Runner::new(&self.config, &self.workload)
    }
}

#[test]
fn test_every_backend_runs_every_scenario() {
    let ctx = TestContext::new();
    let runner = ctx.runner();

    for kind in BackendKind::ALL {
        for scenario in Scenario::ALL {
            let report = runner
                .run(kind, scenario, ITERATIONS)
                .unwrap_or_else(|e| panic!("{kind}/{scenario}: {e}"));
            assert_eq!(report.backend, kind);
            assert_eq!(report.scenario, scenario);
            assert_eq!(report.iterations, ITERATIONS);
            assert!(report.elapsed_ns > 0);
        }
    }
}

#[test]
fn test_artifacts_removed_after_teardown() {
    let ctx = TestContext::new();
    let runner = ctx.runner();

    for kind in BackendKind::ALL {
        for scenario in Scenario::ALL {
            let location = runner.location(kind, scenario);
            assert!(!location.exists(), "{location} exists before setup");
            runner.run(kind, scenario, 10).unwrap();
            assert!(!location.exists(), "{location} left behind");
        }
    }
}

#[test]
fn test_back_to_back_runs_are_isolated() {
    let ctx = TestContext::new();
    let runner = ctx.runner();

    for kind in BackendKind::ALL {
        runner.run(kind, Scenario::Read, 50).unwrap();
        runner.run(kind, Scenario::Read, 50).unwrap();
        assert!(!runner.location(kind, Scenario::Read).exists());
    }
}

#[test]
fn test_sanity_check_every_backend() {
    let ctx = TestContext::new();

    for kind in BackendKind::ALL {
        sanity_check(kind, &ctx.config).unwrap_or_else(|e| panic!("{kind}: {e}"));
        assert!(!kind.location(&ctx.config.data_root, "sanity").exists());
    }
}

#[test]
fn test_round_trip_and_overwrite_through_adapters() {
    let ctx = TestContext::new();
    std::fs::create_dir_all(&ctx.config.data_root).unwrap();

    for kind in BackendKind::ALL {
        let location = kind.location(&ctx.config.data_root, "adapter");
        let backend = kind.open(&location, &ctx.config).unwrap();

        backend.put(b"k1", b"v1").unwrap();
        assert_eq!(backend.get(b"k1").unwrap().as_deref(), Some(&b"v1"[..]), "{kind}");

        backend.put(b"k1", b"v2").unwrap();
        assert_eq!(backend.get(b"k1").unwrap().as_deref(), Some(&b"v2"[..]), "{kind}");

        backend.close().unwrap();
        location.remove().unwrap();
        assert!(!location.exists());
    }
}

#[test]
fn test_prepopulated_values_read_back() {
    let ctx = TestContext::new();
    std::fs::create_dir_all(&ctx.config.data_root).unwrap();

    for kind in BackendKind::ALL {
        let location = kind.location(&ctx.config.data_root, "population");
        let backend = kind.open(&location, &ctx.config).unwrap();
        kvbench::harness::prepopulate(backend.as_ref(), kind.name(), &ctx.workload, POPULATION)
            .unwrap();

        // Last write wins when the workload repeats a key.
        for i in 0..POPULATION {
            let key = ctx.workload.key(i);
            let expected = (0..POPULATION)
                .rev()
                .find(|&j| ctx.workload.key(j) == key)
                .map(|j| ctx.workload.value(j))
                .unwrap();
            assert_eq!(backend.get(key).unwrap().as_deref(), Some(expected), "{kind}");
        }

        backend.close().unwrap();
        location.remove().unwrap();
    }
}

#[test]
fn test_stale_artifact_is_replaced() {
    let ctx = TestContext::new();
    let runner = ctx.runner();
    let location = runner.location(BackendKind::Redb, Scenario::Write);
    let path = location.path().unwrap();

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"not a database").unwrap();

    runner.run(BackendKind::Redb, Scenario::Write, 20).unwrap();
    assert!(!location.exists());
}

#[test]
fn test_suite_continues_after_failure() {
    // Fewer words than the population: read scenarios cannot run.
    let ctx = TestContext::with_words(POPULATION - 1);
    let runner = ctx.runner();

    let suite = runner.run_suite(&[BackendKind::SledMemory, BackendKind::Redb], &Scenario::ALL, 20);

    assert_eq!(suite.len(), 6);
    assert_eq!(suite.successes().count(), 2);
    for (outcome, err) in suite.failures() {
        assert_ne!(outcome.scenario, Scenario::Write);
        assert!(matches!(err, Error::WorkloadTooSmall { .. }));
    }
}

#[test]
fn test_open_failure_is_attributed() {
    let ctx = TestContext::new();
    // A regular file where the data root directory should be.
    std::fs::write(&ctx.config.data_root, b"").unwrap();
    let runner = ctx.runner();

    let err = runner.run(BackendKind::Lmdb, Scenario::Write, 10).unwrap_err();
    match err {
        Error::OpenFailure { backend, .. } => assert_eq!(backend, "lmdb"),
        other => panic!("unexpected error: {other}"),
    }

    // The memory backend has no artifact and is unaffected.
    runner.run(BackendKind::SledMemory, Scenario::Write, 10).unwrap();
}

#[test]
fn test_artifacts_removed_after_write_failure() {
    // Large values in a small LMDB map: pre-population runs out of space.
    let ctx = TestContext::configured(500, |config| {
        config
            .with_value_len(100_000)
            .with_lmdb_map_size(1024 * 1024)
    });
    let runner = ctx.runner();
    let location = runner.location(BackendKind::Lmdb, Scenario::Read);

    let err = runner.run(BackendKind::Lmdb, Scenario::Read, 10).unwrap_err();
    match err {
        Error::WriteFailure {
            backend, value_len, ..
        } => {
            assert_eq!(backend, "lmdb");
            assert_eq!(value_len, 100_000);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!location.exists(), "{location} left behind after failure");

    // The next run at the same location starts from a clean slate.
    let err = runner.run(BackendKind::Lmdb, Scenario::Read, 10).unwrap_err();
    assert!(matches!(err, Error::WriteFailure { .. }));
    assert!(!location.exists());
}

#[test]
fn test_workload_identical_across_generations() {
    let dict = Dictionary::from_words(["a", "b", "c", "d", "e"]);
    let first = Workload::generate(&dict, 100, 200);
    let second = Workload::generate(&dict, 100, 200);

    assert_eq!(first.keys(), second.keys());
    assert_eq!(first.values(), second.values());
}
