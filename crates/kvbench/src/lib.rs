//! kvbench: comparative benchmarks for embeddable key-value stores.
//!
//! A fixed, reproducible workload is driven through identical scenarios
//! against several storage engines so they can be compared on measured
//! latency.
//!
//! # Scenarios
//!
//! - **write**: puts cycling through the workload
//! - **read**: gets over a pre-populated store at seeded random positions
//! - **write-read**: a put immediately followed by a get of the same key
//!
//! # Backends
//!
//! - **redb**: single-bucket transactional B-tree
//! - **sled-disk** / **sled-memory**: ordered index, on disk or temporary
//! - **fjall**: log-structured store, synced on every write by default
//! - **lmdb**: LMDB through heed, with named buckets

pub mod backends;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod report;

pub use backends::{AdapterVariant, BackendKind, KvBackend, StorageLocation};
pub use config::BenchConfig;
pub use dictionary::Dictionary;
pub use error::{EngineError, Error, Result};
pub use fixtures::{AccessIndices, Workload};
pub use harness::{sanity_check, Runner, Scenario};
pub use report::{ScenarioOutcome, ScenarioReport, SuiteReport};
