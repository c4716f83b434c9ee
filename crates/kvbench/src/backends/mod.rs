//! Storage backends under comparison.
//!
//! Every engine is wrapped in a [`KvBackend`] so the harness drives all of
//! them through the same open/put/get/close contract. Engine-specific setup
//! (buckets, tables, partitions, named databases) happens inside `open`.

pub mod fjall;
pub mod lmdb;
pub mod redb;
pub mod sled;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::config::BenchConfig;
use crate::error::EngineError;

pub use self::fjall::FjallBackend;
pub use self::lmdb::LmdbBackend;
pub use self::redb::RedbBackend;
pub use self::sled::SledBackend;

/// Uniform key-value contract over an open storage instance.
///
/// A handle is used by a single thread of control; the harness never
/// issues concurrent calls.
pub trait KvBackend {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError>;

    /// Fetch the value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError>;

    /// Flush and release the underlying engine.
    fn close(self: Box<Self>) -> Result<(), EngineError>;
}

/// Shape of the engine API an adapter normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterVariant {
    /// Single-bucket transactional B-tree.
    BucketStore,
    /// Ordered index with disk or memory storage.
    OrderedStore,
    /// Log-structured store with a journal.
    LogStore,
    /// Transactional store with named buckets.
    MultiBucketStore,
}

/// A benchmark family: one engine in one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    Redb,
    SledDisk,
    SledMemory,
    Fjall,
    Lmdb,
}

impl BackendKind {
    /// All families in suite order.
    pub const ALL: [BackendKind; 5] = [
        BackendKind::Redb,
        BackendKind::SledDisk,
        BackendKind::SledMemory,
        BackendKind::Fjall,
        BackendKind::Lmdb,
    ];

    /// Family name used in paths, reports and CLI selection.
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Redb => "redb",
            BackendKind::SledDisk => "sled-disk",
            BackendKind::SledMemory => "sled-memory",
            BackendKind::Fjall => "fjall",
            BackendKind::Lmdb => "lmdb",
        }
    }

    pub fn variant(&self) -> AdapterVariant {
        match self {
            BackendKind::Redb => AdapterVariant::BucketStore,
            BackendKind::SledDisk | BackendKind::SledMemory => AdapterVariant::OrderedStore,
            BackendKind::Fjall => AdapterVariant::LogStore,
            BackendKind::Lmdb => AdapterVariant::MultiBucketStore,
        }
    }

    /// Whether this family keeps its data in memory only.
    pub fn is_memory(&self) -> bool {
        matches!(self, BackendKind::SledMemory)
    }

    /// Storage location for a run named `label`, e.g. `redb-read.db`.
    pub fn location(&self, data_root: &Path, label: &str) -> StorageLocation {
        if self.is_memory() {
            StorageLocation::Memory
        } else {
            StorageLocation::Disk(data_root.join(format!("{}-{}.db", self.name(), label)))
        }
    }

    /// Open a fresh instance of this family at `location`.
    pub fn open(
        &self,
        location: &StorageLocation,
        config: &BenchConfig,
    ) -> Result<Box<dyn KvBackend>, EngineError> {
        let backend: Box<dyn KvBackend> = match self {
            BackendKind::Redb => Box::new(RedbBackend::open(location.require_path()?)?),
            BackendKind::SledDisk | BackendKind::SledMemory => {
                Box::new(SledBackend::open(location, config.sled_cache_capacity)?)
            }
            BackendKind::Fjall => Box::new(FjallBackend::open(
                location.require_path()?,
                config.sync_writes,
            )?),
            BackendKind::Lmdb => Box::new(LmdbBackend::open(
                location.require_path()?,
                config.lmdb_map_size,
            )?),
        };
        Ok(backend)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<_> = BackendKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown backend '{}' (known: {})", s, known.join(", "))
            })
    }
}

/// Where a backend instance keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A file or directory on disk, removed after the run.
    Disk(PathBuf),
    /// Engine-managed memory; nothing to remove.
    Memory,
}

impl StorageLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            StorageLocation::Disk(path) => Some(path),
            StorageLocation::Memory => None,
        }
    }

    /// Whether an on-disk artifact currently exists.
    pub fn exists(&self) -> bool {
        self.path().map(Path::exists).unwrap_or(false)
    }

    /// Delete the on-disk artifact, file or directory. Missing artifacts
    /// are not an error.
    pub fn remove(&self) -> std::io::Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let result = if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        match result {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn require_path(&self) -> Result<&Path, EngineError> {
        self.path().ok_or_else(|| {
            EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "engine requires an on-disk location",
            ))
        })
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Disk(path) => write!(f, "{}", path.display()),
            StorageLocation::Memory => f.write_str(":memory:"),
        }
    }
}
