//! Benchmark error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a storage engine behind a backend adapter.
#[derive(Debug, Error)]
pub enum EngineError {
    /// sled error.
    #[error("sled: {0}")]
    Sled(#[from] sled::Error),

    /// redb error.
    #[error("redb: {0}")]
    Redb(#[from] redb::Error),

    /// LMDB error.
    #[error("lmdb: {0}")]
    Lmdb(#[from] heed::Error),

    /// fjall error.
    #[error("fjall: {0}")]
    Fjall(#[from] fjall::Error),

    /// Filesystem error while preparing engine storage.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A key expected to be present was not found.
    #[error("key not found")]
    KeyNotFound,

    /// A read returned a value different from the one written.
    #[error("value mismatch: expected {expected} bytes, got {actual} bytes")]
    ValueMismatch { expected: usize, actual: usize },
}

/// Harness errors.
///
/// Every variant is fatal to the scenario run that raised it. Context
/// fields carry enough to diagnose a failure without re-running.
#[derive(Debug, Error)]
pub enum Error {
    /// Dictionary file missing or unreadable.
    #[error("dictionary {} unavailable: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dictionary file contained no words.
    #[error("dictionary {} contains no words", path.display())]
    EmptyDictionary { path: PathBuf },

    /// Workload is shorter than the pre-populated key range.
    #[error("workload has {available} entries, scenario needs {required}")]
    WorkloadTooSmall { required: usize, available: usize },

    /// Configuration cannot drive the requested scenario.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backend failed to open.
    #[error("{backend}: failed to open {location}: {source}")]
    OpenFailure {
        backend: &'static str,
        location: String,
        #[source]
        source: EngineError,
    },

    /// Backend failed to close.
    #[error("{backend}: failed to close: {source}")]
    CloseFailure {
        backend: &'static str,
        #[source]
        source: EngineError,
    },

    /// Put failed.
    #[error("{backend}: write failed (index {index}, key '{key}', value {value_len} bytes): {source}")]
    WriteFailure {
        backend: &'static str,
        index: usize,
        key: String,
        value_len: usize,
        #[source]
        source: EngineError,
    },

    /// Get failed or found nothing.
    #[error("{backend}: read failed (index {index}, key '{key}', expected {expected_len} bytes): {source}")]
    ReadFailure {
        backend: &'static str,
        index: usize,
        key: String,
        expected_len: usize,
        #[source]
        source: EngineError,
    },

    /// Removing on-disk artifacts failed.
    #[error("{backend}: failed to remove {}: {source}", path.display())]
    CleanupFailure {
        backend: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Put/Get round trip returned the wrong result.
    #[error("{backend}: sanity check failed: {source}")]
    SanityCheck {
        backend: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build a [`Error::WriteFailure`] for the given key and value.
    pub fn write(
        backend: &'static str,
        index: usize,
        key: &[u8],
        value: &[u8],
        source: EngineError,
    ) -> Self {
        Error::WriteFailure {
            backend,
            index,
            key: String::from_utf8_lossy(key).into_owned(),
            value_len: value.len(),
            source,
        }
    }

    /// Build a [`Error::ReadFailure`] for the given key and the value it
    /// was expected to hold.
    pub fn read(
        backend: &'static str,
        index: usize,
        key: &[u8],
        expected: &[u8],
        source: EngineError,
    ) -> Self {
        Error::ReadFailure {
            backend,
            index,
            key: String::from_utf8_lossy(key).into_owned(),
            expected_len: expected.len(),
            source,
        }
    }
}

/// Result alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;
