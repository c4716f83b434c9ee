//! fjall adapter (log-structured store with a journal).

use std::path::Path;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};

use super::KvBackend;
use crate::error::EngineError;

/// Partition every benchmark key lives in.
const BUCKET: &str = "b";

/// fjall keyspace with one partition.
pub struct FjallBackend {
    keyspace: Keyspace,
    partition: PartitionHandle,
    sync_writes: bool,
}

impl FjallBackend {
    /// Open the keyspace. With `sync_writes` every put is fsynced before
    /// it returns.
    pub fn open(path: &Path, sync_writes: bool) -> Result<Self, EngineError> {
        let keyspace = Config::new(path).open()?;
        let partition = keyspace.open_partition(BUCKET, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace,
            partition,
            sync_writes,
        })
    }
}

impl KvBackend for FjallBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        self.partition.insert(key, value)?;
        if self.sync_writes {
            self.keyspace.persist(PersistMode::SyncAll)?;
        }
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        Ok(self.partition.get(key)?.map(|v| v.to_vec()))
    }

    fn close(self: Box<Self>) -> Result<(), EngineError> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::tests::exercise_round_trip;

    #[test]
    fn test_round_trip_synced() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FjallBackend::open(&dir.path().join("fjall.db"), true).unwrap();
        exercise_round_trip(&backend);
    }

    #[test]
    fn test_round_trip_unsynced() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FjallBackend::open(&dir.path().join("fjall.db"), false).unwrap();
        exercise_round_trip(&backend);
        Box::new(backend).close().unwrap();
    }
}
