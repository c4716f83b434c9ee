//! sled adapter (ordered index store, disk or memory).

use super::{KvBackend, StorageLocation};
use crate::error::EngineError;

/// Tree every benchmark key lives in.
const BUCKET: &str = "test";

/// sled database with one named tree.
pub struct SledBackend {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledBackend {
    /// Open sled at `location`; [`StorageLocation::Memory`] uses a temporary
    /// instance that sled discards on drop.
    pub fn open(location: &StorageLocation, cache_capacity: u64) -> Result<Self, EngineError> {
        let mut config = sled::Config::new().cache_capacity(cache_capacity);

        match location {
            StorageLocation::Disk(path) => config = config.path(path),
            StorageLocation::Memory => config = config.temporary(true),
        }

        let db = config.open()?;
        let tree = db.open_tree(BUCKET)?;
        Ok(Self { db, tree })
    }
}

impl KvBackend for SledBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    fn close(self: Box<Self>) -> Result<(), EngineError> {
        self.db.flush()?;
        Ok(())
    }
}
