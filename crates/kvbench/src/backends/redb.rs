//! redb adapter (single-bucket transactional store).

use std::path::Path;

use redb::{Database, TableDefinition};

use super::KvBackend;
use crate::error::EngineError;

/// Bucket every benchmark key lives in.
const BUCKET: TableDefinition<&[u8], &[u8]> = TableDefinition::new("test");

fn redb_err<E: Into<redb::Error>>(e: E) -> EngineError {
    EngineError::Redb(e.into())
}

/// redb database with a single table.
pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Create the database file and its bucket.
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let db = Database::create(path).map_err(redb_err)?;

        let txn = db.begin_write().map_err(redb_err)?;
        txn.open_table(BUCKET).map_err(redb_err)?;
        txn.commit().map_err(redb_err)?;

        Ok(Self { db })
    }
}

impl KvBackend for RedbBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        let txn = self.db.begin_write().map_err(redb_err)?;
        {
            let mut table = txn.open_table(BUCKET).map_err(redb_err)?;
            table.insert(key, value).map_err(redb_err)?;
        }
        txn.commit().map_err(redb_err)
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        let txn = self.db.begin_read().map_err(redb_err)?;
        let table = txn.open_table(BUCKET).map_err(redb_err)?;
        let value = table
            .get(key)
            .map_err(redb_err)?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn close(self: Box<Self>) -> Result<(), EngineError> {
        drop(self.db);
        Ok(())
    }
}
