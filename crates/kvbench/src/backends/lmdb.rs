//! LMDB adapter via heed (transactional store with named buckets).

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use super::KvBackend;
use crate::error::EngineError;

/// Named database every benchmark key lives in.
const BUCKET: &str = "b";

/// Upper bound on named databases in one environment.
const MAX_BUCKETS: u32 = 8;

/// LMDB environment with one named database.
pub struct LmdbBackend {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbBackend {
    /// Open the environment directory, creating it if needed.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, EngineError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: each scenario opens its own directory exactly once and the
        // environment is closed before the directory is removed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_BUCKETS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(BUCKET))?;
        wtxn.commit()?;

        Ok(Self { env, db })
    }
}

impl KvBackend for LmdbBackend {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), EngineError> {
        let mut wtxn = self.env.write_txn()?;
        self.db.put(&mut wtxn, key, value)?;
        wtxn.commit()?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, EngineError> {
        let rtxn = self.env.read_txn()?;
        let value = self.db.get(&rtxn, key)?.map(<[u8]>::to_vec);
        Ok(value)
    }

    fn close(self: Box<Self>) -> Result<(), EngineError> {
        let Self { env, db: _ } = *self;
        env.prepare_for_closing().wait();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::tests::exercise_round_trip;

    const MAP_SIZE: usize = 16 * 1024 * 1024;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LmdbBackend::open(&dir.path().join("lmdb.db"), MAP_SIZE).unwrap();
        exercise_round_trip(&backend);
        Box::new(backend).close().unwrap();
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lmdb.db");
        let backend = LmdbBackend::open(&path, MAP_SIZE).unwrap();
        assert!(path.is_dir());
        Box::new(backend).close().unwrap();
    }
}
