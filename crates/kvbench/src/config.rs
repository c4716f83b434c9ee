//! Benchmark configuration.

use std::path::PathBuf;

/// Environment variable overriding the data root.
pub const DATA_ROOT_ENV: &str = "KVBENCH_DATA_ROOT";

/// Default directory holding per-scenario storage artifacts.
pub const DEFAULT_DATA_ROOT: &str = "data";

/// Default newline-delimited word list.
pub const DEFAULT_DICTIONARY_PATH: &str = "/usr/share/dict/words";

/// Seed for key/value generation.
pub const DEFAULT_SEED: u64 = 100;

/// Seed for access index generation.
pub const DEFAULT_ACCESS_SEED: u64 = 7;

/// Length of every generated value in bytes.
pub const DEFAULT_VALUE_LEN: usize = 200;

/// Number of entries written before read-oriented timed regions.
pub const DEFAULT_POPULATION: usize = 10_000;

/// Number of precomputed access indices.
pub const DEFAULT_ACCESS_INDICES: usize = 10_000;

/// Default LMDB map size (1 GiB).
pub const DEFAULT_LMDB_MAP_SIZE: usize = 1024 * 1024 * 1024;

/// Default sled page cache (64 MiB).
pub const DEFAULT_SLED_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;

/// Configuration shared by every scenario run of a suite.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Root directory for storage artifacts.
    pub data_root: PathBuf,

    /// Dictionary file the workload is built from.
    pub dictionary_path: PathBuf,

    /// Seed for the workload generator.
    pub seed: u64,

    /// Seed for the access pattern generator.
    pub access_seed: u64,

    /// Value length in bytes.
    pub value_len: usize,

    /// Entries pre-populated before `read` and `write-read`.
    pub population: usize,

    /// Length of the access index sequence.
    pub access_indices: usize,

    /// Sync the log store after every write.
    pub sync_writes: bool,

    /// LMDB memory map size in bytes.
    pub lmdb_map_size: usize,

    /// sled page cache capacity in bytes.
    pub sled_cache_capacity: u64,
}

impl BenchConfig {
    /// Create a configuration rooted at the given data directory.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
            seed: DEFAULT_SEED,
            access_seed: DEFAULT_ACCESS_SEED,
            value_len: DEFAULT_VALUE_LEN,
            population: DEFAULT_POPULATION,
            access_indices: DEFAULT_ACCESS_INDICES,
            sync_writes: true,
            lmdb_map_size: DEFAULT_LMDB_MAP_SIZE,
            sled_cache_capacity: DEFAULT_SLED_CACHE_CAPACITY,
        }
    }

    /// Default configuration with the data root taken from `KVBENCH_DATA_ROOT`.
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_ROOT_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Self::default(),
        }
    }

    /// Set the dictionary path.
    pub fn with_dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary_path = path.into();
        self
    }

    /// Set the workload seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the access pattern seed.
    pub fn with_access_seed(mut self, seed: u64) -> Self {
        self.access_seed = seed;
        self
    }

    /// Set the value length.
    pub fn with_value_len(mut self, len: usize) -> Self {
        self.value_len = len;
        self
    }

    /// Set the pre-population size.
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Set the number of access indices.
    pub fn with_access_indices(mut self, count: usize) -> Self {
        self.access_indices = count;
        self
    }

    /// Enable or disable per-write sync on the log store.
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }

    /// Set the LMDB map size.
    pub fn with_lmdb_map_size(mut self, size: usize) -> Self {
        self.lmdb_map_size = size;
        self
    }

    /// Set the sled cache capacity.
    pub fn with_sled_cache_capacity(mut self, capacity: u64) -> Self {
        self.sled_cache_capacity = capacity;
        self
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_ROOT)
    }
}
