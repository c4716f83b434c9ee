//! Workload generation for benchmarks.
//!
//! Key/value pairs and access indices are drawn from explicitly seeded
//! generators so that every backend sees exactly the same traffic.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::dictionary::Dictionary;

/// Parallel key and value sequences driving a benchmark family.
///
/// `keys[i]` is a dictionary word picked at random (repeats are expected
/// and model overwrite traffic); `values[i]` is random bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    keys: Vec<Vec<u8>>,
    values: Vec<Vec<u8>>,
}

impl Workload {
    /// Generate a workload with one entry per dictionary word.
    ///
    /// For each index the generator first draws the dictionary position
    /// for the key and then fills the value, in that order. Changing the
    /// order changes every generated byte.
    pub fn generate(dict: &Dictionary, seed: u64, value_len: usize) -> Self {
        let n = dict.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut keys = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);

        for _ in 0..n {
            let j = rng.gen_range(0..n);
            keys.push(dict.words()[j].clone());

            let mut value = vec![0u8; value_len];
            rng.fill_bytes(&mut value);
            values.push(value);
        }

        Self { keys, values }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Entry at `i`, wrapping around the workload length.
    ///
    /// Panics on an empty workload.
    pub fn cycle(&self, i: usize) -> (&[u8], &[u8]) {
        let idx = i % self.keys.len();
        (&self.keys[idx], &self.values[idx])
    }

    pub fn key(&self, i: usize) -> &[u8] {
        &self.keys[i]
    }

    pub fn value(&self, i: usize) -> &[u8] {
        &self.values[i]
    }

    pub fn keys(&self) -> &[Vec<u8>] {
        &self.keys
    }

    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }
}

/// Precomputed workload positions read by the `read` scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessIndices {
    indices: Vec<usize>,
}

impl AccessIndices {
    /// Draw `count` indices uniformly from `[0, bound)`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize, bound: usize) -> Self {
        if bound == 0 {
            return Self { indices: Vec::new() };
        }
        let indices = (0..count).map(|_| rng.gen_range(0..bound)).collect();
        Self { indices }
    }

    /// Draw indices from a generator seeded with `seed`.
    pub fn seeded(seed: u64, count: usize, bound: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(&mut rng, count, bound)
    }

    /// Index used on iteration `i`, wrapping around the sequence.
    pub fn at(&self, i: usize) -> Option<usize> {
        if self.indices.is_empty() {
            return None;
        }
        Some(self.indices[i % self.indices.len()])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Dictionary {
        Dictionary::from_words(["a", "b", "c", "d", "e"])
    }

    #[test]
    fn test_generate_is_deterministic() {
        let first = Workload::generate(&letters(), 100, 200);
        let second = Workload::generate(&letters(), 100, 200);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_generate_shapes() {
        let dict = letters();
        let workload = Workload::generate(&dict, 100, 200);

        assert_eq!(workload.keys().len(), dict.len());
        assert_eq!(workload.values().len(), dict.len());
        for (key, value) in workload.keys().iter().zip(workload.values()) {
            assert!(dict.words().iter().any(|w| w == key));
            assert_eq!(value.len(), 200);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Workload::generate(&letters(), 100, 200);
        let b = Workload::generate(&letters(), 101, 200);
        assert_ne!(a.values(), b.values());
    }

    #[test]
    fn test_empty_dictionary() {
        let workload = Workload::generate(&Dictionary::from_words(Vec::<String>::new()), 100, 200);
        assert!(workload.is_empty());
    }

    #[test]
    fn test_cycle_wraps() {
        let workload = Workload::generate(&letters(), 100, 8);
        assert_eq!(workload.cycle(7), (workload.key(2), workload.value(2)));
    }

    #[test]
    fn test_access_indices_bounds() {
        let indices = AccessIndices::seeded(7, 10_000, 10_000);
        assert_eq!(indices.len(), 10_000);
        assert!(indices.as_slice().iter().all(|&i| i < 10_000));
    }

    #[test]
    fn test_access_indices_seeded_reproducible() {
        assert_eq!(AccessIndices::seeded(3, 100, 50), AccessIndices::seeded(3, 100, 50));
    }

    #[test]
    fn test_access_indices_wrap_and_empty() {
        let indices = AccessIndices::seeded(3, 4, 10);
        assert_eq!(indices.at(5), indices.at(1));
        assert_eq!(AccessIndices::seeded(3, 4, 0).at(0), None);
    }
}
