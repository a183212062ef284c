//! Injected source of random bytes.
//!
//! Integer construction never picks its own entropy; callers pass any
//! [`RandomSource`], typically a [`rand`] generator. Tests use a seeded
//! `StdRng` for reproducibility.

use rand::RngCore;

/// Source of random bytes for random-integer construction.
pub trait RandomSource {
    /// Returns `n` random bytes.
    fn random_bytes(&mut self, n: usize) -> Vec<u8>;
}

impl<R: RngCore> RandomSource for R {
    fn random_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; n];
        self.fill_bytes(&mut bytes);
        bytes
    }
}
