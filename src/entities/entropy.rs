//! `EntropyPool` (spec.md §3): `η`, fixed length 4. Index 0 is "current"
//! and advances every block; indices 1-3 only shift on epoch rotation.

use crate::codec::concat;
use crate::config::ENTROPY_POOL_SIZE;
use crate::crypto::{blake2b256, Hash};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntropyPool(pub [Hash; ENTROPY_POOL_SIZE]);

impl Default for EntropyPool {
    fn default() -> Self {
        Self([Hash::default(); ENTROPY_POOL_SIZE])
    }
}

impl EntropyPool {
    /// `η′[0] = hash(η[0] ‖ vrfOutput)`, computed every block regardless of
    /// epoch boundary.
    #[must_use]
    pub fn advance_current(&self, vrf_output: &Hash) -> Hash {
        blake2b256(&concat(&[&self.0[0], vrf_output]))
    }

    /// Epoch-boundary rotation: `η′[1..=3] = η[0..=2]`; `η′[0]` is supplied
    /// by the caller (the value [`EntropyPool::advance_current`] already
    /// produced for this block).
    #[must_use]
    pub fn rotate(&self, new_current: Hash) -> Self {
        Self([new_current, self.0[0], self.0[1], self.0[2]])
    }
}
