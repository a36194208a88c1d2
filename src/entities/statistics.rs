//! `ValidatorStatisticsState` (spec.md §4.K, Eq 30): per-validator
//! activity counters, reset every epoch. Grounded on
//! `original_source/internal/state/transitions.go`'s
//! `calculateNewValidatorStatistics`, which is itself an unimplemented
//! stub (`return ValidatorStatisticsState{}`) — the counter shape below
//! is this crate's own construction from spec.md's one-paragraph sketch,
//! following the per-validator counter-rotation pattern used for
//! consensus participation counters elsewhere in the retrieval pack.

use std::collections::BTreeMap;

/// One validator's tallies for the current epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidatorActivity {
    pub blocks_produced: u32,
    pub tickets_submitted: u32,
    pub preimages_submitted: u32,
    pub preimage_octets_submitted: u64,
    pub guarantees_provided: u32,
    pub assurances_provided: u32,
}

/// `π`: current-epoch and previous-epoch activity, indexed by validator
/// index. Rotated (current → previous, current reset to empty) on every
/// epoch boundary, mirroring `EntropyPool`'s current/historical split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatorStatisticsState {
    pub current: BTreeMap<u16, ValidatorActivity>,
    pub previous: BTreeMap<u16, ValidatorActivity>,
}

impl ValidatorStatisticsState {
    #[must_use]
    pub fn rotate(&self) -> Self {
        Self {
            current: BTreeMap::new(),
            previous: self.current.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_moves_current_to_previous() {
        let mut state = ValidatorStatisticsState::default();
        state.current.insert(0, ValidatorActivity { blocks_produced: 3, ..Default::default() });
        let rotated = state.rotate();
        assert!(rotated.current.is_empty());
        assert_eq!(rotated.previous.get(&0).unwrap().blocks_produced, 3);
    }
}
