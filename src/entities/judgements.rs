//! `Judgements` (spec.md §3): `ψ`. Four parallel, monotonically-growing
//! sets — offenders and classified work-report hashes are never removed
//! within or across blocks.

use std::collections::BTreeSet;

use crate::crypto::Hash;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Judgements {
    pub good_work_reports: BTreeSet<Hash>,
    pub bad_work_reports: BTreeSet<Hash>,
    pub wonky_work_reports: BTreeSet<Hash>,
    /// Ed25519 public keys of validators implicated by culprits/faults.
    pub offending_validators: BTreeSet<[u8; 32]>,
}

/// Insert `hash`, returning whether it was newly added — judgements sets
/// are insertion-unique, a duplicate verdict for an already-classified
/// report is a no-op rather than an error.
pub fn add_unique_hash(set: &mut BTreeSet<Hash>, hash: Hash) -> bool {
    set.insert(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_unique_hash_is_idempotent() {
        let mut set = BTreeSet::new();
        assert!(add_unique_hash(&mut set, [1; 32]));
        assert!(!add_unique_hash(&mut set, [1; 32]));
        assert_eq!(set.len(), 1);
    }
}
