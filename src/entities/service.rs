//! `ServiceAccount` / `ServiceState` (spec.md §3).

use std::collections::BTreeMap;

use crate::config::{BASIC_MINIMUM_BALANCE, BYTE_DEPOSIT, ITEM_DEPOSIT};
use crate::crypto::Hash;

pub type ServiceId = u32;

/// A preimage's `(hash, length)` key — `PreimageLookup` is keyed by hash
/// alone, but `PreimageMeta` is keyed by the pair since a hash collision
/// across lengths is the one ambiguity the lifecycle state machine must
/// not confuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreimageKey {
    pub hash: Hash,
    pub length: u32,
}

/// The preimage lifecycle's historical-timeslot-list state (§4.I): empty
/// (requested, not yet provided), one entry (provided), two entries
/// (forgotten-request pending expunge, or re-solicited), three entries
/// (superseded, pending expunge before a second reuse).
pub type PreimageTimeslots = Vec<u32>;

/// A service's durable on-chain record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceAccount {
    pub code_hash: Hash,
    pub balance: u64,
    pub gas_limit_for_accumulator: u64,
    pub gas_limit_on_transfer: u64,
    pub storage: BTreeMap<Hash, Vec<u8>>,
    pub preimage_lookup: BTreeMap<Hash, Vec<u8>>,
    pub preimage_meta: BTreeMap<PreimageKey, PreimageTimeslots>,
}

impl ServiceAccount {
    /// Count of "elective" storage items contributing to the deposit: one
    /// per preimage-lookup entry plus one per preimage-meta entry (the
    /// teacher's `New`/`Solicit` both count a fresh preimage request as 2
    /// items — the lookup slot and the meta slot — before the preimage
    /// itself has been provided).
    #[must_use]
    pub fn elective_items(&self) -> u64 {
        (self.preimage_lookup.len() + self.preimage_meta.len()) as u64
    }

    /// Total octets contributed by elective storage: raw storage bytes
    /// plus, per preimage-meta entry, `81 + preimage_length` (Gray Paper's
    /// fixed per-entry overhead of 81 octets).
    #[must_use]
    pub fn elective_octets(&self) -> u64 {
        let storage_octets: u64 = self.storage.values().map(|v| v.len() as u64).sum();
        let preimage_octets: u64 = self
            .preimage_meta
            .keys()
            .map(|key| 81 + u64::from(key.length))
            .sum();
        storage_octets + preimage_octets
    }

    /// `BasicMinimumBalance + BI·|elective items| + BL·|elective octets|`.
    #[must_use]
    pub fn threshold_balance(&self) -> u64 {
        BASIC_MINIMUM_BALANCE
            .saturating_add(ITEM_DEPOSIT.saturating_mul(self.elective_items()))
            .saturating_add(BYTE_DEPOSIT.saturating_mul(self.elective_octets()))
    }

    #[must_use]
    pub fn is_solvent(&self) -> bool {
        self.balance >= self.threshold_balance()
    }
}

/// `ServiceId → ServiceAccount`.
pub type ServiceState = BTreeMap<ServiceId, ServiceAccount>;
