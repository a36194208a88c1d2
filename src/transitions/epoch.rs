//! Epoch-boundary state calculations (spec.md §4.C, Eq 19/20/21/22):
//! Safrole rotation, entropy advance, and the current/archived validator
//! set swap. Grounded on
//! `original_source/internal/state/transitions.go`'s
//! `calculateNewSafroleState`/`calculateNewEntropyPool`/
//! `calculateNewValidators`/`calculateNewArchivedValidators`.

use crate::block::Header;
use crate::entities::validator::ValidatorKey;
use crate::state::SafroleState;
use crate::time::Timeslot;

/// Ring-commitment construction and sealing-key-series determination are
/// VRF machinery out of this crate's scope (spec.md §9); `SafroleOracle`
/// is the seam a caller plugs a real implementation into, mirroring how
/// `vm::VirtualMachine` stands in for the bytecode interpreter.
pub trait SafroleOracle {
    fn ring_commitment(&self, validators: &[ValidatorKey]) -> crate::crypto::Hash;
    fn sealing_key_series(&self, header: &Header) -> Vec<u8>;
    /// Extracts this block's VRF output from the header's seal, used to
    /// advance the entropy pool.
    fn vrf_output(&self, header: &Header) -> crate::crypto::Hash;
}

/// `γ′ ≺ (H, τ, ET, γ, ι, η′, κ′)` — Eq 19: only runs on the first
/// timeslot of an epoch; offender-marked queued validators are nulled out
/// before the ring commitment is built over what remains.
#[must_use]
pub fn calculate_new_safrole_state(
    header: &Header,
    queued_validators: &[ValidatorKey],
    oracle: &dyn SafroleOracle,
    config: &crate::config::Config,
) -> Option<SafroleState> {
    if !header.timeslot.is_first_in_epoch(config) {
        return None;
    }

    let offenders: std::collections::HashSet<[u8; 32]> =
        header.offenders_markers.iter().copied().collect();
    let next_validators: Vec<ValidatorKey> = queued_validators
        .iter()
        .map(|v| {
            if offenders.contains(&v.ed25519) {
                ValidatorKey::default()
            } else {
                *v
            }
        })
        .collect();

    Some(SafroleState {
        ring_commitment: oracle.ring_commitment(&next_validators),
        sealing_key_series: oracle.sealing_key_series(header),
        next_validators,
    })
}

/// `η′ ≺ (H, τ, η)` — Eq 20: always advances the current slot
/// (`η′[0] = hash(η[0] ‖ vrfOutput)`); rotates the historical slots first
/// if this is the first timeslot of a new epoch.
#[must_use]
pub fn calculate_new_entropy_pool(
    header: &Header,
    pool: &crate::entities::entropy::EntropyPool,
    oracle: &dyn SafroleOracle,
    config: &crate::config::Config,
) -> crate::entities::entropy::EntropyPool {
    let vrf_output = oracle.vrf_output(header);
    let new_current = pool.advance_current(&vrf_output);
    if header.timeslot.is_first_in_epoch(config) {
        pool.rotate(new_current)
    } else {
        let mut advanced = *pool;
        advanced.0[0] = new_current;
        advanced
    }
}

/// `κ′ ≺ (H, τ, κ, γ, ψ′)` — Eq 21: the queued (next-epoch) validator set
/// becomes current only on an epoch boundary; otherwise `κ` is unchanged.
#[must_use]
pub fn calculate_new_validators(
    header: &Header,
    current_validators: &[ValidatorKey],
    next_validators: &[ValidatorKey],
    config: &crate::config::Config,
) -> Vec<ValidatorKey> {
    if header.timeslot.is_first_in_epoch(config) {
        next_validators.to_vec()
    } else {
        current_validators.to_vec()
    }
}

/// `λ′ ≺ (H, τ, λ, κ)` — Eq 22: the archived set becomes the outgoing
/// current set only on an epoch boundary.
#[must_use]
pub fn calculate_new_archived_validators(
    header: &Header,
    archived_validators: &[ValidatorKey],
    current_validators: &[ValidatorKey],
    config: &crate::config::Config,
) -> Vec<ValidatorKey> {
    if header.timeslot.is_first_in_epoch(config) {
        current_validators.to_vec()
    } else {
        archived_validators.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    struct StubOracle;
    impl SafroleOracle for StubOracle {
        fn ring_commitment(&self, _: &[ValidatorKey]) -> crate::crypto::Hash {
            [7; 32]
        }
        fn sealing_key_series(&self, _: &Header) -> Vec<u8> {
            vec![1, 2, 3]
        }
        fn vrf_output(&self, _: &Header) -> crate::crypto::Hash {
            [5; 32]
        }
    }

    fn config() -> Config {
        Config {
            epoch_length: 600,
            ..Config::default()
        }
    }

    #[test]
    fn safrole_state_only_updates_at_epoch_boundary() {
        let config = config();
        let mut header = Header::default();
        header.timeslot = Timeslot(1);
        assert!(calculate_new_safrole_state(&header, &[], &StubOracle, &config).is_none());

        header.timeslot = Timeslot(0);
        assert!(calculate_new_safrole_state(&header, &[], &StubOracle, &config).is_some());
    }

    #[test]
    fn offenders_are_nulled_before_commitment() {
        let config = config();
        let mut header = Header::default();
        header.timeslot = Timeslot(0);
        let mut key = ValidatorKey::default();
        key.ed25519 = [1; 32];
        header.offenders_markers = vec![[1; 32]];

        let result = calculate_new_safrole_state(&header, &[key], &StubOracle, &config).unwrap();
        assert_eq!(result.next_validators[0], ValidatorKey::default());
    }

    #[test]
    fn validators_carry_over_outside_epoch_boundary() {
        let config = config();
        let mut header = Header::default();
        header.timeslot = Timeslot(3);
        let current = vec![ValidatorKey::default()];
        let next = vec![ValidatorKey {
            bandersnatch: [9; 32],
            ..ValidatorKey::default()
        }];
        let result = calculate_new_validators(&header, &current, &next, &config);
        assert_eq!(result, current);
    }
}
