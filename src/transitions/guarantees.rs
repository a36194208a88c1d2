//! Guarantees and core-authorization calculations (spec.md §4.D, Eq 27/
//! 29/137-139): validates and applies the guarantees extrinsic against
//! `ρ‡`, and rotates each core's authorizer pool. Grounded on
//! `original_source/internal/state/transitions.go`'s
//! `calculateNewCoreAssignments`/`verifyGuaranteeCredentials`/
//! `calculateNewCoreAuthorizations`.

use crate::block::{Guarantee, GuaranteesExtrinsic};
use crate::config::Config;
use crate::crypto::verify_guarantee_signature;
use crate::entities::assignment::{Assignment, CoreAssignments};
use crate::entities::authorizer::{append_authorizer_limited, remove_authorizer, CoreAuthorizersPool, PendingAuthorizersQueues};
use crate::entities::validator::ValidatorKey;
use crate::time::Timeslot;

/// Whether a validator index is assigned to guarantee work for a given
/// core this rotation. Validator-to-core assignment is itself derived
/// from entropy and the rotation schedule (spec.md §4.D, out of this
/// crate's scope per the same oracle-seam reasoning as `SafroleOracle`);
/// a real chain plugs a rotation-aware implementation in here.
pub trait CoreAssignmentOracle {
    fn is_validator_assigned_to_core(&self, validator_index: u16, core_index: u16) -> bool;
}

/// Eq 138/139: credentials must be strictly ordered by validator index,
/// each credential's validator must be assigned to the report's core,
/// and its Ed25519 signature must verify over
/// `"$jam_guarantee" ++ hash(work_report)`.
#[must_use]
pub fn verify_guarantee_credentials(
    guarantee: &Guarantee,
    validators: &[ValidatorKey],
    oracle: &dyn CoreAssignmentOracle,
) -> bool {
    for window in guarantee.credentials.windows(2) {
        if window[0].validator_index >= window[1].validator_index {
            return false;
        }
    }

    let report_hash = guarantee.work_report.hash();

    for credential in &guarantee.credentials {
        let Some(validator) = validators.get(credential.validator_index as usize) else {
            return false;
        };
        if !oracle.is_validator_assigned_to_core(credential.validator_index, guarantee.work_report.core_index) {
            return false;
        }
        if !verify_guarantee_signature(&validator.ed25519, &report_hash, &credential.signature) {
            return false;
        }
    }

    true
}

/// Which validator set (current or archived) Eq 135/139 selects for a
/// guarantee's timeslot, relative to the block's new timeslot.
#[must_use]
pub fn select_validator_set<'a>(
    guarantee_timeslot: Timeslot,
    new_timeslot: Timeslot,
    current_validators: &'a [ValidatorKey],
    archived_validators: &'a [ValidatorKey],
    config: &Config,
) -> &'a [ValidatorKey] {
    if new_timeslot.rotation_index(config) == guarantee_timeslot.rotation_index(config) {
        current_validators
    } else {
        archived_validators
    }
}

/// `ρ′ ≺ (EG, ρ‡, κ, τ′)` — Eq 27: applies each guarantee whose timeslot
/// falls in the valid window and whose target core is free and whose
/// credentials check out. Guarantees are processed in core-index order
/// (Eq 137).
#[must_use]
pub fn calculate_new_core_assignments(
    guarantees: &GuaranteesExtrinsic,
    intermediate_assignments: &CoreAssignments,
    current_validators: &[ValidatorKey],
    archived_validators: &[ValidatorKey],
    new_timeslot: Timeslot,
    oracle: &dyn CoreAssignmentOracle,
    config: &Config,
) -> CoreAssignments {
    let mut new_assignments = intermediate_assignments.clone();

    let mut sorted: Vec<&Guarantee> = guarantees.iter().collect();
    sorted.sort_by_key(|g| g.work_report.core_index);

    let previous_rotation_start = new_timeslot
        .rotation_index(config)
        .saturating_sub(1)
        * config.rotation_period;

    for guarantee in sorted {
        let core_index = guarantee.work_report.core_index as usize;
        if guarantee.timeslot.value() < previous_rotation_start || guarantee.timeslot.value() > new_timeslot.value() {
            continue;
        }
        let Some(current) = intermediate_assignments.get(core_index) else {
            continue;
        };
        if !current.accepts_new_report(new_timeslot, config.work_report_timeout_period) {
            continue;
        }

        let validators = select_validator_set(
            guarantee.timeslot,
            new_timeslot,
            current_validators,
            archived_validators,
            config,
        );

        if verify_guarantee_credentials(guarantee, validators, oracle) {
            new_assignments[core_index] = Assignment {
                work_report: Some(guarantee.work_report.clone()),
                time: new_timeslot,
            };
        }
    }

    new_assignments
}

/// `α′ ≺ (H, EG, φ, α)` — Eq 29: drops each core's authorizer actually
/// consumed by a guarantee this block, then appends the next entry from
/// its pending queue (`φ[c][Ht mod Q]`), dropping the oldest entry if the
/// pool is already at its cap.
#[must_use]
pub fn calculate_new_core_authorizations(
    timeslot: Timeslot,
    guarantees: &GuaranteesExtrinsic,
    pending_authorizers: &PendingAuthorizersQueues,
    current_authorizers: &[CoreAuthorizersPool],
) -> Vec<CoreAuthorizersPool> {
    current_authorizers
        .iter()
        .enumerate()
        .map(|(core_index, pool)| {
            let mut updated = pool.clone();

            for guarantee in guarantees {
                if guarantee.work_report.core_index as usize == core_index {
                    remove_authorizer(&mut updated, &guarantee.work_report.authorizer_hash);
                }
            }

            if let Some(queue) = pending_authorizers.get(core_index) {
                if !queue.is_empty() {
                    let queue_index = timeslot.value() as usize % queue.len();
                    let candidate = queue[queue_index];
                    if candidate != crate::crypto::Hash::default() {
                        append_authorizer_limited(&mut updated, candidate);
                    }
                }
            }

            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::work_report::WorkReport;

    struct AllowAllOracle;
    impl CoreAssignmentOracle for AllowAllOracle {
        fn is_validator_assigned_to_core(&self, _: u16, _: u16) -> bool {
            true
        }
    }

    fn config() -> Config {
        Config {
            total_cores: 1,
            rotation_period: 10,
            work_report_timeout_period: 5,
            ..Config::default()
        }
    }

    #[test]
    fn credentials_must_be_ordered_by_validator_index() {
        let config = config();
        let report = WorkReport {
            core_index: 0,
            authorizer_hash: [0; 32],
            package_hash: [0; 32],
            service_id: 0,
            gas_limit: 0,
            output: vec![],
        };
        let guarantee = Guarantee {
            work_report: report,
            timeslot: Timeslot(0),
            credentials: vec![
                crate::block::Credential { validator_index: 2, signature: [0; 64] },
                crate::block::Credential { validator_index: 1, signature: [0; 64] },
            ],
        };
        let _ = &config;
        assert!(!verify_guarantee_credentials(&guarantee, &[], &AllowAllOracle));
    }

    #[test]
    fn authorizations_drop_used_authorizer() {
        let report = WorkReport {
            core_index: 0,
            authorizer_hash: [7; 32],
            package_hash: [0; 32],
            service_id: 0,
            gas_limit: 0,
            output: vec![],
        };
        let guarantee = Guarantee {
            work_report: report,
            timeslot: Timeslot(0),
            credentials: vec![],
        };
        let pending = vec![crate::entities::authorizer::empty_pending_queue()];
        let current = vec![vec![[7u8; 32], [8u8; 32]]];
        let updated = calculate_new_core_authorizations(Timeslot(0), &[guarantee], &pending, &current);
        assert_eq!(updated[0], vec![[8u8; 32]]);
    }
}
