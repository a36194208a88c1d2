//! Intermediate-state calculations (spec.md §4, Eq 17/24/25/26): the
//! pre-accumulation passes over recent blocks, service state, and core
//! assignments. Grounded on
//! `original_source/internal/state/transitions.go`'s
//! `calculateIntermediate*` functions.

use crate::block::{DisputeExtrinsic, Header, PreimageExtrinsic};
use crate::config::Config;
use crate::entities::assignment::{Assignment, CoreAssignments};
use crate::entities::block_state::RecentBlocks;
use crate::entities::service::{PreimageKey, ServiceState};
use crate::time::Timeslot;

/// `β† ≺ (H, β)` — Eq 17: sets the most recent block's state root to the
/// new header's prior-state-root field (the previous header didn't know
/// its own posterior root at authoring time; this fills it in).
#[must_use]
pub fn calculate_intermediate_block_state(header: &Header, recent_blocks: &RecentBlocks) -> RecentBlocks {
    let mut intermediate = recent_blocks.clone();
    if let Some(last) = intermediate.last_mut() {
        last.state_root = header.prior_state_root;
    }
    intermediate
}

/// `δ† ≺ (EP, δ, τ′)` — Eq 24/156: for each preimage request satisfying
/// Eq 155 (not already provided, no existing metadata), records the
/// preimage and opens its metadata with a single historical timeslot.
#[must_use]
pub fn calculate_intermediate_service_state(
    preimages: &PreimageExtrinsic,
    service_state: &ServiceState,
    new_timeslot: Timeslot,
) -> ServiceState {
    let mut new_state = service_state.clone();

    for preimage in preimages {
        let Some(account) = new_state.get_mut(&preimage.service_index) else {
            continue;
        };

        let hash = crate::crypto::blake2b256(&preimage.data);
        let key = PreimageKey {
            hash,
            length: preimage.data.len() as u32,
        };

        if account.preimage_lookup.contains_key(&hash) {
            continue;
        }
        if account
            .preimage_meta
            .get(&key)
            .is_some_and(|existing| !existing.is_empty())
        {
            continue;
        }

        account.preimage_lookup.insert(hash, preimage.data.clone());
        account.preimage_meta.insert(key, vec![new_timeslot.value()]);
    }

    new_state
}

/// `ρ† ≺ (ED, ρ)` — Eq 25: clears a core's assignment wherever a verdict
/// failed to reach the `⌊2V/3⌋ + 1` positive-judgement supermajority and
/// the assigned report's hash matches the disputed one.
#[must_use]
pub fn calculate_intermediate_core_assignments_from_disputes(
    disputes: &DisputeExtrinsic,
    core_assignments: &CoreAssignments,
    config: &Config,
) -> CoreAssignments {
    let mut new_assignments = core_assignments.clone();
    let supermajority = config.validators_super_majority();

    for verdict in &disputes.verdicts {
        let positive = verdict.judgements.iter().filter(|j| j.is_valid).count() as u32;
        if positive >= supermajority {
            continue;
        }
        for assignment in &mut new_assignments {
            let matches = assignment
                .work_report
                .as_ref()
                .is_some_and(|report| report.hash() == verdict.report_hash);
            if matches {
                *assignment = Assignment::vacant();
            }
        }
    }

    new_assignments
}

/// `ρ‡ ≺ (EA, ρ†)` — Eq 26/129/130: keeps a core's (disputes-cleared)
/// assignment only where strictly more than `⌊2V/3⌋` validators asserted
/// availability for it; clears it otherwise. Operates on `ρ†`, not the
/// raw prior `ρ` — see `DESIGN.md`.
#[must_use]
pub fn calculate_intermediate_core_assignments_from_availability(
    assurances: &[crate::block::Assurance],
    core_assignments_after_disputes: &CoreAssignments,
    config: &Config,
) -> CoreAssignments {
    let num_cores = core_assignments_after_disputes.len();
    let mut availability_counts = vec![0u32; num_cores];

    for assurance in assurances {
        for (core_index, count) in availability_counts.iter_mut().enumerate() {
            let byte_index = core_index / 8;
            let bit_index = core_index % 8;
            let Some(byte) = assurance.bitfield.get(byte_index) else {
                continue;
            };
            if byte & (1 << bit_index) != 0 {
                *count += 1;
            }
        }
    }

    let threshold = config.availability_threshold();
    core_assignments_after_disputes
        .iter()
        .zip(availability_counts)
        .map(|(assignment, count)| {
            if count > threshold {
                assignment.clone()
            } else {
                Assignment::vacant()
            }
        })
        .collect()
}
