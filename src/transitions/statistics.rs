//! `π′ ≺ (EG, EP, EA, ET, τ, τ′)` — spec.md §4.K, Eq 30: per-validator
//! activity counters for the block just applied, rotated to
//! previous-epoch history on an epoch boundary. `original_source`'s
//! `calculateNewValidatorStatistics` is an unimplemented stub (returns a
//! zero value unconditionally); the counter bump logic below is this
//! crate's own construction from spec.md's activity-counter sketch (see
//! `DESIGN.md`).

use crate::block::Extrinsics;
use crate::config::Config;
use crate::entities::statistics::ValidatorActivity;
use crate::entities::statistics::ValidatorStatisticsState;
use crate::time::Timeslot;

#[must_use]
pub fn calculate_new_validator_statistics(
    extrinsics: &Extrinsics,
    block_author: u16,
    new_timeslot: Timeslot,
    statistics: &ValidatorStatisticsState,
    config: &Config,
) -> ValidatorStatisticsState {
    let mut new_statistics = if new_timeslot.is_first_in_epoch(config) {
        statistics.rotate()
    } else {
        statistics.clone()
    };

    new_statistics
        .current
        .entry(block_author)
        .or_default()
        .blocks_produced += 1;

    for ticket in &extrinsics.tickets {
        let _ = ticket;
        new_statistics
            .current
            .entry(block_author)
            .or_default()
            .tickets_submitted += 1;
    }

    for preimage in &extrinsics.preimages {
        let activity = new_statistics
            .current
            .entry(preimage.service_index as u16)
            .or_default();
        activity.preimages_submitted += 1;
        activity.preimage_octets_submitted += preimage.data.len() as u64;
    }

    for guarantee in &extrinsics.guarantees {
        for credential in &guarantee.credentials {
            new_statistics
                .current
                .entry(credential.validator_index)
                .or_default()
                .guarantees_provided += 1;
        }
    }

    for assurance in &extrinsics.assurances {
        new_statistics
            .current
            .entry(assurance.validator_index)
            .or_default()
            .assurances_provided += 1;
    }

    new_statistics
}
