//! Top-level state-transition orchestration: folds every per-component
//! calculation into one `apply_block` entry point, in the dependency
//! order spec.md §4 lays the equations out in — intermediate passes,
//! epoch rotation, guarantees/authorizations, judgements, accumulation,
//! on-transfer delivery, statistics, then the new recent-blocks entry.

use std::collections::BTreeMap;

use crate::accumulate::context::AccumulationState;
use crate::accumulate::{accumulate_service, run_on_transfer};
use crate::block::Block;
use crate::config::Config;
use crate::crypto::Hash;
use crate::entities::service::ServiceId;
use crate::error::StfError;
use crate::state::State;
use crate::vm::VirtualMachine;

use super::epoch::SafroleOracle;
use super::guarantees::CoreAssignmentOracle;
use super::recent_blocks::AccumulationMmrOracle;
use super::{epoch, guarantees, intermediate, judgements, recent_blocks, statistics};

pub struct TransitionOracles<'a> {
    pub vm: &'a dyn VirtualMachine,
    pub safrole: &'a dyn SafroleOracle,
    pub core_assignment: &'a dyn CoreAssignmentOracle,
    pub mmr: &'a dyn AccumulationMmrOracle,
}

/// Applies `block` to `state`, returning the posterior state. `block_author`
/// is the validator index credited with this block's activity counter.
pub fn apply_block(
    state: &State,
    block: &Block,
    block_author: u16,
    oracles: &TransitionOracles<'_>,
    config: &Config,
) -> Result<State, StfError> {
    let header = &block.header;
    let extrinsics = &block.extrinsics;
    let new_timeslot = header.timeslot;

    tracing::debug!(
        timeslot = new_timeslot.value(),
        guarantees = extrinsics.guarantees.len(),
        "applying block"
    );

    let intermediate_recent_blocks =
        intermediate::calculate_intermediate_block_state(header, &state.recent_blocks);
    let intermediate_service_state = intermediate::calculate_intermediate_service_state(
        &extrinsics.preimages,
        &state.accumulation.service_state,
        new_timeslot,
    );
    let assignments_after_disputes = intermediate::calculate_intermediate_core_assignments_from_disputes(
        &extrinsics.disputes,
        &state.core_assignments,
        config,
    );
    let assignments_after_availability =
        intermediate::calculate_intermediate_core_assignments_from_availability(
            &extrinsics.assurances,
            &assignments_after_disputes,
            config,
        );

    let new_safrole = epoch::calculate_new_safrole_state(
        header,
        &state.safrole.next_validators,
        oracles.safrole,
        config,
    )
    .unwrap_or_else(|| state.safrole.clone());
    let new_entropy = epoch::calculate_new_entropy_pool(header, &state.entropy, oracles.safrole, config);
    let new_current_validators = epoch::calculate_new_validators(
        header,
        &state.current_validators,
        &state.safrole.next_validators,
        config,
    );
    let new_archived_validators = epoch::calculate_new_archived_validators(
        header,
        &state.archived_validators,
        &state.current_validators,
        config,
    );

    let new_core_assignments = guarantees::calculate_new_core_assignments(
        &extrinsics.guarantees,
        &assignments_after_availability,
        &state.current_validators,
        &state.archived_validators,
        new_timeslot,
        oracles.core_assignment,
        config,
    );
    let new_core_authorizers = guarantees::calculate_new_core_authorizations(
        new_timeslot,
        &extrinsics.guarantees,
        &state.pending_authorizers,
        &state.core_authorizers,
    );

    let new_judgements = judgements::calculate_new_judgements(
        &extrinsics.disputes,
        &state.judgements,
        config,
    )
    .inspect_err(|err| tracing::warn!(%err, "dispute judgement tally rejected"))?;

    let mut accumulation_state = AccumulationState {
        service_state: intermediate_service_state,
        validator_keys: state.accumulation.validator_keys.clone(),
        work_reports_queue: state.accumulation.work_reports_queue.clone(),
        privileged_services: state.accumulation.privileged_services.clone(),
    };

    let mut accumulation_results: BTreeMap<ServiceId, Hash> = BTreeMap::new();
    let mut deferred_transfers = Vec::new();

    for assignment in &new_core_assignments {
        let Some(report) = &assignment.work_report else {
            continue;
        };
        let outcome = accumulate_service(
            config,
            oracles.vm,
            &accumulation_state,
            report.service_id,
            &state.entropy.0[0],
            new_timeslot,
            report.gas_limit,
            &report.output,
        );
        accumulation_state = outcome.accumulation_state;
        deferred_transfers.extend(outcome.deferred_transfers);
        if let Some(result_hash) = outcome.result_hash {
            accumulation_results.insert(report.service_id, result_hash);
        } else {
            tracing::debug!(service_id = report.service_id, "accumulation exited exceptionally");
        }
    }

    let mut receivers: Vec<ServiceId> = deferred_transfers.iter().map(|t| t.receiver).collect();
    receivers.sort_unstable();
    receivers.dedup();
    tracing::debug!(receivers = receivers.len(), "delivering deferred transfers");
    for receiver in receivers {
        accumulation_state = run_on_transfer(
            config,
            oracles.vm,
            &accumulation_state,
            receiver,
            &deferred_transfers,
            new_timeslot,
        );
    }

    let new_statistics = statistics::calculate_new_validator_statistics(
        extrinsics,
        block_author,
        new_timeslot,
        &state.statistics,
        config,
    );

    let new_recent_blocks = recent_blocks::calculate_new_recent_blocks(
        header,
        &extrinsics.guarantees,
        &intermediate_recent_blocks,
        &accumulation_results,
        config.total_cores as usize,
        oracles.mmr,
    );

    Ok(State {
        timeslot: new_timeslot,
        recent_blocks: new_recent_blocks,
        safrole: new_safrole,
        entropy: new_entropy,
        current_validators: new_current_validators,
        archived_validators: new_archived_validators,
        accumulation: accumulation_state,
        core_assignments: new_core_assignments,
        pending_authorizers: state.pending_authorizers.clone(),
        core_authorizers: new_core_authorizers,
        judgements: new_judgements,
        statistics: new_statistics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::validator::ValidatorKey;

    struct NoopOracles;
    impl SafroleOracle for NoopOracles {
        fn ring_commitment(&self, _: &[ValidatorKey]) -> Hash {
            Hash::default()
        }
        fn sealing_key_series(&self, _: &crate::block::Header) -> Vec<u8> {
            Vec::new()
        }
        fn vrf_output(&self, _: &crate::block::Header) -> Hash {
            Hash::default()
        }
    }
    impl CoreAssignmentOracle for NoopOracles {
        fn is_validator_assigned_to_core(&self, _: u16, _: u16) -> bool {
            true
        }
    }
    impl AccumulationMmrOracle for NoopOracles {
        fn append(&self, _: Hash, _: Hash) -> Hash {
            Hash::default()
        }
        fn accumulation_root(&self, _: &BTreeMap<ServiceId, Hash>) -> Hash {
            Hash::default()
        }
    }

    #[test]
    fn apply_empty_block_advances_timeslot() {
        let config = Config {
            total_cores: 1,
            validator_count: 6,
            epoch_length: 600,
            rotation_period: 10,
            work_report_timeout_period: 5,
            preimage_expunge_period: 19_200,
        };
        let state = State::new(config.total_cores as usize);
        let mut block = Block::default();
        block.header.timeslot = crate::time::Timeslot(1);

        let oracles = TransitionOracles {
            vm: &crate::vm::NullVirtualMachine,
            safrole: &NoopOracles,
            core_assignment: &NoopOracles,
            mmr: &NoopOracles,
        };

        let new_state = apply_block(&state, &block, 0, &oracles, &config).unwrap();
        assert_eq!(new_state.timeslot.value(), 1);
        assert_eq!(new_state.recent_blocks.last().unwrap().header_hash, block.header.hash());
    }
}
