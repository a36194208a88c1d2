//! Ψ_T, the on-transfer driver (spec.md §4): delivers a service's
//! incoming deferred transfers for the block, crediting its balance and
//! invoking its code (if any) at the on-transfer entry point under a
//! restricted host-call surface — no `New`/`Transfer`/`Quit`/`Empower`
//! and friends, only the five ambient storage/info calls.

use crate::codec::{concat, encode_fixed_length};
use crate::config::{Config, ON_TRANSFER_ENTRY_POINT};
use crate::entities::service::ServiceId;
use crate::time::Timeslot;
use crate::vm::{VirtualMachine, VmOutcome};

use super::context::{AccumulateContextPair, AccumulationState, DeferredTransfer};
use super::dispatch::AccumulateDispatch;
use super::host_calls::HostFunctionRegistry;

fn encode_transfer(transfer: &DeferredTransfer) -> Vec<u8> {
    concat(&[
        &encode_fixed_length(u64::from(transfer.sender), 4),
        &encode_fixed_length(transfer.balance, 8),
        &transfer.memo,
        &encode_fixed_length(transfer.gas_limit, 8),
    ])
}

fn encode_operands(transfers: &[&DeferredTransfer]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = transfers.iter().map(|t| encode_transfer(t)).collect();
    let refs: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
    concat(&refs)
}

/// Runs the on-transfer entry point for `service_id` against every
/// transfer in `transfers` addressed to it. Returns the accumulation
/// state with the service's balance credited and any storage mutations
/// the VM run performed; a missing recipient account or an empty
/// transfer set is a no-op beyond the (absent) credit.
#[must_use]
pub fn run_on_transfer(
    config: &Config,
    vm: &dyn VirtualMachine,
    accumulation_state: &AccumulationState,
    service_id: ServiceId,
    transfers: &[DeferredTransfer],
    now: Timeslot,
) -> AccumulationState {
    let incoming: Vec<&DeferredTransfer> = transfers
        .iter()
        .filter(|t| t.receiver == service_id)
        .collect();

    if incoming.is_empty() {
        return accumulation_state.clone();
    }

    let mut credited_state = accumulation_state.clone();
    let Some(account) = credited_state.service_state.get_mut(&service_id) else {
        return credited_state;
    };

    let total_credit: u64 = incoming.iter().map(|t| t.balance).sum();
    let total_gas: u64 = incoming.iter().map(|t| t.gas_limit).sum();
    account.balance = account.balance.saturating_add(total_credit);

    let Some(code) = account
        .preimage_lookup
        .get(&account.code_hash)
        .cloned()
        .filter(|_| total_gas > 0)
    else {
        return credited_state;
    };

    let mut context_pair = AccumulateContextPair::new(service_id, service_id, credited_state.clone());
    let registry = HostFunctionRegistry::on_transfer();
    let mut dispatch = AccumulateDispatch::new(
        &registry,
        &mut context_pair,
        service_id,
        now,
        config.preimage_expunge_period,
        config.total_cores,
        config.validator_count,
    );

    let operands = encode_operands(&incoming);
    let outcome = vm.invoke(&code, ON_TRANSFER_ENTRY_POINT, total_gas, &operands, &mut dispatch);

    match outcome {
        VmOutcome::Halt { .. } => context_pair.regular.accumulation_state,
        VmOutcome::Panic | VmOutcome::OutOfGas => context_pair.exceptional.accumulation_state,
    }
}
