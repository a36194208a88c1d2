//! Ψ_A, the accumulation driver (spec.md §4): invokes a single service's
//! code at the accumulate entry point, classifies the result as regular
//! or exceptional, and folds the outcome back into protocol state.
//! Grounded in the teacher's accumulation driver for the code-absent
//! short-circuit and the regular/exceptional context split; the
//! next-free-id seeding mirrors `new.rs`'s bump arithmetic.

use crate::codec::{concat, encode_fixed_length};
use crate::config::{Config, ACCUMULATE_ENTRY_POINT, MIN_PUBLIC_SERVICE_ID, NEXT_FREE_ID_MODULUS};
use crate::crypto::{blake2b256, Hash};
use crate::entities::service::{ServiceId, ServiceState};
use crate::time::Timeslot;
use crate::vm::{VirtualMachine, VmOutcome};

use super::context::{AccumulateContextPair, AccumulationState, DeferredTransfer};
use super::dispatch::{AccumulateDispatch, DispatchOutcome};
use super::host_calls::HostFunctionRegistry;

/// What a single service's accumulation produced.
pub struct AccumulateOutcome {
    pub accumulation_state: AccumulationState,
    pub deferred_transfers: Vec<DeferredTransfer>,
    pub gas_used: u64,
    /// Hash of the VM's output blob, folded into the accumulation-result
    /// MMR; absent when the code blob was missing or the run was
    /// exceptional.
    pub result_hash: Option<Hash>,
}

fn bump_candidate(id: u64) -> u64 {
    MIN_PUBLIC_SERVICE_ID + ((id - MIN_PUBLIC_SERVICE_ID + 42) % NEXT_FREE_ID_MODULUS)
}

/// `hash(canonical(serviceIndex) ‖ canonical(η[0]) ‖ canonical(τ′))`, read
/// as a little-endian `u32` — the candidate seed the bump/check loop below
/// starts from.
fn hash_candidate_seed(service_id: ServiceId, entropy_0: &Hash, now: Timeslot) -> u64 {
    let seed_bytes = concat(&[
        &encode_fixed_length(u64::from(service_id), 4),
        entropy_0,
        &encode_fixed_length(u64::from(now.0), 4),
    ]);
    let digest = blake2b256(&seed_bytes);
    let mut low = [0u8; 4];
    low.copy_from_slice(&digest[..4]);
    u64::from(u32::from_le_bytes(low))
}

fn seed_new_service_id(service_id: ServiceId, entropy_0: &Hash, now: Timeslot, service_state: &ServiceState) -> ServiceId {
    let seed = hash_candidate_seed(service_id, entropy_0, now);
    let mut candidate = bump_candidate(seed.max(MIN_PUBLIC_SERVICE_ID));
    while service_state.contains_key(&(candidate as u32)) {
        candidate = bump_candidate(candidate);
    }
    candidate as u32
}

/// Runs one service's accumulation. `operands` is the already-encoded
/// work-report-output payload this service receives as VM arguments.
/// `entropy_0` is `η[0]`, the entropy pool's current-entropy hash prior to
/// this block — threaded in only to seed the new-service-id candidate.
#[must_use]
pub fn accumulate_service(
    config: &Config,
    vm: &dyn VirtualMachine,
    accumulation_state: &AccumulationState,
    service_id: ServiceId,
    entropy_0: &Hash,
    now: Timeslot,
    gas: u64,
    operands: &[u8],
) -> AccumulateOutcome {
    let no_op = |gas_used: u64| AccumulateOutcome {
        accumulation_state: accumulation_state.clone(),
        deferred_transfers: Vec::new(),
        gas_used,
        result_hash: None,
    };

    let Some(account) = accumulation_state.service_state.get(&service_id) else {
        return no_op(0);
    };
    let Some(code) = account.preimage_lookup.get(&account.code_hash).cloned() else {
        return no_op(0);
    };

    let seeded_new_service_id = seed_new_service_id(service_id, entropy_0, now, &accumulation_state.service_state);
    let mut context_pair =
        AccumulateContextPair::new(service_id, seeded_new_service_id, accumulation_state.clone());

    let registry = HostFunctionRegistry::accumulate();
    let mut dispatch = AccumulateDispatch::new(
        &registry,
        &mut context_pair,
        service_id,
        now,
        config.preimage_expunge_period,
        config.total_cores,
        config.validator_count,
    );

    let outcome = vm.invoke(&code, ACCUMULATE_ENTRY_POINT, gas, operands, &mut dispatch);
    let last_dispatch_outcome = dispatch.last_outcome;

    match outcome {
        VmOutcome::Halt { output, gas_used } => {
            // Quit always halts the VM regardless of its own return code
            // (spec.md §9); the regular context already reflects its
            // self-removal and any queued transfer, same as a normal halt.
            let _ = last_dispatch_outcome == DispatchOutcome::Halt;
            AccumulateOutcome {
                accumulation_state: context_pair.regular.accumulation_state,
                deferred_transfers: context_pair.regular.deferred_transfers,
                gas_used,
                result_hash: Some(blake2b256(&output)),
            }
        }
        VmOutcome::Panic => {
            let fallback = context_pair.exceptional;
            AccumulateOutcome {
                accumulation_state: fallback.accumulation_state,
                deferred_transfers: fallback.deferred_transfers,
                gas_used: 0,
                result_hash: None,
            }
        }
        VmOutcome::OutOfGas => {
            let fallback = context_pair.exceptional;
            AccumulateOutcome {
                accumulation_state: fallback.accumulation_state,
                deferred_transfers: fallback.deferred_transfers,
                gas_used: gas,
                result_hash: None,
            }
        }
    }
}
