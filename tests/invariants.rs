//! Remaining spec.md §8 properties not covered by `scenarios.rs` /
//! `properties.rs`: `apply_block` determinism, intermediate-service-state
//! idempotence, and the authorizer-pool bound.

use proptest::prelude::*;

use jam_stf_core::accumulate::context::{AccumulateContextPair, AccumulationState};
use jam_stf_core::accumulate::driver::accumulate_service;
use jam_stf_core::accumulate::host_calls::{codes, HostFunctionContext, HostFunctionRegistry};
use jam_stf_core::block::{Block, Preimage};
use jam_stf_core::config::{func, Config, MAX_AUTHORIZERS_PER_CORE};
use jam_stf_core::crypto::Hash;
use jam_stf_core::entities::authorizer::{append_authorizer_limited, CoreAuthorizersPool};
use jam_stf_core::entities::service::ServiceAccount;
use jam_stf_core::entities::validator::ValidatorKey;
use jam_stf_core::state::State;
use jam_stf_core::time::Timeslot;
use jam_stf_core::transitions::epoch::SafroleOracle;
use jam_stf_core::transitions::guarantees::CoreAssignmentOracle;
use jam_stf_core::transitions::intermediate::calculate_intermediate_service_state;
use jam_stf_core::transitions::recent_blocks::AccumulationMmrOracle;
use jam_stf_core::transitions::stf::{apply_block, TransitionOracles};
use jam_stf_core::vm::{HostCallDispatch, Memory, NullVirtualMachine, VecMemory, VirtualMachine, VmOutcome};

struct NoopOracles;
impl SafroleOracle for NoopOracles {
    fn ring_commitment(&self, _: &[ValidatorKey]) -> Hash {
        Hash::default()
    }
    fn sealing_key_series(&self, _: &jam_stf_core::block::Header) -> Vec<u8> {
        Vec::new()
    }
    fn vrf_output(&self, _: &jam_stf_core::block::Header) -> Hash {
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
    fn accumulation_root(&self, _: &std::collections::BTreeMap<u32, Hash>) -> Hash {
        Hash::default()
    }
}

fn config() -> Config {
    Config {
        total_cores: 1,
        validator_count: 6,
        rotation_period: 10,
        work_report_timeout_period: 5,
        preimage_expunge_period: 100,
        epoch_length: 600,
    }
}

/// Two independent `apply_block` runs over the same `(state, block)` must
/// produce byte-identical posterior states (spec.md §8 property 1) — no
/// hidden clock, RNG, or iteration-order dependence.
#[test]
fn apply_block_is_deterministic() {
    let config = config();
    let state = State::new(config.total_cores as usize);
    let mut block = Block::default();
    block.header.timeslot = Timeslot(1);
    block.extrinsics.preimages.push(Preimage {
        service_index: 0,
        data: vec![1, 2, 3],
    });

    let oracles = TransitionOracles {
        vm: &NullVirtualMachine,
        safrole: &NoopOracles,
        core_assignment: &NoopOracles,
        mmr: &NoopOracles,
    };

    let first = apply_block(&state, &block, 0, &oracles, &config).unwrap();
    let second = apply_block(&state, &block, 0, &oracles, &config).unwrap();
    assert_eq!(first, second);
}

proptest! {
    /// Applying the same preimages extrinsic to `calculate_intermediate_service_state`
    /// twice in a row is a no-op on the second application: the first call
    /// already records the preimage and opens its metadata, so Eq 155's
    /// not-already-provided / no-existing-metadata guard rejects every
    /// entry the second time around (spec.md §8 property 2).
    #[test]
    fn intermediate_service_state_is_idempotent(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut service_state = jam_stf_core::entities::service::ServiceState::new();
        service_state.insert(0, ServiceAccount::default());

        let preimages = vec![Preimage { service_index: 0, data }];
        let once = calculate_intermediate_service_state(&preimages, &service_state, Timeslot(10));
        let twice = calculate_intermediate_service_state(&preimages, &once, Timeslot(20));

        prop_assert_eq!(once, twice);
    }
}

proptest! {
    /// `append_authorizer_limited` never lets a core's authorizer pool
    /// exceed `O` entries, across any sequence of appends (spec.md §8
    /// property 4).
    #[test]
    fn authorizer_pool_never_exceeds_bound(tags in prop::collection::vec(any::<u8>(), 0..50)) {
        let mut pool: CoreAuthorizersPool = Vec::new();
        for tag in tags {
            append_authorizer_limited(&mut pool, [tag; 32]);
            prop_assert!(pool.len() <= MAX_AUTHORIZERS_PER_CORE);
        }
    }
}

proptest! {
    /// Threshold invariant (spec.md §8 property 6): whenever `Transfer`
    /// returns `OK`, the sender's post-transfer balance is at or above its
    /// own threshold balance — the host call itself folds this check into
    /// the `CASH` branch, so a successful transfer can never violate it.
    #[test]
    fn successful_transfer_keeps_sender_above_threshold(balance in 0u64..2_000, amount in 0u64..2_000) {
        const SENDER: u32 = 1;
        const RECEIVER: u32 = 2;

        let mut state = AccumulationState::new(1);
        state.service_state.insert(SENDER, ServiceAccount { balance, ..ServiceAccount::default() });
        state.service_state.insert(RECEIVER, ServiceAccount::default());
        let mut context = AccumulateContextPair::new(SENDER, 0, state);

        let registry = HostFunctionRegistry::accumulate();
        let mut memory = VecMemory::with_capacity(128);
        let mut gas = 1_000u64;
        let mut registers = vec![0u64; 13];
        registers[7] = u64::from(RECEIVER);
        registers[8] = amount;
        registers[9] = 0;
        registers[10] = 0;

        let code = {
            let mut ctx = HostFunctionContext {
                registers: &mut registers,
                memory: &mut memory,
                gas_remaining: &mut gas,
                context: &mut context,
                self_id: SENDER,
                now: Timeslot(0),
                expunge_period: 100,
                num_cores: 1,
                num_validators: 1,
            };
            registry.dispatch(func::TRANSFER, &mut ctx);
            registers[7]
        };

        if code == codes::OK {
            let sender = &context.regular.accumulation_state.service_state[&SENDER];
            prop_assert!(sender.balance >= sender.threshold_balance());
        }
    }
}

/// A fixed VM script: `Checkpoint` (snapshotting the regular context),
/// then a successful `Solicit` that mutates the regular context further,
/// then a panic. The driver must fall back to the context as it stood at
/// the checkpoint, never observing the post-checkpoint `Solicit`.
struct CheckpointThenSolicitVm;

impl VirtualMachine for CheckpointThenSolicitVm {
    fn invoke(
        &self,
        _code: &[u8],
        _entry_point: u8,
        mut gas: u64,
        _args: &[u8],
        dispatch: &mut dyn HostCallDispatch,
    ) -> VmOutcome {
        let mut memory = VecMemory::with_capacity(32);
        memory.write(0, &[5u8; 32]);

        let mut checkpoint_registers = vec![0u64; 13];
        dispatch.dispatch(func::CHECKPOINT, &mut checkpoint_registers, &mut memory, &mut gas);

        let mut solicit_registers = vec![0u64; 13];
        solicit_registers[7] = 0;
        solicit_registers[8] = 0;
        dispatch.dispatch(func::SOLICIT, &mut solicit_registers, &mut memory, &mut gas);
        assert_eq!(solicit_registers[7], codes::OK, "solicit must succeed to make the test meaningful");

        VmOutcome::Panic
    }
}

#[test]
fn exceptional_context_ignores_post_checkpoint_mutation() {
    const SELF_ID: u32 = 7;

    let config = Config::default();
    let mut state = AccumulationState::new(1);
    let mut account = ServiceAccount {
        balance: 1_000,
        ..ServiceAccount::default()
    };
    account.code_hash = [9u8; 32];
    account.preimage_lookup.insert([9u8; 32], vec![1, 2, 3]);
    state.service_state.insert(SELF_ID, account);

    let outcome = accumulate_service(
        &config,
        &CheckpointThenSolicitVm,
        &state,
        SELF_ID,
        &[0u8; 32],
        Timeslot(0),
        1_000,
        &[],
    );

    assert!(outcome.result_hash.is_none());
    assert!(outcome.deferred_transfers.is_empty());
    let account_after = &outcome.accumulation_state.service_state[&SELF_ID];
    assert!(
        account_after.preimage_meta.is_empty(),
        "post-checkpoint solicit must not survive a subsequent panic"
    );
}
