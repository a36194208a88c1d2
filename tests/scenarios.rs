//! Integration-level scenario tests for the concrete examples spec.md §8
//! calls out by name: entropy rotation, dispute clearing, availability
//! threshold, guarantee signature ordering, the transfer return-code
//! cascade, and the four-way forget lifecycle.

use ed25519_dalek::{Signer, SigningKey};

use jam_stf_core::accumulate::context::{AccumulateContextPair, AccumulationState};
use jam_stf_core::accumulate::host_calls::{codes, HostFunctionContext, HostFunctionRegistry, HostFunctionResult};
use jam_stf_core::block::{Credential, Guarantee, GuaranteesExtrinsic, Header};
use jam_stf_core::config::{func, Config};
use jam_stf_core::crypto::blake2b256;
use jam_stf_core::entities::assignment::{Assignment, CoreAssignments};
use jam_stf_core::entities::entropy::EntropyPool;
use jam_stf_core::entities::service::{PreimageKey, ServiceAccount};
use jam_stf_core::entities::validator::ValidatorKey;
use jam_stf_core::entities::work_report::WorkReport;
use jam_stf_core::time::Timeslot;
use jam_stf_core::transitions::epoch::{calculate_new_entropy_pool, SafroleOracle};
use jam_stf_core::transitions::guarantees::{calculate_new_core_assignments, CoreAssignmentOracle};
use jam_stf_core::transitions::intermediate::{
    calculate_intermediate_core_assignments_from_availability,
    calculate_intermediate_core_assignments_from_disputes,
};
use jam_stf_core::vm::VecMemory;

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

struct FixedVrfOracle(jam_stf_core::crypto::Hash);
impl SafroleOracle for FixedVrfOracle {
    fn ring_commitment(&self, _: &[ValidatorKey]) -> jam_stf_core::crypto::Hash {
        [0; 32]
    }
    fn sealing_key_series(&self, _: &Header) -> Vec<u8> {
        Vec::new()
    }
    fn vrf_output(&self, _: &Header) -> jam_stf_core::crypto::Hash {
        self.0
    }
}

#[test]
fn entropy_rotates_on_epoch_boundary() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = config();
    let pool = EntropyPool([[0; 32], [1; 32], [2; 32], [3; 32]]);
    let vrf = [9u8; 32];
    let oracle = FixedVrfOracle(vrf);

    let mut header = Header::default();
    header.timeslot = Timeslot(600);

    let new_pool = calculate_new_entropy_pool(&header, &pool, &oracle, &config);

    let expected_current = blake2b256(&jam_stf_core::codec::concat(&[&pool.0[0], &vrf]));
    assert_eq!(new_pool.0, [expected_current, pool.0[0], pool.0[1], pool.0[2]]);
}

fn work_report(core_index: u16, tag: u8) -> WorkReport {
    WorkReport {
        core_index,
        authorizer_hash: [tag; 32],
        package_hash: [tag; 32],
        service_id: 0,
        gas_limit: 0,
        output: vec![],
    }
}

#[test]
fn dispute_below_supermajority_clears_assignment() {
    let config = config();
    let report = work_report(0, 7);
    let report_hash = report.hash();

    let assignments: CoreAssignments = vec![Assignment {
        work_report: Some(report),
        time: Timeslot(0),
    }];

    let verdict = jam_stf_core::block::Verdict {
        report_hash,
        judgements: vec![
            jam_stf_core::block::Judgement { validator_index: 0, is_valid: true },
            jam_stf_core::block::Judgement { validator_index: 1, is_valid: true },
        ],
    };
    let disputes = jam_stf_core::block::DisputeExtrinsic {
        verdicts: vec![verdict],
        culprits: vec![],
        faults: vec![],
    };

    let result = calculate_intermediate_core_assignments_from_disputes(&disputes, &assignments, &config);
    assert!(result[0].is_vacant());
}

fn bitfield_marking(core: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; core / 8 + 1];
    bytes[core / 8] |= 1 << (core % 8);
    bytes
}

#[test]
fn availability_threshold_is_exclusive() {
    let config = Config {
        total_cores: 1,
        validator_count: 6,
        ..config()
    };
    let threshold = config.availability_threshold();
    assert_eq!(threshold, 4);

    let assignment = Assignment {
        work_report: Some(work_report(0, 1)),
        time: Timeslot(0),
    };
    let assignments: CoreAssignments = vec![assignment.clone()];

    let at_threshold: Vec<_> = (0..threshold)
        .map(|v| jam_stf_core::block::Assurance {
            validator_index: v as u16,
            bitfield: bitfield_marking(0),
        })
        .collect();
    let cleared = calculate_intermediate_core_assignments_from_availability(&at_threshold, &assignments, &config);
    assert!(cleared[0].is_vacant());

    let above_threshold: Vec<_> = (0..=threshold)
        .map(|v| jam_stf_core::block::Assurance {
            validator_index: v as u16,
            bitfield: bitfield_marking(0),
        })
        .collect();
    let kept = calculate_intermediate_core_assignments_from_availability(&above_threshold, &assignments, &config);
    assert_eq!(kept[0], assignment);
}

struct AllowAllOracle;
impl CoreAssignmentOracle for AllowAllOracle {
    fn is_validator_assigned_to_core(&self, _: u16, _: u16) -> bool {
        true
    }
}

fn signed_credential(seed: u8, validator_index: u16, report_hash: &jam_stf_core::crypto::Hash) -> (ValidatorKey, Credential) {
    let signing_key = SigningKey::from_bytes(&[seed; 32]);
    let verifying_key = signing_key.verifying_key();

    let mut message = Vec::new();
    message.extend_from_slice(jam_stf_core::config::GUARANTEE_SIGNATURE_CONTEXT);
    message.extend_from_slice(report_hash);
    let signature = signing_key.sign(&message);

    let mut key = ValidatorKey::default();
    key.ed25519 = *verifying_key.as_bytes();

    (key, Credential { validator_index, signature: signature.to_bytes() })
}

#[test]
fn guarantee_assigns_with_ordered_credentials_not_swapped() {
    let config = config();
    let report = work_report(0, 3);
    let report_hash = report.hash();

    let (key0, credential0) = signed_credential(1, 0, &report_hash);
    let (key1, credential1) = signed_credential(2, 1, &report_hash);
    let validators = vec![key0, key1];

    let ordered = Guarantee {
        work_report: report.clone(),
        timeslot: Timeslot(0),
        credentials: vec![credential0.clone(), credential1.clone()],
    };
    let guarantees: GuaranteesExtrinsic = vec![ordered];
    let assignments: CoreAssignments = vec![Assignment::vacant()];

    let result = calculate_new_core_assignments(
        &guarantees,
        &assignments,
        &validators,
        &validators,
        Timeslot(1),
        &AllowAllOracle,
        &config,
    );
    assert_eq!(result[0].work_report.as_ref().unwrap().core_index, 0);

    let swapped = Guarantee {
        work_report: report,
        timeslot: Timeslot(0),
        credentials: vec![credential1, credential0],
    };
    let guarantees: GuaranteesExtrinsic = vec![swapped];
    let assignments: CoreAssignments = vec![Assignment::vacant()];
    let result = calculate_new_core_assignments(
        &guarantees,
        &assignments,
        &validators,
        &validators,
        Timeslot(1),
        &AllowAllOracle,
        &config,
    );
    assert!(result[0].is_vacant());
}

fn new_host_context<'a>(
    registers: &'a mut [u64],
    memory: &'a mut VecMemory,
    gas_remaining: &'a mut u64,
    context: &'a mut AccumulateContextPair,
    self_id: u32,
) -> HostFunctionContext<'a> {
    HostFunctionContext {
        registers,
        memory,
        gas_remaining,
        context,
        self_id,
        now: Timeslot(0),
        expunge_period: 100,
        num_cores: 1,
        num_validators: 1,
    }
}

#[test]
fn transfer_return_code_cascade() {
    const SENDER: u32 = 1;
    const RECEIVER: u32 = 2;

    let mut state = AccumulationState::new(1);
    state.service_state.insert(
        SENDER,
        ServiceAccount {
            balance: 1_000,
            ..ServiceAccount::default()
        },
    );
    let mut context = AccumulateContextPair::new(SENDER, 0, state);

    let registry = HostFunctionRegistry::accumulate();
    let mut memory = VecMemory::with_capacity(128);
    let mut gas = 1_000u64;
    let mut registers = vec![0u64; 13];
    registers[7] = u64::from(RECEIVER);
    registers[8] = 10;
    registers[9] = 5;
    registers[10] = 0;
    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SENDER);
        assert_eq!(registry.dispatch(func::TRANSFER, &mut ctx), HostFunctionResult::Continue);
    }
    assert_eq!(registers[7], codes::WHO);

    context
        .regular
        .accumulation_state
        .service_state
        .insert(RECEIVER, ServiceAccount { gas_limit_on_transfer: 50, ..ServiceAccount::default() });
    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SENDER);
        registry.dispatch(func::TRANSFER, &mut ctx);
    }
    assert_eq!(registers[7], codes::LOW);

    context
        .regular
        .accumulation_state
        .service_state
        .get_mut(&RECEIVER)
        .unwrap()
        .gas_limit_on_transfer = 5;
    gas = 12;
    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SENDER);
        registry.dispatch(func::TRANSFER, &mut ctx);
    }
    assert_eq!(registers[7], codes::HIGH);

    gas = 1_000;
    registers[8] = 10_000;
    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SENDER);
        registry.dispatch(func::TRANSFER, &mut ctx);
    }
    assert_eq!(registers[7], codes::CASH);

    registers[8] = 10;
    let transfers_before = context.regular.deferred_transfers.len();
    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SENDER);
        registry.dispatch(func::TRANSFER, &mut ctx);
    }
    assert_eq!(registers[7], codes::OK);
    assert_eq!(context.regular.deferred_transfers.len(), transfers_before + 1);
    assert_eq!(context.regular.accumulation_state.service_state[&SENDER].balance, 990);
}

#[test]
fn forget_four_way_lifecycle() {
    const SELF_ID: u32 = 9;
    let hash = [4u8; 32];
    let key = PreimageKey { hash, length: 0 };

    let mut state = AccumulationState::new(1);
    let mut account = ServiceAccount::default();
    account.preimage_meta.insert(key, vec![10, 20, 30]);
    state.service_state.insert(SELF_ID, account);
    let mut context = AccumulateContextPair::new(SELF_ID, 0, state);

    let registry = HostFunctionRegistry::accumulate();
    let mut memory = VecMemory::with_capacity(32);
    memory.write(0, &hash);
    let mut gas = 1_000u64;
    let mut registers = vec![0u64; 13];
    registers[7] = 0;
    registers[8] = 0;

    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SELF_ID);
        ctx.now = Timeslot(50);
        registry.dispatch(func::FORGET, &mut ctx);
    }
    assert_eq!(registers[7], codes::HUH);

    {
        let mut ctx = new_host_context(&mut registers, &mut memory, &mut gas, &mut context, SELF_ID);
        ctx.now = Timeslot(200);
        registry.dispatch(func::FORGET, &mut ctx);
    }
    assert_eq!(registers[7], codes::OK);
    assert_eq!(
        context.regular.accumulation_state.service_state[&SELF_ID].preimage_meta[&key],
        vec![30, 200]
    );
}
