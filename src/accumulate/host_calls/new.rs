//! NEW (Ω_N, function 18): creates a service account. `A0`=code-hash
//! offset, `A1`=expected code length, `A2`=min accumulate gas, `A3`=min
//! on-transfer gas, `A4`=gratis, `A5`=desired id (unused — see below).
//! Grounded on the teacher's `new.rs` for the bump-and-check next-free-id
//! arithmetic and the `items=2, octets=81+expectedCodeLength` deposit
//! shape. The teacher's registrar-reserved-id branch is dropped: spec.md
//! §3's `PrivilegedServices` has no `RegistrarServiceId` field, so there
//! is nothing to gate that branch on (see `DESIGN.md`) — every new
//! service gets the bumped next-free id; `gratis` still requires the
//! caller to be the manager.

use crate::config::func::NEW;
use crate::entities::service::ServiceAccount;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

const CODE_HASH_LEN: u32 = 32;
const NEW_SERVICE_ITEMS: u64 = 2;
const OCTETS_BASE: u64 = 81;
const NEXT_FREE_ID_MODULUS: u64 = crate::config::NEXT_FREE_ID_MODULUS;
const MIN_PUBLIC_SERVICE_ID: u64 = crate::config::MIN_PUBLIC_SERVICE_ID;

pub struct NewHostFunction;

impl NewHostFunction {
    fn check_service_id(id: u64, service_state: &crate::entities::service::ServiceState) -> u64 {
        let mut candidate = id;
        loop {
            if !service_state.contains_key(&(candidate as u32)) {
                return candidate;
            }
            candidate = MIN_PUBLIC_SERVICE_ID
                + ((candidate - MIN_PUBLIC_SERVICE_ID + 1) % NEXT_FREE_ID_MODULUS);
        }
    }

    fn next_free_id(current_id: u64, service_state: &crate::entities::service::ServiceState) -> u64 {
        let candidate =
            MIN_PUBLIC_SERVICE_ID + ((current_id - MIN_PUBLIC_SERVICE_ID + 42) % NEXT_FREE_ID_MODULUS);
        Self::check_service_id(candidate, service_state)
    }

    fn minbalance(items: u64, octets: u64, gratis: u64) -> u64 {
        use crate::config::{BASIC_MINIMUM_BALANCE, BYTE_DEPOSIT, ITEM_DEPOSIT};
        BASIC_MINIMUM_BALANCE
            .saturating_add(ITEM_DEPOSIT.saturating_mul(items))
            .saturating_add(BYTE_DEPOSIT.saturating_mul(octets))
            .saturating_sub(gratis)
    }
}

impl HostFunction for NewHostFunction {
    fn function_id(&self) -> u8 {
        NEW
    }
    fn name(&self) -> &'static str {
        "new"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let code_hash_offset = context.registers[7] as u32;
        let expected_code_length = context.registers[8];
        let min_acc_gas = context.registers[9];
        let min_memo_gas = context.registers[10];
        let gratis = context.registers[11];

        let Some(code_hash_data) = context.memory.read(code_hash_offset, CODE_HASH_LEN) else {
            return HostFunctionResult::panic();
        };
        let mut code_hash = [0u8; 32];
        code_hash.copy_from_slice(&code_hash_data);

        if gratis != 0
            && context.self_id
                != context
                    .context
                    .regular
                    .accumulation_state
                    .privileged_services
                    .manager_service_id
        {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        }

        let new_service_octets = OCTETS_BASE + expected_code_length;
        let min_balance = Self::minbalance(NEW_SERVICE_ITEMS, new_service_octets, gratis);

        let service_state = &mut context.context.regular.accumulation_state.service_state;
        let Some(current_account) = service_state.get(&context.self_id) else {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        };

        if current_account.balance < min_balance {
            context.registers[7] = codes::CASH;
            return HostFunctionResult::continue_execution();
        }
        let balance_after = current_account.balance - min_balance;
        let current_threshold = current_account.threshold_balance();
        if balance_after < current_threshold {
            context.registers[7] = codes::CASH;
            return HostFunctionResult::continue_execution();
        }

        let new_service_id = context.context.regular.new_service_id;

        let mut new_account = ServiceAccount {
            code_hash,
            balance: min_balance,
            gas_limit_for_accumulator: min_acc_gas,
            gas_limit_on_transfer: min_memo_gas,
            ..Default::default()
        };
        new_account.preimage_meta.insert(
            crate::entities::service::PreimageKey {
                hash: code_hash,
                length: expected_code_length as u32,
            },
            Vec::new(),
        );

        service_state.get_mut(&context.self_id).unwrap().balance = balance_after;
        service_state.insert(new_service_id, new_account);
        context.context.regular.new_service_id =
            Self::next_free_id(u64::from(new_service_id), service_state) as u32;

        context.registers[7] = u64::from(new_service_id);
        HostFunctionResult::continue_execution()
    }
}
