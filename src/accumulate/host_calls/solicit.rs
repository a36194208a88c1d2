//! SOLICIT (Ω_S, function 23): requests a preimage be provided, or
//! extends an already-provided one's retention. `A0`=hash offset,
//! `A1`=preimage length. Grounded in the teacher's `solicit.rs`.

use crate::config::{func::SOLICIT, BASIC_MINIMUM_BALANCE, BYTE_DEPOSIT, ITEM_DEPOSIT};
use crate::entities::service::PreimageKey;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

const OCTETS_BASE_PER_REQUEST: u64 = 81;

pub struct SolicitHostFunction;

impl HostFunction for SolicitHostFunction {
    fn function_id(&self) -> u8 {
        SOLICIT
    }
    fn name(&self) -> &'static str {
        "solicit"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let hash_offset = context.registers[7] as u32;
        let preimage_length = context.registers[8];

        let Some(hash_data) = context.memory.read(hash_offset, 32) else {
            return HostFunctionResult::panic();
        };
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hash_data);

        let self_id = context.self_id;
        let now = context.now.value();
        let Some(account) = context
            .context
            .regular
            .accumulation_state
            .service_state
            .get_mut(&self_id)
        else {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        };

        let key = PreimageKey {
            hash,
            length: preimage_length as u32,
        };

        let (new_timeslots, is_new_request) = match account.preimage_meta.get(&key) {
            None => (Vec::new(), true),
            Some(existing) if existing.len() == 2 => {
                let mut nt = existing.clone();
                nt.push(now);
                (nt, false)
            }
            Some(_) => {
                context.registers[7] = codes::HUH;
                return HostFunctionResult::continue_execution();
            }
        };

        let (new_items, new_octets) = if is_new_request {
            let new_items = account.elective_items() + 2;
            let Some(octets_increment) = OCTETS_BASE_PER_REQUEST.checked_add(preimage_length) else {
                context.registers[7] = codes::FULL;
                return HostFunctionResult::continue_execution();
            };
            let Some(new_octets) = account.elective_octets().checked_add(octets_increment) else {
                context.registers[7] = codes::FULL;
                return HostFunctionResult::continue_execution();
            };
            (new_items, new_octets)
        } else {
            (account.elective_items(), account.elective_octets())
        };

        let item_deposit = ITEM_DEPOSIT.saturating_mul(new_items);
        let byte_deposit = BYTE_DEPOSIT.saturating_mul(new_octets);
        let total_deposit = BASIC_MINIMUM_BALANCE
            .checked_add(item_deposit)
            .and_then(|v| v.checked_add(byte_deposit));
        let Some(total_deposit) = total_deposit else {
            context.registers[7] = codes::FULL;
            return HostFunctionResult::continue_execution();
        };

        if total_deposit > account.balance {
            crate::host_log_error!(
                "[hostfn] solicit FULL: balance {} below required deposit {}",
                account.balance,
                total_deposit
            );
            context.registers[7] = codes::FULL;
            return HostFunctionResult::continue_execution();
        }

        account.preimage_meta.insert(key, new_timeslots);

        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
