//! WRITE (Ω_W, function 4): storage write/delete on the caller's own
//! account, gated by the resulting threshold balance. `A0`=key offset,
//! `A1`=key length, `A2`=value offset, `A3`=value length (0 = delete).
//! Grounded in the teacher's `host_functions/general/write.rs`.

use crate::config::func::WRITE;
use crate::crypto::blake2b256;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct WriteHostFunction;

impl HostFunction for WriteHostFunction {
    fn function_id(&self) -> u8 {
        WRITE
    }
    fn name(&self) -> &'static str {
        "write"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let key_offset = context.registers[7] as u32;
        let key_length = context.registers[8] as u32;
        let value_offset = context.registers[9] as u32;
        let value_length = context.registers[10] as u32;

        let Some(raw_key) = context.memory.read(key_offset, key_length) else {
            return HostFunctionResult::panic();
        };
        let key = blake2b256(&raw_key);

        let Some(account) = context
            .context
            .regular
            .accumulation_state
            .service_state
            .get_mut(&context.self_id)
        else {
            return HostFunctionResult::panic();
        };

        if value_length == 0 {
            let previous = account.storage.remove(&key);
            let previous_length = previous.map(|v| v.len() as u64);
            if account.balance < account.threshold_balance() {
                // Deleting never raises the threshold; this branch is
                // unreachable for a well-formed account but we mirror the
                // teacher's explicit re-check rather than assume it away.
                context.registers[7] = codes::FULL;
                return HostFunctionResult::continue_execution();
            }
            context.registers[7] = previous_length.unwrap_or(codes::NONE);
            return HostFunctionResult::continue_execution();
        }

        let Some(value) = context.memory.read(value_offset, value_length) else {
            return HostFunctionResult::panic();
        };

        let previous_length = account.storage.get(&key).map(|v| v.len() as u64);
        let candidate_previous = account.storage.insert(key, value);
        if account.balance < account.threshold_balance() {
            // Roll back: insufficient balance to cover the new footprint.
            match candidate_previous {
                Some(previous) => {
                    account.storage.insert(key, previous);
                }
                None => {
                    account.storage.remove(&key);
                }
            }
            context.registers[7] = codes::FULL;
            return HostFunctionResult::continue_execution();
        }

        context.registers[7] = previous_length.unwrap_or(codes::NONE);
        HostFunctionResult::continue_execution()
    }
}
