//! READ (Ω_R, function 3): storage read, on self or another service.
//! `A0`=service selector (`NONE`=self), `A1`=key offset, `A2`=key length,
//! `A3`=output offset, `A4`=from, `A5`=length. Grounded in the teacher's
//! `host_functions/general/read.rs`.

use crate::config::func::READ;
use crate::crypto::blake2b256;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct ReadHostFunction;

impl HostFunction for ReadHostFunction {
    fn function_id(&self) -> u8 {
        READ
    }
    fn name(&self) -> &'static str {
        "read"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let selector = context.registers[7];
        let key_offset = context.registers[8] as u32;
        let key_length = context.registers[9] as u32;
        let output_offset = context.registers[10] as u32;
        let from = context.registers[11];
        let length = context.registers[12];

        let Some(raw_key) = context.memory.read(key_offset, key_length) else {
            return HostFunctionResult::panic();
        };
        // `ServiceAccount::storage` is keyed by 32-byte hash (spec.md §3);
        // the raw key bytes the caller supplies are hashed to form it.
        let key = blake2b256(&raw_key);

        let target_id = if selector == codes::NONE {
            context.self_id
        } else {
            selector as u32
        };

        let Some(account) = context
            .context
            .regular
            .accumulation_state
            .service_state
            .get(&target_id)
        else {
            context.registers[7] = codes::NONE;
            return HostFunctionResult::continue_execution();
        };

        let Some(value) = account.storage.get(&key) else {
            context.registers[7] = codes::NONE;
            return HostFunctionResult::continue_execution();
        };

        let value_len = value.len() as u64;
        let f = from.min(value_len) as usize;
        let remaining = value_len - f as u64;
        let l = length.min(remaining) as usize;

        if l > 0 && !context.memory.write(output_offset, &value[f..f + l]) {
            return HostFunctionResult::panic();
        }

        context.registers[7] = value_len;
        HostFunctionResult::continue_execution()
    }
}
