//! LOOKUP (Ω_L, function 2): preimage lookup by hash, on self or another
//! service. `A0`=service selector (`NONE`=self), `A1`=hash offset,
//! `A2`=output offset, `A3`=from, `A4`=length. Grounded in the teacher's
//! `host_functions/general/lookup.rs`.

use crate::config::func::LOOKUP;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct LookupHostFunction;

impl HostFunction for LookupHostFunction {
    fn function_id(&self) -> u8 {
        LOOKUP
    }
    fn name(&self) -> &'static str {
        "lookup"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let selector = context.registers[7];
        let hash_offset = context.registers[8] as u32;
        let output_offset = context.registers[9] as u32;
        let from = context.registers[10];
        let length = context.registers[11];

        let Some(hash_bytes) = context.memory.read(hash_offset, 32) else {
            return HostFunctionResult::panic();
        };
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hash_bytes);

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

        let Some(preimage) = account.preimage_lookup.get(&hash) else {
            context.registers[7] = codes::NONE;
            return HostFunctionResult::continue_execution();
        };

        let preimage_len = preimage.len() as u64;
        let f = from.min(preimage_len) as usize;
        let remaining = preimage_len - f as u64;
        let l = length.min(remaining) as usize;

        if l > 0 && !context.memory.write(output_offset, &preimage[f..f + l]) {
            return HostFunctionResult::panic();
        }

        context.registers[7] = preimage_len;
        HostFunctionResult::continue_execution()
    }
}
