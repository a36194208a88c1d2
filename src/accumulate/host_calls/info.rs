//! INFO (Ω_I, function 5): encodes a 96-byte summary of a service
//! account. `A0`=service selector (`NONE`=self), `A1`=output offset,
//! `A2`=from, `A3`=length. Grounded in the teacher's
//! `host_functions/general/info.rs`, field set trimmed to this crate's
//! `ServiceAccount` (no `gratis`/`created`/`lastacc`/`parent` bookkeeping —
//! the trailing 20 bytes are reserved/zero).

use crate::config::func::INFO;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

const INFO_LEN: usize = 96;

pub struct InfoHostFunction;

impl InfoHostFunction {
    fn encode(account: &crate::entities::service::ServiceAccount) -> [u8; INFO_LEN] {
        let mut info = [0u8; INFO_LEN];
        info[0..32].copy_from_slice(&account.code_hash);
        info[32..40].copy_from_slice(&account.balance.to_le_bytes());
        info[40..48].copy_from_slice(&account.threshold_balance().to_le_bytes());
        info[48..56].copy_from_slice(&account.gas_limit_for_accumulator.to_le_bytes());
        info[56..64].copy_from_slice(&account.gas_limit_on_transfer.to_le_bytes());
        info[64..72].copy_from_slice(&account.elective_octets().to_le_bytes());
        info[72..76].copy_from_slice(&(account.elective_items() as u32).to_le_bytes());
        info
    }
}

impl HostFunction for InfoHostFunction {
    fn function_id(&self) -> u8 {
        INFO
    }
    fn name(&self) -> &'static str {
        "info"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let selector = context.registers[7];
        let output_offset = context.registers[8] as u32;
        let from = context.registers[9];
        let length = context.registers[10];

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

        let info = Self::encode(account);
        let f = from.min(INFO_LEN as u64) as usize;
        let remaining = (INFO_LEN - f) as u64;
        let l = length.min(remaining) as usize;

        if l > 0 && !context.memory.write(output_offset, &info[f..f + l]) {
            return HostFunctionResult::panic();
        }

        context.registers[7] = INFO_LEN as u64;
        HostFunctionResult::continue_execution()
    }
}
