//! UPGRADE (Ω_U, function 19): replaces the caller's own code hash and gas
//! limits. `A0`=code-hash offset, `A1`=min accumulate gas, `A2`=min
//! on-transfer gas. Grounded in the teacher's `upgrade.rs`.

use crate::config::func::UPGRADE;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct UpgradeHostFunction;

impl HostFunction for UpgradeHostFunction {
    fn function_id(&self) -> u8 {
        UPGRADE
    }
    fn name(&self) -> &'static str {
        "upgrade"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let code_hash_offset = context.registers[7] as u32;
        let min_acc_gas = context.registers[8];
        let min_memo_gas = context.registers[9];

        let Some(code_hash_data) = context.memory.read(code_hash_offset, 32) else {
            return HostFunctionResult::panic();
        };
        let mut code_hash = [0u8; 32];
        code_hash.copy_from_slice(&code_hash_data);

        let Some(account) = context
            .context
            .regular
            .accumulation_state
            .service_state
            .get_mut(&context.self_id)
        else {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        };

        account.code_hash = code_hash;
        account.gas_limit_for_accumulator = min_acc_gas;
        account.gas_limit_on_transfer = min_memo_gas;

        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
