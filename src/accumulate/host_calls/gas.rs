//! GAS (Ω_G, function 0): writes remaining gas into A0. Never fails.

use crate::config::func::GAS;

use super::base::{HostFunction, HostFunctionContext, HostFunctionResult};

pub struct GasHostFunction;

impl HostFunction for GasHostFunction {
    fn function_id(&self) -> u8 {
        GAS
    }
    fn name(&self) -> &'static str {
        "gas"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        context.registers[7] = *context.gas_remaining;
        HostFunctionResult::continue_execution()
    }
}
