//! CHECKPOINT (Ω_C, function 17): snapshots the regular context into the
//! exceptional slot, then writes `gas_remaining` split low32/high32 into
//! `A0`/`A1` — per spec.md §6 and `original_source`'s `Checkpoint`, not
//! the teacher's single-register write. Deliberately never sets a
//! distinguishable `OK` (spec.md §9): the gas value is the only signal.

use crate::config::func::CHECKPOINT;

use super::base::{HostFunction, HostFunctionContext, HostFunctionResult};

pub struct CheckpointHostFunction;

impl HostFunction for CheckpointHostFunction {
    fn function_id(&self) -> u8 {
        CHECKPOINT
    }
    fn name(&self) -> &'static str {
        "checkpoint"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        context.context.checkpoint();

        let gas = *context.gas_remaining;
        context.registers[7] = gas & 0xFFFF_FFFF;
        context.registers[8] = gas >> 32;
        HostFunctionResult::continue_execution()
    }
}
