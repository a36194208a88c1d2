//! ASSIGN (Ω_A, function 15): overwrites a core's pending-authorizers
//! queue. `A0`=core index, `A1`=queue-bytes offset (`Q=80` × 32-byte
//! hashes). Grounded on `original_source`'s `Assign` — no caller-
//! authorization gate (the teacher's `assign.rs` adds a per-core
//! `assigners` check with no counterpart in spec.md's table row or in the
//! original; see `DESIGN.md`). `AssignServiceId` in `PrivilegedServices`
//! names which service *may* call Assign at the accumulation-driver level,
//! not a per-core target this call itself records.

use crate::config::{func::ASSIGN, PENDING_AUTHORIZERS_QUEUE_SIZE};

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct AssignHostFunction;

impl HostFunction for AssignHostFunction {
    fn function_id(&self) -> u8 {
        ASSIGN
    }
    fn name(&self) -> &'static str {
        "assign"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let core_index = context.registers[7];
        let queue_offset = context.registers[8] as u32;

        if core_index >= u64::from(context.num_cores) {
            context.registers[7] = codes::CORE;
            return HostFunctionResult::continue_execution();
        }

        let byte_len = (PENDING_AUTHORIZERS_QUEUE_SIZE * 32) as u32;
        let Some(raw) = context.memory.read(queue_offset, byte_len) else {
            return HostFunctionResult::panic();
        };

        let queue: Vec<[u8; 32]> = raw
            .chunks_exact(32)
            .map(|c| c.try_into().unwrap())
            .collect();

        context.context.regular.accumulation_state.work_reports_queue[core_index as usize] = queue;

        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
