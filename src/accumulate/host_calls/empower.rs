//! EMPOWER (Ω_B, function 14): overwrites `PrivilegedServices` wholesale.
//! `A0`=manager, `A1`=assign, `A2`=designate, `A3`=records offset,
//! `A4`=record count; each record is `(ServiceId: u32, Gas: u64)`, 12
//! bytes. Grounded on `original_source`'s `Empower` (the teacher's
//! `bless.rs` models a different, richer privileged-roles scheme —
//! manager/delegator/registrar/per-core-assigners/always-accessors — with
//! no counterpart in spec.md §3's 4-field `PrivilegedServices`; see
//! `DESIGN.md`).

use std::collections::BTreeMap;

use crate::config::{func::EMPOWER, MAX_SERVICE_ID};
use crate::entities::privileges::PrivilegedServices;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct EmpowerHostFunction;

impl HostFunction for EmpowerHostFunction {
    fn function_id(&self) -> u8 {
        EMPOWER
    }
    fn name(&self) -> &'static str {
        "empower"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let manager = context.registers[7];
        let assign = context.registers[8];
        let designate = context.registers[9];
        let records_offset = context.registers[10] as u32;
        let count = context.registers[11];

        if manager >= MAX_SERVICE_ID || assign >= MAX_SERVICE_ID || designate >= MAX_SERVICE_ID {
            context.registers[7] = codes::WHO;
            return HostFunctionResult::continue_execution();
        }

        let Some(raw) = context.memory.read(records_offset, (count * 12) as u32) else {
            return HostFunctionResult::panic();
        };

        let mut amount_of_gas_per_service_id = BTreeMap::new();
        for chunk in raw.chunks_exact(12) {
            let service_id = u32::from_le_bytes(chunk[0..4].try_into().unwrap());
            let gas = u64::from_le_bytes(chunk[4..12].try_into().unwrap());
            amount_of_gas_per_service_id.insert(service_id, gas);
        }

        context.context.regular.accumulation_state.privileged_services = PrivilegedServices {
            manager_service_id: manager as u32,
            assign_service_id: assign as u32,
            designate_service_id: designate as u32,
            amount_of_gas_per_service_id,
        };

        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
