//! DESIGNATE (Ω_D, function 16): overwrites the staging validator set.
//! `A0`=validator-array offset (`V` × 336-byte `ValidatorKey`s). Keeps a
//! caller-authorization check (`self == designate_service_id`, `HUH`
//! otherwise) per the teacher's `designate.rs`, even though `original_source`'s
//! `Designate` has none — `PrivilegedServices.DesignateServiceId` would
//! otherwise gate nothing (see `DESIGN.md`).

use crate::config::func::DESIGNATE;
use crate::entities::validator::ValidatorKey;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct DesignateHostFunction;

impl HostFunction for DesignateHostFunction {
    fn function_id(&self) -> u8 {
        DESIGNATE
    }
    fn name(&self) -> &'static str {
        "designate"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        if context.self_id
            != context
                .context
                .regular
                .accumulation_state
                .privileged_services
                .designate_service_id
        {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        }

        let validators_offset = context.registers[7] as u32;
        let num_validators = u32::from(context.num_validators);
        let Some(raw) = context.memory.read(validators_offset, num_validators * 336) else {
            return HostFunctionResult::panic();
        };

        let mut validators = Vec::with_capacity(num_validators as usize);
        for chunk in raw.chunks_exact(336) {
            match ValidatorKey::from_bytes(chunk) {
                Ok(key) => validators.push(key),
                Err(_) => return HostFunctionResult::panic(),
            }
        }

        context.context.regular.accumulation_state.validator_keys = validators;

        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
