//! FORGET (Ω_F, function 24): expunges a preimage request once its
//! retention period has elapsed, or advances it through the historical-
//! timeslot lifecycle otherwise. `A0`=hash offset, `A1`=preimage length.
//! Grounded in the teacher's `forget.rs`.

use crate::entities::service::PreimageKey;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};
use crate::config::func::FORGET;

pub struct ForgetHostFunction;

impl HostFunction for ForgetHostFunction {
    fn function_id(&self) -> u8 {
        FORGET
    }
    fn name(&self) -> &'static str {
        "forget"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let hash_offset = context.registers[7] as u32;
        let preimage_length = context.registers[8];

        let Some(hash_data) = context.memory.read(hash_offset, 32) else {
            return HostFunctionResult::panic();
        };
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hash_data);

        let self_id = context.self_id;
        let now = context.now.value();
        let expunge_period = context.expunge_period;

        let Some(account) = context
            .context
            .regular
            .accumulation_state
            .service_state
            .get_mut(&self_id)
        else {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        };

        let key = PreimageKey {
            hash,
            length: preimage_length as u32,
        };

        let Some(timeslots) = account.preimage_meta.get(&key).cloned() else {
            context.registers[7] = codes::HUH;
            return HostFunctionResult::continue_execution();
        };

        match timeslots.len() {
            0 => {
                account.preimage_meta.remove(&key);
                account.preimage_lookup.remove(&hash);
            }
            1 => {
                let mut updated = timeslots;
                updated.push(now);
                account.preimage_meta.insert(key, updated);
            }
            2 => {
                let y = timeslots[1];
                if y + expunge_period < now {
                    account.preimage_meta.remove(&key);
                    account.preimage_lookup.remove(&hash);
                } else {
                    crate::host_log_error!("[hostfn] forget HUH: retention period not yet elapsed ({} + {} >= {})", y, expunge_period, now);
                    context.registers[7] = codes::HUH;
                    return HostFunctionResult::continue_execution();
                }
            }
            3 => {
                let y = timeslots[1];
                if y + expunge_period < now {
                    account.preimage_meta.insert(key, vec![timeslots[2], now]);
                } else {
                    crate::host_log_error!("[hostfn] forget HUH: retention period not yet elapsed ({} + {} >= {})", y, expunge_period, now);
                    context.registers[7] = codes::HUH;
                    return HostFunctionResult::continue_execution();
                }
            }
            _ => {
                context.registers[7] = codes::HUH;
                return HostFunctionResult::continue_execution();
            }
        }

        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
