//! QUIT (Ω_J, function 21): self-destructs the calling service, handing
//! its residual balance to another service (or discarding it to a burn
//! receiver). `A0`=receiver. Always halts the VM, regardless of branch —
//! this is the one host call that does, per spec.md §9. Self/burn deletes
//! the caller from state; WHO and LOW halt without deleting anything.
//!
//! Grounded on `original_source`'s `Quit`, NOT the teacher's `eject.rs`:
//! teacher's `EjectHostFunction` ejects a *different*, owned service
//! (ownership proven by a codehash-equals-ejector-id marker) and has no
//! counterpart in spec.md's host-call table at all — it's excluded from
//! this crate entirely (see `DESIGN.md`).

use crate::accumulate::context::DeferredTransfer;
use crate::config::{func::QUIT, BASIC_MINIMUM_BALANCE};

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct QuitHostFunction;

impl HostFunction for QuitHostFunction {
    fn function_id(&self) -> u8 {
        QUIT
    }
    fn name(&self) -> &'static str {
        "quit"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let receiver = context.registers[7];

        let self_id = context.self_id;
        let state = &mut context.context.regular.accumulation_state.service_state;
        let account = state.get(&self_id).expect("caller account exists");
        let threshold = account.threshold_balance();
        let amount = account
            .balance
            .saturating_sub(threshold)
            .saturating_add(BASIC_MINIMUM_BALANCE);

        let receiver_id = receiver as u32;
        let is_self_or_burn = receiver_id == self_id || receiver == u64::from(u32::MAX);

        if is_self_or_burn {
            state.remove(&self_id);
            context.registers[7] = codes::OK;
            return HostFunctionResult::halt();
        }

        let gas_limit_on_transfer = match state.get(&receiver_id) {
            Some(receiver_account) => receiver_account.gas_limit_on_transfer,
            None => {
                crate::host_log_error!("[hostfn] quit WHO: no service {} in state", receiver_id);
                context.registers[7] = codes::WHO;
                return HostFunctionResult::halt();
            }
        };
        let gas_limit = *context.gas_remaining;
        if gas_limit < gas_limit_on_transfer {
            context.registers[7] = codes::LOW;
            return HostFunctionResult::halt();
        }

        context.context.regular.deferred_transfers.push(DeferredTransfer {
            sender: self_id,
            receiver: receiver_id,
            balance: amount,
            memo: [0u8; 128],
            gas_limit,
        });

        crate::host_log!("[hostfn] quit OK: {} -> {} for {}", self_id, receiver_id, amount);
        context.registers[7] = codes::OK;
        HostFunctionResult::halt()
    }
}
