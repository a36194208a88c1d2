//! TRANSFER (Ω_T, function 20): queues a deferred transfer to another
//! service. `A0`=destination, `A1`=amount, `A2`=gas limit, `A3`=memo
//! offset (128 bytes). Return-code cascade `WHO → LOW → HIGH → CASH → OK`.
//!
//! Two corrections vs. the retrieval pack, per spec.md §9 (see
//! `DESIGN.md`): a memo-read fault returns `OOB` (`original_source`
//! returns `OK` here, a bug; the teacher's Rust panics instead — neither
//! is what this crate does), and a `HIGH` check (`gas_remaining <
//! gas_limit`) sits between `LOW` and `CASH`, present in `original_source`
//! but absent from every teacher Rust file (`transfer.rs`, `eject.rs`).

use crate::accumulate::context::DeferredTransfer;
use crate::config::func::TRANSFER;

use super::base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

pub struct TransferHostFunction;

impl HostFunction for TransferHostFunction {
    fn function_id(&self) -> u8 {
        TRANSFER
    }
    fn name(&self) -> &'static str {
        "transfer"
    }
    fn gas_cost(&self) -> u64 {
        10
    }
    fn execute(&self, context: &mut HostFunctionContext<'_>) -> HostFunctionResult {
        let receiver = context.registers[7];
        let amount = context.registers[8];
        let gas_limit = context.registers[9];
        let memo_offset = context.registers[10] as u32;

        let Some(memo_bytes) = context.memory.read(memo_offset, 128) else {
            context.registers[7] = codes::OOB;
            return HostFunctionResult::continue_execution();
        };
        let mut memo = [0u8; 128];
        memo.copy_from_slice(&memo_bytes);

        let receiver_id = receiver as u32;
        let state = &context.context.regular.accumulation_state.service_state;

        let Some(receiver_account) = state.get(&receiver_id) else {
            crate::host_log_error!("[hostfn] transfer WHO: no service {} in state", receiver_id);
            context.registers[7] = codes::WHO;
            return HostFunctionResult::continue_execution();
        };

        if gas_limit < receiver_account.gas_limit_on_transfer {
            context.registers[7] = codes::LOW;
            return HostFunctionResult::continue_execution();
        }
        if *context.gas_remaining < gas_limit {
            context.registers[7] = codes::HIGH;
            return HostFunctionResult::continue_execution();
        }

        let sender_id = context.self_id;
        let sender_account = state.get(&sender_id).expect("caller account exists");
        if sender_account.balance < amount {
            crate::host_log_error!("[hostfn] transfer CASH: insufficient balance for service {}", sender_id);
            context.registers[7] = codes::CASH;
            return HostFunctionResult::continue_execution();
        }
        let balance_after = sender_account.balance - amount;
        let threshold = sender_account.threshold_balance();
        if balance_after < threshold {
            crate::host_log_error!("[hostfn] transfer CASH: balance {} would drop below threshold {}", balance_after, threshold);
            context.registers[7] = codes::CASH;
            return HostFunctionResult::continue_execution();
        }

        context
            .context
            .regular
            .accumulation_state
            .service_state
            .get_mut(&sender_id)
            .unwrap()
            .balance = balance_after;

        context.context.regular.deferred_transfers.push(DeferredTransfer {
            sender: sender_id,
            receiver: receiver_id,
            balance: amount,
            memo,
            gas_limit,
        });

        *context.gas_remaining -= gas_limit;

        crate::host_log!("[hostfn] transfer OK: {} -> {} for {}", sender_id, receiver_id, amount);
        context.registers[7] = codes::OK;
        HostFunctionResult::continue_execution()
    }
}
