//! The fifteen in-scope accumulation host calls and their registry.
//! Grounded in the teacher's `host_functions/accumulate/mod.rs` and
//! `host_functions/general/mod.rs`, which build a function-id-indexed
//! registry and fall back to `WHAT` on an unrecognized call.

mod assign;
mod base;
mod checkpoint;
mod designate;
mod empower;
mod forget;
mod gas;
mod info;
mod lookup;
mod new;
mod quit;
mod read;
mod solicit;
mod transfer;
mod upgrade;
mod write;

pub use base::{codes, HostFunction, HostFunctionContext, HostFunctionResult};

use crate::config::gas_cost;

/// Ambient calls available to both the accumulation driver (Ψ_A) and the
/// on-transfer driver (Ψ_T).
fn ambient_functions() -> Vec<Box<dyn HostFunction>> {
    vec![
        Box::new(gas::GasHostFunction),
        Box::new(lookup::LookupHostFunction),
        Box::new(read::ReadHostFunction),
        Box::new(write::WriteHostFunction),
        Box::new(info::InfoHostFunction),
    ]
}

/// Calls only the accumulation driver may dispatch.
fn accumulate_only_functions() -> Vec<Box<dyn HostFunction>> {
    vec![
        Box::new(empower::EmpowerHostFunction),
        Box::new(assign::AssignHostFunction),
        Box::new(designate::DesignateHostFunction),
        Box::new(checkpoint::CheckpointHostFunction),
        Box::new(new::NewHostFunction),
        Box::new(upgrade::UpgradeHostFunction),
        Box::new(transfer::TransferHostFunction),
        Box::new(quit::QuitHostFunction),
        Box::new(solicit::SolicitHostFunction),
        Box::new(forget::ForgetHostFunction),
    ]
}

/// A function-id-indexed registry. Looking up an unregistered id is the
/// `WHAT` case: the caller charges `gas_cost::UNKNOWN_CALL` and writes
/// `codes::WHAT` without invoking anything.
pub struct HostFunctionRegistry {
    functions: Vec<Box<dyn HostFunction>>,
}

impl HostFunctionRegistry {
    /// The full accumulation-driver (Ψ_A) surface: ambient calls plus the
    /// ten accumulate-only calls.
    #[must_use]
    pub fn accumulate() -> Self {
        let mut functions = ambient_functions();
        functions.extend(accumulate_only_functions());
        Self { functions }
    }

    /// The restricted on-transfer-driver (Ψ_T) surface: ambient calls
    /// only. Every accumulate-only function id is `WHAT` here.
    #[must_use]
    pub fn on_transfer() -> Self {
        Self {
            functions: ambient_functions(),
        }
    }

    #[must_use]
    pub fn lookup(&self, function_id: u8) -> Option<&dyn HostFunction> {
        self.functions
            .iter()
            .find(|f| f.function_id() == function_id)
            .map(std::convert::AsRef::as_ref)
    }

    /// Dispatches `function_id`, charging its gas cost first. Unregistered
    /// ids charge `gas_cost::UNKNOWN_CALL` and return `WHAT` without
    /// running anything; insufficient gas charges nothing further and
    /// returns `HostFunctionResult::Panic` for the caller to turn into an
    /// out-of-gas VM halt.
    pub fn dispatch(
        &self,
        function_id: u8,
        context: &mut HostFunctionContext<'_>,
    ) -> HostFunctionResult {
        let Some(function) = self.lookup(function_id) else {
            tracing::debug!(function_id, "unknown host call");
            if *context.gas_remaining < gas_cost::UNKNOWN_CALL {
                return HostFunctionResult::panic();
            }
            *context.gas_remaining -= gas_cost::UNKNOWN_CALL;
            context.registers[7] = codes::WHAT;
            return HostFunctionResult::continue_execution();
        };

        let cost = function.gas_cost();
        if *context.gas_remaining < cost {
            return HostFunctionResult::panic();
        }
        *context.gas_remaining -= cost;
        function.execute(context)
    }
}
