//! Bridges the VM oracle's [`HostCallDispatch`] seam to this crate's
//! [`HostFunctionRegistry`]/[`HostFunctionContext`] pair, so a driver can
//! hand a [`VirtualMachine`] something to call back into without the
//! interpreter ever seeing `AccumulateContextPair` directly.

use crate::entities::service::ServiceId;
use crate::time::Timeslot;
use crate::vm::{HostCallDispatch, Memory};

use super::context::AccumulateContextPair;
use super::host_calls::{HostFunctionContext, HostFunctionRegistry, HostFunctionResult};

/// Records what the last dispatched host call did, since
/// [`HostCallDispatch::dispatch`] itself returns nothing — the driver
/// inspects this after [`VirtualMachine::invoke`] returns (or, for a
/// `Halt`-returning call like `Quit`, the dispatch loop inside a real
/// interpreter would stop calling back in immediately).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchOutcome {
    #[default]
    Continue,
    Panic,
    Halt,
}

pub struct AccumulateDispatch<'a> {
    registry: &'a HostFunctionRegistry,
    context: &'a mut AccumulateContextPair,
    self_id: ServiceId,
    now: Timeslot,
    expunge_period: u32,
    num_cores: u16,
    num_validators: u16,
    pub last_outcome: DispatchOutcome,
}

impl<'a> AccumulateDispatch<'a> {
    #[must_use]
    pub fn new(
        registry: &'a HostFunctionRegistry,
        context: &'a mut AccumulateContextPair,
        self_id: ServiceId,
        now: Timeslot,
        expunge_period: u32,
        num_cores: u16,
        num_validators: u16,
    ) -> Self {
        Self {
            registry,
            context,
            self_id,
            now,
            expunge_period,
            num_cores,
            num_validators,
            last_outcome: DispatchOutcome::Continue,
        }
    }
}

impl HostCallDispatch for AccumulateDispatch<'_> {
    fn dispatch(
        &mut self,
        function_id: u8,
        registers: &mut [u64],
        memory: &mut dyn Memory,
        gas_remaining: &mut u64,
    ) {
        let mut ctx = HostFunctionContext {
            registers,
            memory,
            gas_remaining,
            context: self.context,
            self_id: self.self_id,
            now: self.now,
            expunge_period: self.expunge_period,
            num_cores: self.num_cores,
            num_validators: self.num_validators,
        };
        self.last_outcome = match self.registry.dispatch(function_id, &mut ctx) {
            HostFunctionResult::Continue => DispatchOutcome::Continue,
            HostFunctionResult::Panic => DispatchOutcome::Panic,
            HostFunctionResult::Halt => DispatchOutcome::Halt,
        };
    }
}
