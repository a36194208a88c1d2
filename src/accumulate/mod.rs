//! Accumulation (spec.md §4): the per-service context types, the host-call
//! registry/dispatch, and the two drivers (Ψ_A accumulate, Ψ_T on-transfer)
//! that run a service's code against them.

pub mod context;
pub mod dispatch;
pub mod driver;
pub mod host_calls;
pub mod transfer_driver;

pub use context::{AccumulateContext, AccumulateContextPair, AccumulationState, DeferredTransfer};
pub use driver::{accumulate_service, AccumulateOutcome};
pub use transfer_driver::run_on_transfer;
