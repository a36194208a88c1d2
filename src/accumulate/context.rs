//! Accumulation context types (spec.md §3): the effectful bundle threaded
//! through a single service's accumulation, and the dual regular/
//! exceptional snapshot pair that gives `Checkpoint` its meaning.

use crate::config::PENDING_AUTHORIZERS_QUEUE_SIZE;
use crate::entities::privileges::PrivilegedServices;
use crate::entities::service::{ServiceId, ServiceState};
use crate::entities::validator::ValidatorKey;

/// `(Sender, Receiver, Balance, Memo, GasLimit)` — a transfer queued by
/// `Transfer` or `Quit`, delivered by the on-transfer driver (§4.J) after
/// every service has finished accumulating this block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferredTransfer {
    pub sender: ServiceId,
    pub receiver: ServiceId,
    pub balance: u64,
    pub memo: [u8; 128],
    pub gas_limit: u64,
}

/// The effectful state threaded through accumulation: service storage,
/// the validator set, each core's pending-authorizers ring, and the
/// privileged-services record. Mutated in place by host calls; cloned
/// wholesale to seed the exceptional snapshot at the start of accumulation
/// and on every `Checkpoint`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulationState {
    pub service_state: ServiceState,
    pub validator_keys: Vec<ValidatorKey>,
    pub work_reports_queue: Vec<Vec<[u8; 32]>>,
    pub privileged_services: PrivilegedServices,
}

impl AccumulationState {
    #[must_use]
    pub fn new(total_cores: usize) -> Self {
        Self {
            service_state: ServiceState::new(),
            validator_keys: Vec::new(),
            work_reports_queue: vec![vec![[0u8; 32]; PENDING_AUTHORIZERS_QUEUE_SIZE]; total_cores],
            privileged_services: PrivilegedServices::default(),
        }
    }
}

/// The per-service scratch context a single accumulation invocation runs
/// against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulateContext {
    /// The accumulating service's own id.
    pub service_id: ServiceId,
    /// Next candidate id `New` would assign, bumped on every successful
    /// creation.
    pub new_service_id: ServiceId,
    /// All service state visible to this invocation, self included — host
    /// calls mutate this, never the protocol's own live state directly.
    pub accumulation_state: AccumulationState,
    pub deferred_transfers: Vec<DeferredTransfer>,
    /// Set once `Checkpoint` has been called; the driver reads this to
    /// decide whether a later panic/out-of-gas falls back to the
    /// checkpointed exceptional context or to a wholly empty one.
    pub checkpointed: bool,
}

impl AccumulateContext {
    #[must_use]
    pub fn new(service_id: ServiceId, new_service_id: ServiceId, accumulation_state: AccumulationState) -> Self {
        Self {
            service_id,
            new_service_id,
            accumulation_state,
            deferred_transfers: Vec::new(),
            checkpointed: false,
        }
    }
}

/// `(RegularCtx, ExceptionalCtx)` — the regular context advances with
/// every host call; the exceptional context only advances on an explicit
/// `Checkpoint`, and is what survives a panic or out-of-gas (spec.md §9).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulateContextPair {
    pub regular: AccumulateContext,
    pub exceptional: AccumulateContext,
}

impl AccumulateContextPair {
    #[must_use]
    pub fn new(service_id: ServiceId, new_service_id: ServiceId, accumulation_state: AccumulationState) -> Self {
        let ctx = AccumulateContext::new(service_id, new_service_id, accumulation_state);
        Self {
            regular: ctx.clone(),
            exceptional: ctx,
        }
    }

    /// `Checkpoint`: copy the regular context into the exceptional slot.
    pub fn checkpoint(&mut self) {
        self.exceptional = self.regular.clone();
        self.exceptional.checkpointed = true;
    }
}
