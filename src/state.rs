//! Aggregate protocol state (spec.md §3). Bundles every Gray Paper
//! top-level state component this crate models; the state-transition
//! functions in `transitions/` each read a slice of this and return an
//! updated slice, composed by `transitions::stf::apply_block`.

use crate::accumulate::context::AccumulationState;
use crate::entities::authorizer::{CoreAuthorizersPool, PendingAuthorizersQueues};
use crate::entities::block_state::RecentBlocks;
use crate::entities::entropy::EntropyPool;
use crate::entities::judgements::Judgements;
use crate::entities::statistics::ValidatorStatisticsState;
use crate::entities::validator::ValidatorKey;
use crate::time::Timeslot;

/// `γ`: Safrole's sealing-key-selection state. Ring commitment
/// construction, sealing-key determination, and ticket verification are
/// oracle seams (spec.md §9) — this crate carries only the data those
/// oracles consume and produce, never recomputes them itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafroleState {
    pub next_validators: Vec<ValidatorKey>,
    pub ring_commitment: crate::crypto::Hash,
    /// Opaque sealing-key series for the epoch, as produced by the
    /// ticket/fallback VRF oracle; this crate never inspects its
    /// contents.
    pub sealing_key_series: Vec<u8>,
}

/// The complete protocol state threaded through block application.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    /// `τ`.
    pub timeslot: Timeslot,
    /// `β`.
    pub recent_blocks: RecentBlocks,
    /// `γ`.
    pub safrole: SafroleState,
    /// `η`.
    pub entropy: EntropyPool,
    /// `κ`: the current validator set.
    pub current_validators: Vec<ValidatorKey>,
    /// `λ`: the previous epoch's validator set, retained for guarantee
    /// credential verification against stale-rotation reports.
    pub archived_validators: Vec<ValidatorKey>,
    /// `ρ`, `φ`, `α` plus `δ`, `𝝌`: bundled in `AccumulationState` since
    /// accumulation host calls mutate all of them through one shadow
    /// context.
    pub accumulation: AccumulationState,
    pub core_assignments: crate::entities::assignment::CoreAssignments,
    pub pending_authorizers: PendingAuthorizersQueues,
    pub core_authorizers: Vec<CoreAuthorizersPool>,
    /// `ψ`.
    pub judgements: Judgements,
    /// `π`.
    pub statistics: ValidatorStatisticsState,
}

impl State {
    #[must_use]
    pub fn new(total_cores: usize) -> Self {
        Self {
            timeslot: Timeslot(0),
            recent_blocks: RecentBlocks::default(),
            safrole: SafroleState::default(),
            entropy: EntropyPool::default(),
            current_validators: Vec::new(),
            archived_validators: Vec::new(),
            accumulation: AccumulationState::new(total_cores),
            core_assignments: vec![crate::entities::assignment::Assignment::vacant(); total_cores],
            pending_authorizers: (0..total_cores)
                .map(|_| crate::entities::authorizer::empty_pending_queue())
                .collect(),
            core_authorizers: vec![Vec::new(); total_cores],
            judgements: Judgements::default(),
            statistics: ValidatorStatisticsState::default(),
        }
    }
}
