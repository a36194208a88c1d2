//! Deterministic block-to-block state-transition core and accumulation
//! host-call surface for a JAM-style chain.
//!
//! `transitions::apply_block` is the entry point: it folds a [`block::Block`]
//! into a prior [`state::State`], delegating to the per-equation
//! calculations in `transitions::*` and, for each guaranteed work report,
//! to the accumulation driver in `accumulate::*`. VM execution and the
//! handful of cryptographic primitives this crate doesn't implement
//! itself (ring commitments, ticket VRF, Merkle mountain ranges) are
//! dependency-injected oracle traits — see `vm::VirtualMachine`,
//! `transitions::epoch::SafroleOracle`,
//! `transitions::guarantees::CoreAssignmentOracle`, and
//! `transitions::recent_blocks::AccumulationMmrOracle`.

/// Trace-level logging for every host-call site, gated behind
/// `host_calls_logging`. Mirrors the teacher's `host_log!`/`eprintln!`
/// pair, rerouted through `tracing` rather than stderr so it composes
/// with whatever subscriber the embedder installs.
#[macro_export]
macro_rules! host_log {
    ($($t:tt)*) => {
        #[cfg(feature = "host_calls_logging")]
        tracing::trace!($($t)*);
    };
}

/// Logging for host-call error paths only (`HUH`, `FULL`, `OOB`, ...).
/// Fires under either `host_calls_logging` or `host_calls_errors_only`.
#[macro_export]
macro_rules! host_log_error {
    ($($t:tt)*) => {
        #[cfg(any(feature = "host_calls_logging", feature = "host_calls_errors_only"))]
        tracing::debug!($($t)*);
    };
}

pub mod accumulate;
pub mod block;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod entities;
pub mod error;
pub mod state;
pub mod time;
pub mod transitions;
pub mod vm;

pub use config::Config;
pub use error::{CodecError, StfError, StfResult};
pub use state::State;
pub use transitions::{apply_block, TransitionOracles};
