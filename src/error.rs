//! Error types for the state-transition core.
//!
//! Two channels, per the design: host-call return codes live in registers
//! (see [`crate::accumulate::host_calls::base::codes`]) and are not
//! represented here. [`StfError`] covers the small set of conditions that
//! are fatal rather than silent-skips (Gray Paper: an impossible-by-
//! construction verdict tally), plus malformed-input conditions in the
//! canonical codec.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input: expected at least {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },
    #[error("natural number encoding out of range")]
    NaturalOutOfRange,
    #[error("fixed-length field had unexpected width: expected {expected}, got {got}")]
    WidthMismatch { expected: usize, got: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StfError {
    #[error("verdict had {positive} positive judgements, which matches none of the three defined tallies")]
    UnexpectedVerdictTally { positive: u32 },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type StfResult<T> = Result<T, StfError>;
