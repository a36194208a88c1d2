//! Block-to-block state-transition calculations (spec.md §4).

pub mod epoch;
pub mod guarantees;
pub mod intermediate;
pub mod judgements;
pub mod recent_blocks;
pub mod statistics;
pub mod stf;

pub use stf::{apply_block, TransitionOracles};
