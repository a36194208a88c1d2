//! `β′ ≺ (H, EG, β†, C)` — spec.md §4.F, Eq 18/83: appends the just-
//! authored block's state to the recent-blocks window, after folding this
//! block's accumulation results into the Merkle mountain range. Grounded
//! on `original_source/internal/state/transitions.go`'s
//! `calculateNewRecentBlocks`/`AppendToMMR`/`calculateAccumulationRoot`/
//! `calculateWorkReportHashes`.

use std::collections::BTreeMap;

use crate::block::{GuaranteesExtrinsic, Header};
use crate::crypto::Hash;
use crate::entities::block_state::{BlockState, RecentBlocks};
use crate::entities::service::ServiceId;

/// Merkle-mountain-range construction over accumulation results is an
/// oracle seam (spec.md §9); `original_source`'s own `AppendToMMR`/
/// `calculateAccumulationRoot` are themselves mock implementations
/// (`return crypto.Hash{}`), so there is no real algorithm to port.
pub trait AccumulationMmrOracle {
    fn append(&self, last_mmr: Hash, accumulation_root: Hash) -> Hash;
    fn accumulation_root(&self, accumulations: &BTreeMap<ServiceId, Hash>) -> Hash;
}

/// `β′`: appends a new [`BlockState`] built from `header` and this
/// block's guarantees/accumulation results, then truncates to the
/// `MAX_RECENT_BLOCKS`-entry window (`RecentBlocks::push` already
/// enforces the bound).
#[must_use]
pub fn calculate_new_recent_blocks(
    header: &Header,
    guarantees: &GuaranteesExtrinsic,
    intermediate_recent_blocks: &RecentBlocks,
    accumulations: &BTreeMap<ServiceId, Hash>,
    num_cores: usize,
    oracle: &dyn AccumulationMmrOracle,
) -> RecentBlocks {
    let accumulation_root = oracle.accumulation_root(accumulations);
    let last_mmr = intermediate_recent_blocks
        .last()
        .map_or(Hash::default(), |b| b.accumulation_result_mmr);
    let new_mmr = oracle.append(last_mmr, accumulation_root);

    let mut work_report_hashes = vec![Hash::default(); num_cores];
    for guarantee in guarantees {
        if let Some(slot) = work_report_hashes.get_mut(guarantee.work_report.core_index as usize) {
            *slot = guarantee.work_report.hash();
        }
    }

    let new_block_state = BlockState {
        header_hash: header.hash(),
        state_root: header.prior_state_root,
        accumulation_result_mmr: new_mmr,
        work_report_hashes,
    };

    let mut updated = intermediate_recent_blocks.clone();
    updated.push(new_block_state);
    updated
}
