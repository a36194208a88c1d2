//! `BlockState` / recent-blocks window (spec.md §3): `β`, bounded to
//! `H = MAX_RECENT_BLOCKS` entries.

use std::collections::VecDeque;

use crate::config::MAX_RECENT_BLOCKS;
use crate::crypto::Hash;

/// An entry in the recent-blocks window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockState {
    pub header_hash: Hash,
    pub state_root: Hash,
    pub accumulation_result_mmr: Hash,
    /// One hash per core, `Hash::default()` where the core produced no
    /// guaranteed work report in this block.
    pub work_report_hashes: Vec<Hash>,
}

/// Recent-blocks window: push new entries at the back, drop from the
/// front once beyond `MAX_RECENT_BLOCKS`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecentBlocks(pub VecDeque<BlockState>);

impl RecentBlocks {
    pub fn push(&mut self, entry: BlockState) {
        self.0.push_back(entry);
        while self.0.len() > MAX_RECENT_BLOCKS {
            self.0.pop_front();
        }
    }

    #[must_use]
    pub fn last(&self) -> Option<&BlockState> {
        self.0.back()
    }

    pub fn last_mut(&mut self) -> Option<&mut BlockState> {
        self.0.back_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: u8) -> BlockState {
        BlockState {
            header_hash: [tag; 32],
            state_root: [tag; 32],
            accumulation_result_mmr: [0; 32],
            work_report_hashes: vec![],
        }
    }

    #[test]
    fn window_is_bounded() {
        let mut window = RecentBlocks::default();
        for i in 0..(MAX_RECENT_BLOCKS as u8 + 5) {
            window.push(entry(i));
        }
        assert_eq!(window.0.len(), MAX_RECENT_BLOCKS);
        assert_eq!(window.last().unwrap().header_hash, [MAX_RECENT_BLOCKS as u8 + 4; 32]);
    }
}
