//! `PendingAuthorizersQueues` / `CoreAuthorizersPool` (spec.md §3).

use crate::config::{MAX_AUTHORIZERS_PER_CORE, PENDING_AUTHORIZERS_QUEUE_SIZE};
use crate::crypto::Hash;

/// Per-core ring of length `Q = 80`, indexed by `timeslot mod Q`.
pub type PendingAuthorizersQueue = Vec<Hash>;
pub type PendingAuthorizersQueues = Vec<PendingAuthorizersQueue>;

#[must_use]
pub fn empty_pending_queue() -> PendingAuthorizersQueue {
    vec![Hash::default(); PENDING_AUTHORIZERS_QUEUE_SIZE]
}

/// Per-core bounded FIFO of currently-eligible authorizers, `≤ O = 8`.
pub type CoreAuthorizersPool = Vec<Hash>;

/// Append `hash` to `pool`, dropping the oldest entry if already at the
/// `O`-entry cap (FIFO-when-saturated, per spec.md §3).
pub fn append_authorizer_limited(pool: &mut CoreAuthorizersPool, hash: Hash) {
    if pool.len() >= MAX_AUTHORIZERS_PER_CORE {
        pool.remove(0);
    }
    pool.push(hash);
}

/// Remove the first occurrence of `hash` from `pool`, preserving order.
pub fn remove_authorizer(pool: &mut CoreAuthorizersPool, hash: &Hash) {
    if let Some(index) = pool.iter().position(|h| h == hash) {
        pool.remove(index);
    }
}
