//! `WorkReport` (spec.md §3): the minimal fields the state-transition core
//! and accumulation driver need from a work report — which core produced
//! it, which authorizer approved it, which service it accumulates into,
//! and the output blob that becomes that service's accumulate operand.
//! Full work-report/work-package structure (segments, extrinsic hashes,
//! refine context) is a wire-format concern this crate's canonical codec
//! doesn't need to round-trip, only to hash.

use serde::{Deserialize, Serialize};

use crate::codec::{concat, encode_fixed_length};
use crate::crypto::{blake2b256, Hash};
use crate::entities::service::ServiceId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReport {
    pub core_index: u16,
    pub authorizer_hash: Hash,
    pub package_hash: Hash,
    pub service_id: ServiceId,
    pub gas_limit: u64,
    /// Accumulation operand bytes this report delivers to `service_id`.
    pub output: Vec<u8>,
}

impl WorkReport {
    /// Canonical hash used for dispute verdicts and guarantee-credential
    /// signatures.
    #[must_use]
    pub fn hash(&self) -> Hash {
        let core_index = encode_fixed_length(u64::from(self.core_index), 2);
        let service_id = encode_fixed_length(u64::from(self.service_id), 4);
        let gas_limit = encode_fixed_length(self.gas_limit, 8);
        let encoded = concat(&[
            &core_index,
            &self.authorizer_hash,
            &self.package_hash,
            &service_id,
            &gas_limit,
            &self.output,
        ]);
        blake2b256(&encoded)
    }
}
