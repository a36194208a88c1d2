//! Block, header, and extrinsic types (spec.md §3). Field shapes not
//! pinned down by spec.md's terse table are grounded in
//! `original_source/internal/block`'s use sites inside `transitions.go`
//! (`header.TimeSlotIndex`, `guarantee.WorkReport.CoreIndex`,
//! `verdict.Judgements`, `disputes.Culprits`/`.Faults`). The wire codec for
//! these types is out of scope (spec.md §1); `serde` derives are carried
//! for snapshotting and test fixtures, matching the rest of the ambient
//! stack rather than any bespoke wire format.

use serde::{Deserialize, Serialize};

use crate::crypto::Hash;
use crate::entities::service::ServiceId;
use crate::entities::validator::ValidatorKey;
use crate::entities::work_report::WorkReport;
use crate::time::Timeslot;

/// An unresolved ticket envelope from the tickets extrinsic (`ET`).
/// Ticket proof verification and sealing-key derivation are an oracle
/// seam (see `transitions::epoch::SafroleOracle`), so this crate only
/// carries the envelope, not its VRF contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub attempt: u8,
    pub proof: Vec<u8>,
}

pub type TicketExtrinsic = Vec<Ticket>;

/// One entry of the preimages extrinsic (`EP`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preimage {
    pub service_index: ServiceId,
    pub data: Vec<u8>,
}

pub type PreimageExtrinsic = Vec<Preimage>;

/// One validator's availability assurance for a single block (`EA`): a
/// per-core availability bitfield plus the attesting validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assurance {
    pub validator_index: u16,
    pub bitfield: Vec<u8>,
}

pub type AssurancesExtrinsic = Vec<Assurance>;

/// A validator's signature over a guaranteed work-report (§4.D).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub validator_index: u16,
    pub signature: [u8; 64],
}

/// One entry of the guarantees extrinsic (`EG`): a work-report plus the
/// timeslot it was guaranteed at and its ordered validator credentials
/// (ordering is itself an invariant, checked in
/// `transitions::guarantees::verify_guarantee_credentials`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guarantee {
    pub work_report: WorkReport,
    pub timeslot: Timeslot,
    pub credentials: Vec<Credential>,
}

pub type GuaranteesExtrinsic = Vec<Guarantee>;

/// A single validator's vote on a disputed work-report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub validator_index: u16,
    pub is_valid: bool,
}

/// One verdict: a disputed report hash plus the judgements cast on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub report_hash: Hash,
    pub judgements: Vec<Judgement>,
}

/// A validator found to have guaranteed a report the verdict found bad.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culprit {
    pub validator_ed25519_public_key: [u8; 32],
}

/// A validator found to have cast a judgement contradicting the verdict.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub validator_ed25519_public_key: [u8; 32],
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeExtrinsic {
    pub verdicts: Vec<Verdict>,
    pub culprits: Vec<Culprit>,
    pub faults: Vec<Fault>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extrinsics {
    pub tickets: TicketExtrinsic,
    pub preimages: PreimageExtrinsic,
    pub assurances: AssurancesExtrinsic,
    pub guarantees: GuaranteesExtrinsic,
    pub disputes: DisputeExtrinsic,
}

/// The next epoch's validator set, present only on the first block of a
/// new epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochMarker {
    pub entropy: Hash,
    pub next_entropy: Hash,
    pub next_validators: Vec<ValidatorKey>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub parent_hash: Hash,
    pub prior_state_root: Hash,
    pub extrinsic_hash: Hash,
    pub timeslot: Timeslot,
    /// Present only on the first timeslot of an epoch (§4.C).
    pub epoch_marker: Option<EpochMarker>,
    /// Present only on the first timeslot of an epoch using fallback
    /// (non-ticket) sealing-key selection.
    pub winners_marker: Option<Vec<Ticket>>,
    pub offenders_markers: Vec<[u8; 32]>,
    /// Opaque seal/VRF signature bytes; sealing verification is an
    /// oracle seam, not reproduced here (spec.md §9).
    pub seal: Vec<u8>,
}

impl Header {
    #[must_use]
    pub fn hash(&self) -> Hash {
        use crate::codec::{concat, encode_fixed_length};
        use crate::crypto::blake2b256;
        blake2b256(&concat(&[
            &self.parent_hash,
            &self.prior_state_root,
            &self.extrinsic_hash,
            &encode_fixed_length(u64::from(self.timeslot.value()), 4),
        ]))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub extrinsics: Extrinsics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_hash_changes_with_timeslot() {
        let mut header = Header::default();
        header.timeslot = Timeslot(1);
        let a = header.hash();
        header.timeslot = Timeslot(2);
        let b = header.hash();
        assert_ne!(a, b);
    }
}
