//! `ψ′ ≺ (ED, ψ)` — spec.md §4.E, Eq 23/111-114: classifies each
//! verdict's report hash as good/bad/wonky by its positive-judgement
//! count, and folds culprits/faults into the offenders set. Grounded on
//! `original_source/internal/state/transitions.go`'s
//! `calculateNewJudgements`/`processVerdict`/`processOffender`.

use crate::block::DisputeExtrinsic;
use crate::config::Config;
use crate::entities::judgements::{add_unique_hash, Judgements};
use crate::error::StfError;

/// Eq 111/112/113: a verdict's positive-judgement count must land on
/// exactly one of the three defined tallies (`⌊2V/3⌋+1`, `0`, `⌊V/3⌋`);
/// anything else means disputes extrinsic validation upstream failed to
/// reject a malformed verdict, which is this crate's one fatal condition
/// (spec.md §9).
pub fn calculate_new_judgements(
    disputes: &DisputeExtrinsic,
    judgements: &Judgements,
    config: &Config,
) -> Result<Judgements, StfError> {
    let mut new_judgements = judgements.clone();

    let supermajority = config.validators_super_majority();
    let wonky_threshold = config.validators_wonky_threshold();

    for verdict in &disputes.verdicts {
        let positive = verdict.judgements.iter().filter(|j| j.is_valid).count() as u32;

        if positive == supermajority {
            add_unique_hash(&mut new_judgements.good_work_reports, verdict.report_hash);
        } else if positive == 0 {
            add_unique_hash(&mut new_judgements.bad_work_reports, verdict.report_hash);
        } else if positive == wonky_threshold {
            add_unique_hash(&mut new_judgements.wonky_work_reports, verdict.report_hash);
        } else {
            return Err(StfError::UnexpectedVerdictTally { positive });
        }
    }

    for culprit in &disputes.culprits {
        new_judgements
            .offending_validators
            .insert(culprit.validator_ed25519_public_key);
    }
    for fault in &disputes.faults {
        new_judgements
            .offending_validators
            .insert(fault.validator_ed25519_public_key);
    }

    Ok(new_judgements)
}
