//! Vote recording and the quorum engine.
//!
//! Voting on a round is complete once every eligible donor has voted or the
//! votes cast reach `min_quorum`, whichever comes first. The approval
//! threshold is only looked at after completion, so an early lead never
//! decides a milestone.

use soroban_sdk::{Address, Env, String};

use crate::config::{extend_persistent, next_id};
use crate::ledger;
use crate::storage_types::{
    DataKey, Error, Milestone, MilestoneId, PersistentKey, Tally, Vote, VoteId, VoteStatistics,
    VoteType, VotingConfig, BASIS_POINTS, VOTE_WEIGHT,
};

/// Quorum and threshold arithmetic, kept free of storage.
pub struct QuorumRule;

impl QuorumRule {
    pub fn is_complete(cast: u32, eligible: u32, min_quorum: u32) -> bool {
        cast > 0 && (cast >= eligible || cast >= min_quorum)
    }

    /// `approve / cast >= threshold`, compared in integers so 3 of 5 meets 60%.
    pub fn is_approved(approve: u32, cast: u32, threshold_bps: u32) -> bool {
        if cast == 0 {
            return false;
        }
        approve as u64 * BASIS_POINTS as u64 >= threshold_bps as u64 * cast as u64
    }

    pub fn approval_ratio_bps(approve: u32, cast: u32) -> u32 {
        if cast == 0 {
            return 0;
        }
        (approve as u64 * BASIS_POINTS as u64 / cast as u64) as u32
    }
}

impl Tally {
    pub fn cast(&self) -> u32 {
        self.approve_count.saturating_add(self.reject_count)
    }
}

pub fn load(e: &Env, milestone: &Milestone) -> Tally {
    let stored: Option<Tally> = e
        .storage()
        .persistent()
        .get(&PersistentKey::Tally(milestone.id));
    match stored {
        Some(tally) if tally.round == milestone.review_round => tally,
        _ => Tally {
            round: milestone.review_round,
            approve_count: 0,
            reject_count: 0,
        },
    }
}

fn save(e: &Env, milestone_id: MilestoneId, tally: &Tally) {
    let key = PersistentKey::Tally(milestone_id);
    e.storage().persistent().set(&key, tally);
    extend_persistent(e, &key);
}

pub fn vote_of(e: &Env, milestone: &Milestone, donor: &Address) -> Option<Vote> {
    e.storage().persistent().get(&PersistentKey::Vote(
        milestone.id,
        milestone.review_round,
        donor.clone(),
    ))
}

/// Stores a donor's vote on the current round and bumps the tally.
///
/// The caller has already checked the milestone is under review.
pub fn record_vote(
    e: &Env,
    milestone: &Milestone,
    donor: &Address,
    vote_type: VoteType,
    comment: String,
) -> Result<Vote, Error> {
    if !ledger::is_eligible(e, milestone.campaign_id, donor) {
        return Err(Error::NotEligible);
    }

    let key = PersistentKey::Vote(milestone.id, milestone.review_round, donor.clone());
    if e.storage().persistent().has(&key) {
        return Err(Error::DuplicateVote);
    }

    let id: VoteId = next_id(e, &DataKey::NextVoteId)?;
    let vote = Vote {
        id,
        milestone_id: milestone.id,
        round: milestone.review_round,
        donor: donor.clone(),
        vote_type,
        weight: VOTE_WEIGHT,
        comment,
        cast_at: e.ledger().timestamp(),
    };
    e.storage().persistent().set(&key, &vote);
    extend_persistent(e, &key);

    let mut tally = load(e, milestone);
    match vote_type {
        VoteType::Approve => {
            tally.approve_count = tally
                .approve_count
                .checked_add(VOTE_WEIGHT)
                .ok_or(Error::ArithmeticOverflow)?
        }
        VoteType::Reject => {
            tally.reject_count = tally
                .reject_count
                .checked_add(VOTE_WEIGHT)
                .ok_or(Error::ArithmeticOverflow)?
        }
    }
    save(e, milestone.id, &tally);

    Ok(vote)
}

/// Snapshot built from stored state: the tally and the current eligible count.
pub fn statistics(e: &Env, milestone: &Milestone, config: &VotingConfig) -> VoteStatistics {
    let tally = load(e, milestone);
    let cast = tally.cast();
    let eligible = ledger::eligible_count(e, milestone.campaign_id);

    VoteStatistics {
        round: tally.round,
        approve_count: tally.approve_count,
        reject_count: tally.reject_count,
        cast,
        eligible,
        approval_ratio_bps: QuorumRule::approval_ratio_bps(tally.approve_count, cast),
        complete: QuorumRule::is_complete(cast, eligible, config.min_quorum),
    }
}
