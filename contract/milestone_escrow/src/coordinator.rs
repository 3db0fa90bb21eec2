//! Fund release coordinator.
//!
//! Runs as the tail of every vote, inside the same invocation that recorded
//! it. Any error rolls the whole invocation back, so the milestone transition
//! and the escrow release are applied together or not at all.

use soroban_sdk::{log, Env, Vec};

use crate::config::extend_persistent;
use crate::escrow;
use crate::events;
use crate::milestone;
use crate::storage_types::{
    Error, Milestone, MilestoneId, MilestoneStatus, Outcome, PersistentKey, Resolution,
    ResolutionCause, TempKey, VoteStatistics, VotingConfig, TTL_LOCK,
};
use crate::tally::{self, QuorumRule};

/// Takes the per-milestone review lock.
///
/// Released explicitly on success. On failure the invocation is rolled back,
/// which drops the lock along with everything else.
pub fn acquire_lock(e: &Env, milestone_id: MilestoneId) -> Result<(), Error> {
    let key = TempKey::ReviewLock(milestone_id);
    if e.storage().temporary().has(&key) {
        log!(e, "review lock contention", milestone_id);
        return Err(Error::ConcurrencyConflict);
    }
    e.storage().temporary().set(&key, &true);
    e.storage().temporary().extend_ttl(&key, TTL_LOCK, TTL_LOCK);
    Ok(())
}

pub fn release_lock(e: &Env, milestone_id: MilestoneId) {
    e.storage().temporary().remove(&TempKey::ReviewLock(milestone_id));
}

/// Re-reads the tally and eligible count and finalizes the milestone if
/// voting on its current round is complete.
///
/// Returns the resulting status; UNDER_REVIEW means voting continues.
pub fn evaluate(
    e: &Env,
    milestone: &mut Milestone,
    config: &VotingConfig,
) -> Result<MilestoneStatus, Error> {
    let stats = tally::statistics(e, milestone, config);
    if !stats.complete {
        return Ok(milestone.status);
    }
    conclude(e, milestone, config, &stats, ResolutionCause::Quorum)
}

/// Resolves a review that no further vote is needed for.
///
/// A round that already meets the current completion rule (the config may
/// have changed since the last vote) resolves by quorum. Otherwise the review
/// window must have elapsed, and the votes cast so far decide.
pub fn resolve_expired(
    e: &Env,
    milestone: &mut Milestone,
    config: &VotingConfig,
) -> Result<MilestoneStatus, Error> {
    if milestone.status != MilestoneStatus::UnderReview {
        return Err(Error::InvalidState);
    }

    let stats = tally::statistics(e, milestone, config);
    if stats.complete {
        return conclude(e, milestone, config, &stats, ResolutionCause::Quorum);
    }
    if config.review_period == 0 {
        return Err(Error::InvalidState);
    }
    if !milestone::review_expired(e, milestone, config.review_period) {
        return Err(Error::VotingOpen);
    }
    conclude(e, milestone, config, &stats, ResolutionCause::Deadline)
}

fn conclude(
    e: &Env,
    milestone: &mut Milestone,
    config: &VotingConfig,
    stats: &VoteStatistics,
    cause: ResolutionCause,
) -> Result<MilestoneStatus, Error> {
    let approved = QuorumRule::is_approved(
        stats.approve_count,
        stats.cast,
        config.approval_threshold_bps,
    );
    finalize(
        e,
        milestone,
        approved,
        cause,
        stats.approve_count,
        stats.reject_count,
    )?;
    Ok(milestone.status)
}

/// Admin rejection of a milestone under review. No funds move.
pub fn override_reject(
    e: &Env,
    milestone: &mut Milestone,
    config: &VotingConfig,
) -> Result<(), Error> {
    let stats = tally::statistics(e, milestone, config);
    finalize(
        e,
        milestone,
        false,
        ResolutionCause::AdminOverride,
        stats.approve_count,
        stats.reject_count,
    )
}

fn finalize(
    e: &Env,
    milestone: &mut Milestone,
    approved: bool,
    cause: ResolutionCause,
    approve_count: u32,
    reject_count: u32,
) -> Result<(), Error> {
    milestone::resolve(e, milestone, approved)?;
    if approved {
        escrow::release(e, milestone.campaign_id, milestone.amount)?;
    }

    record_resolution(
        e,
        milestone,
        Resolution {
            round: milestone.review_round,
            outcome: if approved {
                Outcome::Approved
            } else {
                Outcome::Rejected
            },
            cause,
            approve_count,
            reject_count,
            resolved_at: e.ledger().timestamp(),
        },
    );

    if approved {
        events::emit_milestone_approved(
            e,
            events::MilestoneApprovedEvent {
                campaign_id: milestone.campaign_id,
                milestone_id: milestone.id,
                amount: milestone.amount,
            },
        );
    } else {
        events::emit_milestone_rejected(
            e,
            events::MilestoneRejectedEvent {
                campaign_id: milestone.campaign_id,
                milestone_id: milestone.id,
                cause,
            },
        );
    }
    Ok(())
}

pub fn resolutions(e: &Env, milestone_id: MilestoneId) -> Vec<Resolution> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Resolutions(milestone_id))
        .unwrap_or(Vec::new(e))
}

fn record_resolution(e: &Env, milestone: &Milestone, resolution: Resolution) {
    let key = PersistentKey::Resolutions(milestone.id);
    let mut history = resolutions(e, milestone.id);
    history.push_back(resolution);
    e.storage().persistent().set(&key, &history);
    extend_persistent(e, &key);
}
