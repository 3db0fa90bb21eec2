//! Milestone lifecycle.
//!
//! ```text
//! PENDING ──evidence──▶ UNDER_REVIEW ──quorum/approve──▶ APPROVED ──payout──▶ COMPLETED
//!                          │   ▲
//!      quorum/reject,      ▼   │ evidence (new round)
//!      deadline, admin   REJECTED
//! ```
//!
//! Evidence submission is the only transition driven by the owner; the rest
//! go through the coordinator or the payout agent.

use soroban_sdk::{Env, String, Vec};

use crate::campaign;
use crate::config::{extend_persistent, next_id};
use crate::storage_types::{
    CampaignId, DataKey, Error, EvidenceItem, EvidenceRecord, Milestone, MilestoneId,
    MilestoneStatus, PersistentKey,
};

pub fn create(
    e: &Env,
    campaign_id: CampaignId,
    amount: i128,
    expected_date: u64,
    title: String,
) -> Result<Milestone, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if title.is_empty() {
        return Err(Error::InvalidInput);
    }

    let mut campaign = campaign::load_active(e, campaign_id)?;
    campaign::commit(e, &mut campaign, amount)?;

    let id = next_id(e, &DataKey::NextMilestoneId)?;
    let milestone = Milestone {
        id,
        campaign_id,
        title,
        amount,
        expected_date,
        status: MilestoneStatus::Pending,
        description: String::from_str(e, ""),
        review_round: 0,
        review_started_at: 0,
        resolved_at: None,
        created_at: e.ledger().timestamp(),
    };
    save(e, &milestone);

    let list_key = PersistentKey::CampaignMilestones(campaign_id);
    let mut ids = list(e, campaign_id);
    ids.push_back(id);
    e.storage().persistent().set(&list_key, &ids);
    extend_persistent(e, &list_key);

    Ok(milestone)
}

pub fn load(e: &Env, milestone_id: MilestoneId) -> Result<Milestone, Error> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Milestone(milestone_id))
        .ok_or(Error::MilestoneNotFound)
}

pub fn save(e: &Env, milestone: &Milestone) {
    let key = PersistentKey::Milestone(milestone.id);
    e.storage().persistent().set(&key, milestone);
    extend_persistent(e, &key);
}

pub fn list(e: &Env, campaign_id: CampaignId) -> Vec<MilestoneId> {
    e.storage()
        .persistent()
        .get(&PersistentKey::CampaignMilestones(campaign_id))
        .unwrap_or(Vec::new(e))
}

pub fn evidence(e: &Env, milestone_id: MilestoneId) -> Vec<EvidenceRecord> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Evidence(milestone_id))
        .unwrap_or(Vec::new(e))
}

/// Appends the evidence and opens a new review round.
///
/// Allowed from PENDING, and from REJECTED for resubmission.
pub fn submit_evidence(
    e: &Env,
    milestone: &mut Milestone,
    items: &Vec<EvidenceItem>,
    description: String,
) -> Result<(), Error> {
    match milestone.status {
        MilestoneStatus::Pending | MilestoneStatus::Rejected => {}
        _ => return Err(Error::InvalidState),
    }
    if items.is_empty() || description.is_empty() {
        return Err(Error::InvalidInput);
    }
    for item in items.iter() {
        if item.uri.is_empty() {
            return Err(Error::InvalidInput);
        }
    }

    let round = milestone
        .review_round
        .checked_add(1)
        .ok_or(Error::ArithmeticOverflow)?;
    let now = e.ledger().timestamp();

    let key = PersistentKey::Evidence(milestone.id);
    let mut records = evidence(e, milestone.id);
    for item in items.iter() {
        records.push_back(EvidenceRecord {
            round,
            uri: item.uri,
            content_hash: item.content_hash,
            submitted_at: now,
        });
    }
    e.storage().persistent().set(&key, &records);
    extend_persistent(e, &key);

    milestone.status = MilestoneStatus::UnderReview;
    milestone.description = description;
    milestone.review_round = round;
    milestone.review_started_at = now;
    milestone.resolved_at = None;
    save(e, milestone);
    Ok(())
}

/// UNDER_REVIEW -> APPROVED or REJECTED.
pub fn resolve(e: &Env, milestone: &mut Milestone, approved: bool) -> Result<(), Error> {
    if milestone.status != MilestoneStatus::UnderReview {
        return Err(Error::InvalidState);
    }
    milestone.status = if approved {
        MilestoneStatus::Approved
    } else {
        MilestoneStatus::Rejected
    };
    milestone.resolved_at = Some(e.ledger().timestamp());
    save(e, milestone);
    Ok(())
}

/// APPROVED -> COMPLETED once the payout has settled. Terminal.
pub fn complete(e: &Env, milestone: &mut Milestone) -> Result<(), Error> {
    if milestone.status != MilestoneStatus::Approved {
        return Err(Error::InvalidState);
    }
    milestone.status = MilestoneStatus::Completed;
    save(e, milestone);
    Ok(())
}

/// Whether the review window of the current round has elapsed.
pub fn review_expired(e: &Env, milestone: &Milestone, review_period: u64) -> bool {
    if review_period == 0 {
        return false;
    }
    let deadline = milestone.review_started_at.saturating_add(review_period);
    e.ledger().timestamp() >= deadline
}
