use soroban_sdk::{contracttype, Address, Env, Symbol};

use crate::storage_types::{CampaignId, MilestoneId, ResolutionCause, VoteId, VoteType};

#[contracttype]
#[derive(Clone)]
pub struct CampaignRegisteredEvent {
    pub campaign_id: CampaignId,
    pub owner: Address,
    pub goal: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct DonationRecordedEvent {
    pub campaign_id: CampaignId,
    pub donor: Address,
    pub amount: i128,
    pub contribution: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct MilestoneCreatedEvent {
    pub campaign_id: CampaignId,
    pub milestone_id: MilestoneId,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct EvidenceSubmittedEvent {
    pub campaign_id: CampaignId,
    pub milestone_id: MilestoneId,
    pub round: u32,
    pub items: u32,
}

#[contracttype]
#[derive(Clone)]
pub struct VoteCastEvent {
    pub milestone_id: MilestoneId,
    pub vote_id: VoteId,
    pub donor: Address,
    pub vote_type: VoteType,
}

#[contracttype]
#[derive(Clone)]
pub struct MilestoneApprovedEvent {
    pub campaign_id: CampaignId,
    pub milestone_id: MilestoneId,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct MilestoneRejectedEvent {
    pub campaign_id: CampaignId,
    pub milestone_id: MilestoneId,
    pub cause: ResolutionCause,
}

#[contracttype]
#[derive(Clone)]
pub struct PayoutConfirmedEvent {
    pub campaign_id: CampaignId,
    pub milestone_id: MilestoneId,
    pub amount: i128,
}

pub fn emit_campaign_registered(env: &Env, event: CampaignRegisteredEvent) {
    env.events().publish((Symbol::new(env, "campaign_registered"),), event);
}

pub fn emit_donation_recorded(env: &Env, event: DonationRecordedEvent) {
    env.events().publish(
        (Symbol::new(env, "donation_recorded"), event.campaign_id),
        event,
    );
}

pub fn emit_milestone_created(env: &Env, event: MilestoneCreatedEvent) {
    env.events().publish(
        (Symbol::new(env, "milestone_created"), event.campaign_id),
        event,
    );
}

pub fn emit_evidence_submitted(env: &Env, event: EvidenceSubmittedEvent) {
    env.events().publish(
        (Symbol::new(env, "evidence_submitted"), event.milestone_id),
        event,
    );
}

pub fn emit_vote_cast(env: &Env, event: VoteCastEvent) {
    env.events().publish((Symbol::new(env, "vote_cast"), event.milestone_id), event);
}

pub fn emit_milestone_approved(env: &Env, event: MilestoneApprovedEvent) {
    env.events().publish(
        (Symbol::new(env, "milestone_approved"), event.campaign_id),
        event,
    );
}

pub fn emit_milestone_rejected(env: &Env, event: MilestoneRejectedEvent) {
    env.events().publish(
        (Symbol::new(env, "milestone_rejected"), event.campaign_id),
        event,
    );
}

pub fn emit_payout_confirmed(env: &Env, event: PayoutConfirmedEvent) {
    env.events().publish(
        (Symbol::new(env, "payout_confirmed"), event.campaign_id),
        event,
    );
}
