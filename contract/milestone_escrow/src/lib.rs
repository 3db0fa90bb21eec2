#![no_std]


mod campaign;
mod config;
mod coordinator;
mod escrow;
mod events;
mod ledger;
mod milestone;
mod storage_types;
mod tally;

pub use storage_types::{
    Balances, Campaign, CampaignId, CampaignStatus, Error, EscrowAccount, EvidenceItem,
    EvidenceRecord, Milestone, MilestoneId, MilestoneStatus, Outcome, Resolution,
    ResolutionCause, Vote, VoteId, VoteStatistics, VoteType, VotingConfig,
};

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, String, Vec};
use storage_types::PersistentKey;

#[contract]
pub struct MilestoneEscrowContract;

#[contractimpl]
impl MilestoneEscrowContract {
    /// Initialize the contract with its admin and the two settlement collaborators.
    ///
    /// `processor` records donations once a charge succeeds; `payout_agent`
    /// confirms that a released milestone has been paid out.
    pub fn initialize(
        e: Env,
        admin: Address,
        processor: Address,
        payout_agent: Address,
    ) -> Result<(), Error> {
        if config::is_initialized(&e) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        config::init(&e, &admin, &processor, &payout_agent);
        Ok(())
    }

    /// Replace the voting configuration. Applies to evaluations from now on,
    /// including reviews already in progress; a review the new config already
    /// completes is settled by `resolve_expired`.
    ///
    /// # Errors
    /// * `InvalidConfig` - If `min_quorum` is zero or the threshold is outside 1..=10000 bps
    pub fn update_config(e: Env, new_config: VotingConfig) -> Result<(), Error> {
        config::check_paused(&e)?;
        config::admin(&e)?.require_auth();
        config::set_voting_config(&e, &new_config)
    }

    pub fn get_config(e: Env) -> Result<VotingConfig, Error> {
        config::voting_config(&e)
    }

    pub fn pause(e: Env) -> Result<(), Error> {
        config::admin(&e)?.require_auth();
        config::set_paused(&e, true);
        Ok(())
    }

    pub fn unpause(e: Env) -> Result<(), Error> {
        config::admin(&e)?.require_auth();
        config::set_paused(&e, false);
        Ok(())
    }

    /// Register an approved campaign and open its escrow account.
    ///
    /// # Errors
    /// * `InvalidAmount` - If `goal` is not positive
    /// * `AlreadyExists` - If the campaign or its escrow account already exists
    pub fn register_campaign(
        e: Env,
        campaign_id: CampaignId,
        owner: Address,
        goal: i128,
    ) -> Result<(), Error> {
        config::check_paused(&e)?;
        config::admin(&e)?.require_auth();

        campaign::create(&e, campaign_id, &owner, goal)?;
        escrow::open(&e, campaign_id)?;

        events::emit_campaign_registered(
            &e,
            events::CampaignRegisteredEvent {
                campaign_id,
                owner,
                goal,
            },
        );
        Ok(())
    }

    pub fn set_campaign_status(
        e: Env,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<(), Error> {
        config::check_paused(&e)?;
        config::admin(&e)?.require_auth();

        let mut campaign = campaign::load(&e, campaign_id)?;
        campaign.status = status;
        campaign::save(&e, &campaign);
        Ok(())
    }

    pub fn get_campaign(e: Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
        campaign::load(&e, campaign_id)
    }

    /// Record a settled donation: deposit into escrow and credit the donor.
    ///
    /// `charge_key` is the processor's unique key for the charge; replaying
    /// it is refused so a retried notification cannot double-deposit.
    /// Returns the donor's cumulative contribution to the campaign.
    ///
    /// # Errors
    /// * `CampaignNotActive` - If the campaign is suspended or closed
    /// * `InvalidAmount` - If `amount` is not positive
    /// * `AlreadyExists` - If `charge_key` was already recorded
    pub fn record_donation(
        e: Env,
        campaign_id: CampaignId,
        donor: Address,
        amount: i128,
        charge_key: BytesN<32>,
    ) -> Result<i128, Error> {
        config::check_paused(&e)?;
        config::processor(&e)?.require_auth();
        campaign::load_active(&e, campaign_id)?;

        let charge = PersistentKey::Charge(charge_key);
        if e.storage().persistent().has(&charge) {
            return Err(Error::AlreadyExists);
        }

        escrow::deposit(&e, campaign_id, amount)?;
        let contribution = ledger::record(&e, campaign_id, &donor, amount)?;

        e.storage().persistent().set(&charge, &true);
        config::extend_persistent(&e, &charge);

        events::emit_donation_recorded(
            &e,
            events::DonationRecordedEvent {
                campaign_id,
                donor,
                amount,
                contribution,
            },
        );
        Ok(contribution)
    }

    pub fn get_contribution(e: Env, campaign_id: CampaignId, donor: Address) -> i128 {
        ledger::contribution_of(&e, campaign_id, &donor)
    }

    pub fn get_eligible_count(e: Env, campaign_id: CampaignId) -> u32 {
        ledger::eligible_count(&e, campaign_id)
    }

    /// Define a milestone on an active campaign.
    ///
    /// # Errors
    /// * `InvalidAmount` - If `amount` is not positive
    /// * `InvalidInput` - If `title` is empty
    /// * `GoalExceeded` - If the campaign's milestone amounts would pass its goal
    pub fn create_milestone(
        e: Env,
        campaign_id: CampaignId,
        amount: i128,
        expected_date: u64,
        title: String,
    ) -> Result<MilestoneId, Error> {
        config::check_paused(&e)?;
        let owner = campaign::load(&e, campaign_id)?.owner;
        owner.require_auth();

        let created = milestone::create(&e, campaign_id, amount, expected_date, title)?;
        events::emit_milestone_created(
            &e,
            events::MilestoneCreatedEvent {
                campaign_id,
                milestone_id: created.id,
                amount,
            },
        );
        config::extend_instance(&e);
        Ok(created.id)
    }

    pub fn get_milestone(e: Env, milestone_id: MilestoneId) -> Result<Milestone, Error> {
        milestone::load(&e, milestone_id)
    }

    pub fn list_milestones(e: Env, campaign_id: CampaignId) -> Vec<MilestoneId> {
        milestone::list(&e, campaign_id)
    }

    /// Attach proof of completion and put the milestone up for a vote.
    ///
    /// Accepted from PENDING or, for a resubmission, REJECTED. Each call opens
    /// a new review round in which every eligible donor may vote once.
    ///
    /// # Errors
    /// * `InvalidState` - If the milestone is not PENDING or REJECTED
    /// * `InvalidInput` - If no evidence, an empty URI, or an empty description is given
    pub fn submit_evidence(
        e: Env,
        milestone_id: MilestoneId,
        evidence: Vec<EvidenceItem>,
        description: String,
    ) -> Result<MilestoneId, Error> {
        config::check_paused(&e)?;
        let mut current = milestone::load(&e, milestone_id)?;
        let campaign = campaign::load_active(&e, current.campaign_id)?;
        campaign.owner.require_auth();

        milestone::submit_evidence(&e, &mut current, &evidence, description)?;

        events::emit_evidence_submitted(
            &e,
            events::EvidenceSubmittedEvent {
                campaign_id: current.campaign_id,
                milestone_id,
                round: current.review_round,
                items: evidence.len(),
            },
        );
        Ok(milestone_id)
    }

    pub fn get_evidence(e: Env, milestone_id: MilestoneId) -> Vec<EvidenceRecord> {
        milestone::evidence(&e, milestone_id)
    }

    /// Cast a donor's vote and, if that completes voting, resolve the milestone.
    ///
    /// Vote, tally and any release happen in this one invocation under the
    /// milestone's review lock. If the release fails the vote is discarded
    /// along with everything else: the milestone stays UNDER_REVIEW and the
    /// donor has to vote again once the escrow holds enough.
    ///
    /// # Errors
    /// * `CampaignNotActive` - If the campaign is suspended or closed
    /// * `InvalidState` - If the milestone is not UNDER_REVIEW
    /// * `VotingClosed` - If the review window has elapsed
    /// * `NotEligible` - If the donor has not contributed to the campaign
    /// * `DuplicateVote` - If the donor already voted in this round
    /// * `InsufficientFunds` - If approval needs more than the escrow holds
    /// * `ConcurrencyConflict` - If the milestone is locked by another review step
    pub fn cast_vote(
        e: Env,
        milestone_id: MilestoneId,
        donor: Address,
        vote_type: VoteType,
        comment: String,
    ) -> Result<VoteId, Error> {
        config::check_paused(&e)?;
        donor.require_auth();

        coordinator::acquire_lock(&e, milestone_id)?;

        let voting = config::voting_config(&e)?;
        let mut current = milestone::load(&e, milestone_id)?;
        campaign::load_active(&e, current.campaign_id)?;
        if current.status != MilestoneStatus::UnderReview {
            return Err(Error::InvalidState);
        }
        if milestone::review_expired(&e, &current, voting.review_period) {
            return Err(Error::VotingClosed);
        }

        let vote = tally::record_vote(&e, &current, &donor, vote_type, comment)?;
        events::emit_vote_cast(
            &e,
            events::VoteCastEvent {
                milestone_id,
                vote_id: vote.id,
                donor,
                vote_type,
            },
        );

        coordinator::evaluate(&e, &mut current, &voting)?;

        coordinator::release_lock(&e, milestone_id);
        config::extend_instance(&e);
        Ok(vote.id)
    }

    pub fn get_vote(
        e: Env,
        milestone_id: MilestoneId,
        donor: Address,
    ) -> Result<Option<Vote>, Error> {
        let current = milestone::load(&e, milestone_id)?;
        Ok(tally::vote_of(&e, &current, &donor))
    }

    /// Resolve a review without waiting for another vote. Callable by anyone.
    ///
    /// A round that is already complete under the current config resolves by
    /// quorum. Otherwise the review window must have elapsed and the votes
    /// cast so far decide.
    ///
    /// # Errors
    /// * `CampaignNotActive` - If the campaign is suspended or closed
    /// * `InvalidState` - If the milestone is not UNDER_REVIEW, or the round is
    ///   incomplete and deadlines are disabled
    /// * `VotingOpen` - If the round is incomplete and its window is still open
    pub fn resolve_expired(e: Env, milestone_id: MilestoneId) -> Result<MilestoneStatus, Error> {
        config::check_paused(&e)?;
        coordinator::acquire_lock(&e, milestone_id)?;

        let voting = config::voting_config(&e)?;
        let mut current = milestone::load(&e, milestone_id)?;
        campaign::load_active(&e, current.campaign_id)?;
        let status = coordinator::resolve_expired(&e, &mut current, &voting)?;

        coordinator::release_lock(&e, milestone_id);
        Ok(status)
    }

    /// Admin rejection of a milestone under review. Allowed whatever the
    /// campaign's status, since no funds move.
    pub fn override_reject(e: Env, milestone_id: MilestoneId) -> Result<(), Error> {
        config::check_paused(&e)?;
        config::admin(&e)?.require_auth();
        coordinator::acquire_lock(&e, milestone_id)?;

        let voting = config::voting_config(&e)?;
        let mut current = milestone::load(&e, milestone_id)?;
        coordinator::override_reject(&e, &mut current, &voting)?;

        coordinator::release_lock(&e, milestone_id);
        Ok(())
    }

    /// Payout collaborator's settlement signal: APPROVED -> COMPLETED.
    pub fn confirm_payout(e: Env, milestone_id: MilestoneId) -> Result<(), Error> {
        config::check_paused(&e)?;
        config::payout_agent(&e)?.require_auth();

        let mut current = milestone::load(&e, milestone_id)?;
        milestone::complete(&e, &mut current)?;

        events::emit_payout_confirmed(
            &e,
            events::PayoutConfirmedEvent {
                campaign_id: current.campaign_id,
                milestone_id,
                amount: current.amount,
            },
        );
        Ok(())
    }

    /// View functions
    pub fn get_balances(e: Env, campaign_id: CampaignId) -> Result<Balances, Error> {
        escrow::balances(&e, campaign_id)
    }

    pub fn get_escrow(e: Env, campaign_id: CampaignId) -> Result<EscrowAccount, Error> {
        escrow::load(&e, campaign_id)
    }

    pub fn get_milestone_status(
        e: Env,
        milestone_id: MilestoneId,
    ) -> Result<MilestoneStatus, Error> {
        Ok(milestone::load(&e, milestone_id)?.status)
    }

    pub fn get_vote_statistics(
        e: Env,
        milestone_id: MilestoneId,
    ) -> Result<VoteStatistics, Error> {
        let current = milestone::load(&e, milestone_id)?;
        let voting = config::voting_config(&e)?;
        Ok(tally::statistics(&e, &current, &voting))
    }

    pub fn get_resolutions(e: Env, milestone_id: MilestoneId) -> Vec<Resolution> {
        coordinator::resolutions(&e, milestone_id)
    }

    pub fn is_paused(e: Env) -> bool {
        config::is_paused(&e)
    }
}
