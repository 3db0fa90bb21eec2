use soroban_sdk::{contracterror, contracttype, Address, BytesN, String};

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin,
    Processor,
    PayoutAgent,
    Paused,
    Config,
    NextMilestoneId,
    NextVoteId,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Campaign(CampaignId),
    Escrow(CampaignId),
    CampaignMilestones(CampaignId),
    Contribution(CampaignId, Address),
    DonorCount(CampaignId),
    Charge(BytesN<32>),
    Milestone(MilestoneId),
    Evidence(MilestoneId),
    Tally(MilestoneId),
    Vote(MilestoneId, u32, Address), // (MilestoneId, review round, donor)
    Resolutions(MilestoneId),
}

// Storage keys for temporary data
#[derive(Clone)]
#[contracttype]
pub enum TempKey {
    ReviewLock(MilestoneId),
}

pub type CampaignId = u64;
pub type MilestoneId = u64;
pub type VoteId = u64;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum CampaignStatus {
    Active,
    Suspended,
    Closed,
}

// Minimal campaign record mirrored from the campaign service
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Campaign {
    pub id: CampaignId,
    pub owner: Address,
    pub goal: i128,
    pub committed: i128, // Sum of all milestone amounts
    pub status: CampaignStatus,
    pub created_at: u64,
}

// Invariant: total_amount == available_amount + released_amount
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct EscrowAccount {
    pub campaign_id: CampaignId,
    pub total_amount: i128,
    pub available_amount: i128,
    pub released_amount: i128,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Balances {
    pub total: i128,
    pub available: i128,
    pub released: i128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum MilestoneStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Milestone {
    pub id: MilestoneId,
    pub campaign_id: CampaignId,
    pub title: String,
    pub amount: i128,
    pub expected_date: u64,
    pub status: MilestoneStatus,
    pub description: String,       // Latest evidence description
    pub review_round: u32,         // 0 until evidence is first submitted
    pub review_started_at: u64,
    pub resolved_at: Option<u64>,
    pub created_at: u64,
}

// Proof item supplied by the campaign owner
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct EvidenceItem {
    pub uri: String,               // IPFS hash or similar
    pub content_hash: BytesN<32>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct EvidenceRecord {
    pub round: u32,
    pub uri: String,
    pub content_hash: BytesN<32>,
    pub submitted_at: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum VoteType {
    Approve,
    Reject,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Vote {
    pub id: VoteId,
    pub milestone_id: MilestoneId,
    pub round: u32,
    pub donor: Address,
    pub vote_type: VoteType,
    pub weight: u32,
    pub comment: String,
    pub cast_at: u64,
}

// Running counts for the current review round
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Tally {
    pub round: u32,
    pub approve_count: u32,
    pub reject_count: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct VoteStatistics {
    pub round: u32,
    pub approve_count: u32,
    pub reject_count: u32,
    pub cast: u32,
    pub eligible: u32,
    pub approval_ratio_bps: u32,
    pub complete: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum Outcome {
    Approved,
    Rejected,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum ResolutionCause {
    Quorum,
    Deadline,
    AdminOverride,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Resolution {
    pub round: u32,
    pub outcome: Outcome,
    pub cause: ResolutionCause,
    pub approve_count: u32,
    pub reject_count: u32,
    pub resolved_at: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct VotingConfig {
    pub min_quorum: u32,
    pub approval_threshold_bps: u32, // Basis points (e.g., 6000 = 60%)
    pub review_period: u64,          // Seconds, 0 disables the deadline
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ContractPaused = 3,
    InvalidAmount = 4,
    InvalidInput = 5,
    GoalExceeded = 6,
    InvalidConfig = 7,
    CampaignNotFound = 8,
    EscrowNotFound = 9,
    MilestoneNotFound = 10,
    AlreadyExists = 11,
    CampaignNotActive = 12,
    InvalidState = 13,
    VotingClosed = 14,
    VotingOpen = 15,
    NotEligible = 16,
    DuplicateVote = 17,
    InsufficientFunds = 18,
    ConcurrencyConflict = 19,
    ArithmeticOverflow = 20,
}

// Constants
pub const BASIS_POINTS: u32 = 10000; // 100% in basis points
pub const DEFAULT_MIN_QUORUM: u32 = 3;
pub const DEFAULT_APPROVAL_THRESHOLD_BPS: u32 = 6000; // 60%
pub const DEFAULT_REVIEW_PERIOD: u64 = 0;
pub const VOTE_WEIGHT: u32 = 1; // One donor, one vote
pub const TTL_INSTANCE: u32 = 17280 * 30; // 30 days
pub const TTL_PERSISTENT: u32 = 17280 * 90; // 90 days
pub const TTL_LOCK: u32 = 17280; // 1 day
