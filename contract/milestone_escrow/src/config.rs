use soroban_sdk::{Address, Env};

use crate::storage_types::{
    DataKey, Error, PersistentKey, VotingConfig, BASIS_POINTS, DEFAULT_APPROVAL_THRESHOLD_BPS,
    DEFAULT_MIN_QUORUM, DEFAULT_REVIEW_PERIOD, TTL_INSTANCE, TTL_PERSISTENT,
};

pub fn default_config() -> VotingConfig {
    VotingConfig {
        min_quorum: DEFAULT_MIN_QUORUM,
        approval_threshold_bps: DEFAULT_APPROVAL_THRESHOLD_BPS,
        review_period: DEFAULT_REVIEW_PERIOD,
    }
}

pub fn validate(config: &VotingConfig) -> Result<(), Error> {
    if config.min_quorum == 0 {
        return Err(Error::InvalidConfig);
    }
    if config.approval_threshold_bps == 0 || config.approval_threshold_bps > BASIS_POINTS {
        return Err(Error::InvalidConfig);
    }
    Ok(())
}

pub fn is_initialized(e: &Env) -> bool {
    e.storage().instance().has(&DataKey::Admin)
}

pub fn init(e: &Env, admin: &Address, processor: &Address, payout_agent: &Address) {
    e.storage().instance().set(&DataKey::Admin, admin);
    e.storage().instance().set(&DataKey::Processor, processor);
    e.storage().instance().set(&DataKey::PayoutAgent, payout_agent);
    e.storage().instance().set(&DataKey::Paused, &false);
    e.storage().instance().set(&DataKey::Config, &default_config());
    e.storage().instance().set(&DataKey::NextMilestoneId, &1u64);
    e.storage().instance().set(&DataKey::NextVoteId, &1u64);
    extend_instance(e);
}

pub fn admin(e: &Env) -> Result<Address, Error> {
    e.storage().instance().get(&DataKey::Admin).ok_or(Error::NotInitialized)
}

pub fn processor(e: &Env) -> Result<Address, Error> {
    e.storage().instance().get(&DataKey::Processor).ok_or(Error::NotInitialized)
}

pub fn payout_agent(e: &Env) -> Result<Address, Error> {
    e.storage().instance().get(&DataKey::PayoutAgent).ok_or(Error::NotInitialized)
}

pub fn voting_config(e: &Env) -> Result<VotingConfig, Error> {
    e.storage().instance().get(&DataKey::Config).ok_or(Error::NotInitialized)
}

pub fn set_voting_config(e: &Env, config: &VotingConfig) -> Result<(), Error> {
    validate(config)?;
    e.storage().instance().set(&DataKey::Config, config);
    extend_instance(e);
    Ok(())
}

pub fn set_paused(e: &Env, paused: bool) {
    e.storage().instance().set(&DataKey::Paused, &paused);
    extend_instance(e);
}

pub fn is_paused(e: &Env) -> bool {
    e.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

/// Gate for every state-mutating entry point.
pub fn check_paused(e: &Env) -> Result<(), Error> {
    if !is_initialized(e) {
        return Err(Error::NotInitialized);
    }
    if is_paused(e) {
        return Err(Error::ContractPaused);
    }
    Ok(())
}

/// Hands out the next value of an instance-level counter.
pub fn next_id(e: &Env, key: &DataKey) -> Result<u64, Error> {
    let id: u64 = e.storage().instance().get(key).ok_or(Error::NotInitialized)?;
    let next = id.checked_add(1).ok_or(Error::ArithmeticOverflow)?;
    e.storage().instance().set(key, &next);
    Ok(id)
}

pub fn extend_instance(e: &Env) {
    e.storage().instance().extend_ttl(TTL_INSTANCE, TTL_INSTANCE);
}

pub fn extend_persistent(e: &Env, key: &PersistentKey) {
    e.storage().persistent().extend_ttl(key, TTL_PERSISTENT, TTL_PERSISTENT);
}
