use soroban_sdk::{log, Env};

use crate::config::extend_persistent;
use crate::storage_types::{Balances, CampaignId, Error, EscrowAccount, PersistentKey};

/// Creates a zero-balance account for the campaign.
pub fn open(e: &Env, campaign_id: CampaignId) -> Result<EscrowAccount, Error> {
    let key = PersistentKey::Escrow(campaign_id);
    if e.storage().persistent().has(&key) {
        return Err(Error::AlreadyExists);
    }

    let account = EscrowAccount {
        campaign_id,
        total_amount: 0,
        available_amount: 0,
        released_amount: 0,
    };
    save(e, &account);
    Ok(account)
}

pub fn load(e: &Env, campaign_id: CampaignId) -> Result<EscrowAccount, Error> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Escrow(campaign_id))
        .ok_or(Error::EscrowNotFound)
}

fn save(e: &Env, account: &EscrowAccount) {
    let key = PersistentKey::Escrow(account.campaign_id);
    e.storage().persistent().set(&key, account);
    extend_persistent(e, &key);
}

/// Increases both total and available by `amount`.
///
/// Not idempotent: callers dedupe on the charge key before getting here.
pub fn deposit(e: &Env, campaign_id: CampaignId, amount: i128) -> Result<EscrowAccount, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let mut account = load(e, campaign_id)?;
    account.total_amount = account
        .total_amount
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    account.available_amount = account
        .available_amount
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;

    save(e, &account);
    Ok(account)
}

/// Moves `amount` from available to released.
///
/// Milestone bookkeeping should make a shortfall impossible, so one is
/// logged as an invariant breach before it is reported.
pub fn release(e: &Env, campaign_id: CampaignId, amount: i128) -> Result<EscrowAccount, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let mut account = load(e, campaign_id)?;
    if account.available_amount < amount {
        log!(
            e,
            "escrow invariant breach: release exceeds available funds",
            campaign_id,
            amount,
            account.available_amount
        );
        return Err(Error::InsufficientFunds);
    }

    account.available_amount = account
        .available_amount
        .checked_sub(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    account.released_amount = account
        .released_amount
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;

    save(e, &account);
    Ok(account)
}

pub fn balances(e: &Env, campaign_id: CampaignId) -> Result<Balances, Error> {
    let account = load(e, campaign_id)?;
    Ok(Balances {
        total: account.total_amount,
        available: account.available_amount,
        released: account.released_amount,
    })
}
