//! Contribution ledger: cumulative donation per (campaign, donor).
//!
//! Written only when the processor records a donation. Voting reads it to
//! decide eligibility (contribution > 0) and to count eligible donors.

use soroban_sdk::{Address, Env};

use crate::config::extend_persistent;
use crate::storage_types::{CampaignId, Error, PersistentKey};

pub fn contribution_of(e: &Env, campaign_id: CampaignId, donor: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&PersistentKey::Contribution(campaign_id, donor.clone()))
        .unwrap_or(0)
}

pub fn is_eligible(e: &Env, campaign_id: CampaignId, donor: &Address) -> bool {
    contribution_of(e, campaign_id, donor) > 0
}

pub fn eligible_count(e: &Env, campaign_id: CampaignId) -> u32 {
    e.storage()
        .persistent()
        .get(&PersistentKey::DonorCount(campaign_id))
        .unwrap_or(0)
}

/// Adds `amount` to the donor's running total and returns the new total.
///
/// Contributions only grow, so a donor is counted as eligible the first time
/// their total leaves zero and stays counted.
pub fn record(
    e: &Env,
    campaign_id: CampaignId,
    donor: &Address,
    amount: i128,
) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let previous = contribution_of(e, campaign_id, donor);
    let updated = previous.checked_add(amount).ok_or(Error::ArithmeticOverflow)?;

    let key = PersistentKey::Contribution(campaign_id, donor.clone());
    e.storage().persistent().set(&key, &updated);
    extend_persistent(e, &key);

    if previous == 0 {
        let count_key = PersistentKey::DonorCount(campaign_id);
        let count = eligible_count(e, campaign_id)
            .checked_add(1)
            .ok_or(Error::ArithmeticOverflow)?;
        e.storage().persistent().set(&count_key, &count);
        extend_persistent(e, &count_key);
    }

    Ok(updated)
}
