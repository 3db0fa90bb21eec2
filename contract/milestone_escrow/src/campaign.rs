use soroban_sdk::{Address, Env};

use crate::config::extend_persistent;
use crate::storage_types::{Campaign, CampaignId, CampaignStatus, Error, PersistentKey};

pub fn create(
    e: &Env,
    campaign_id: CampaignId,
    owner: &Address,
    goal: i128,
) -> Result<Campaign, Error> {
    if goal <= 0 {
        return Err(Error::InvalidAmount);
    }
    if e.storage().persistent().has(&PersistentKey::Campaign(campaign_id)) {
        return Err(Error::AlreadyExists);
    }

    let campaign = Campaign {
        id: campaign_id,
        owner: owner.clone(),
        goal,
        committed: 0,
        status: CampaignStatus::Active,
        created_at: e.ledger().timestamp(),
    };
    save(e, &campaign);
    Ok(campaign)
}

pub fn load(e: &Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
    e.storage()
        .persistent()
        .get(&PersistentKey::Campaign(campaign_id))
        .ok_or(Error::CampaignNotFound)
}

pub fn load_active(e: &Env, campaign_id: CampaignId) -> Result<Campaign, Error> {
    let campaign = load(e, campaign_id)?;
    if campaign.status != CampaignStatus::Active {
        return Err(Error::CampaignNotActive);
    }
    Ok(campaign)
}

pub fn save(e: &Env, campaign: &Campaign) {
    let key = PersistentKey::Campaign(campaign.id);
    e.storage().persistent().set(&key, campaign);
    extend_persistent(e, &key);
}

/// Reserves `amount` of the goal for a new milestone.
pub fn commit(e: &Env, campaign: &mut Campaign, amount: i128) -> Result<(), Error> {
    let committed = campaign
        .committed
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    if committed > campaign.goal {
        return Err(Error::GoalExceeded);
    }
    campaign.committed = committed;
    save(e, campaign);
    Ok(())
}
