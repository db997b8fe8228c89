//! Which controls are live for a given campaign state.
//!
//! The contract is the real authority; these rules only keep the UI from
//! offering actions the contract is known to refuse.

use alloy_primitives::U256;
use cf_api_types::{AccountAddress, CampaignStatus};

/// A campaign accepts funds only while active and short of its goal, even if
/// the status has not yet flipped to `Successful`.
pub fn can_fund(status: CampaignStatus, balance: U256, goal: U256) -> bool {
    status == CampaignStatus::Active && balance < goal
}

pub fn can_withdraw(
    user: Option<&AccountAddress>,
    owner: &AccountAddress,
    status: CampaignStatus,
) -> bool {
    let is_owner = user.is_some_and(|u| u.matches(owner));
    is_owner && status == CampaignStatus::Successful
}

/// Backer eligibility is left to the contract.
pub fn can_refund(status: CampaignStatus) -> bool {
    status == CampaignStatus::Failed
}
