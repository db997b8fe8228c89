//! Local stand-in for the contract.
//!
//! Nothing leaves the page: the wallet address is fabricated by the caller
//! and every write mutates in-memory campaigns synchronously. Status is
//! derived from the balance alone, so `Failed` never occurs here.

use alloy_primitives::U256;
use cf_api_types::{
    AccountAddress, CampaignAddress, CampaignStatus, CampaignSummary, DETAIL_DECIMALS,
    SUMMARY_DECIMALS, Tier, format_eth, parse_eth, progress_percent,
};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::gating;
use crate::view::{
    self, AppView, CampaignCard, DetailView, ListView, TierRow, description_or_default,
};

pub const CREATED_DESCRIPTION: &str = "User created campaign";
const DEFAULT_CREATE_GOAL: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DemoError {
    #[error("Connect wallet first")]
    NotConnected,
    #[error("Select a campaign first")]
    NoSelection,
    #[error("no campaign at position {0}")]
    UnknownCampaign(usize),
    #[error("no tier at position {0}")]
    InvalidTier(usize),
    #[error("This campaign is not accepting funds")]
    FundingClosed,
    #[error("You have already funded this campaign")]
    AlreadyBacked,
    #[error("Only owner can withdraw in demo")]
    NotOwner,
    #[error("You have not funded this campaign")]
    NotBacked,
    #[error("{0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
struct DemoCampaign {
    summary: CampaignSummary,
    balance: U256,
    tiers: Vec<Tier>,
}

impl DemoCampaign {
    fn status(&self) -> CampaignStatus {
        if self.balance >= self.summary.goal {
            CampaignStatus::Successful
        } else {
            CampaignStatus::Active
        }
    }
}

#[derive(Debug, Default)]
pub struct DemoEngine {
    user: Option<AccountAddress>,
    campaigns: Vec<DemoCampaign>,
    /// Keyed by address so inserting a campaign at the front keeps each
    /// flag on the campaign it was set for.
    selected: Option<CampaignAddress>,
    backed: HashSet<CampaignAddress>,
    created: u32,
}

fn ether(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u8))
}

/// `milli` thousandths of an ether.
fn milli(milli: u64) -> U256 {
    U256::from(milli) * U256::from(10u64).pow(U256::from(15u8))
}

fn tier(name: &str, amount: U256, backers: u64) -> Tier {
    Tier {
        name: name.to_owned(),
        amount,
        backers,
    }
}

impl DemoEngine {
    pub fn seeded() -> Self {
        let seed = |address: &str, owner: &str, name: &str, description: &str, goal, balance, tiers| {
            DemoCampaign {
                summary: CampaignSummary {
                    address: CampaignAddress(address.to_owned()),
                    owner: AccountAddress(owner.to_owned()),
                    name: name.to_owned(),
                    description: description.to_owned(),
                    goal,
                },
                balance,
                tiers,
            }
        };

        let campaigns = vec![
            seed(
                "0xAAA111",
                "0x87B2cD34fA9e1234567890aBcDEF1234567890ab",
                "Education for All",
                "Provide educational resources to underserved communities.",
                ether(100),
                ether(64),
                vec![
                    tier("Bronze", milli(100), 3),
                    tier("Silver", milli(500), 8),
                    tier("Gold", ether(1), 2),
                ],
            ),
            seed(
                "0xBBB222",
                "0xC39aD1bc1234567890AaBbCcDDEeFf00112233",
                "Green Energy Project",
                "Support development of clean energy solutions.",
                ether(20),
                ether(20),
                vec![tier("Supporter", milli(200), 10), tier("Sponsor", ether(2), 1)],
            ),
            seed(
                "0xCCC333",
                "0x12F3a4567890abcdef1234567890ABCDEF1234",
                "Local Artists Fund",
                "Help local artists continue creating.",
                ether(50),
                ether(12),
                vec![tier("Patron", milli(50), 12), tier("Collector", milli(800), 4)],
            ),
        ];

        Self {
            campaigns,
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&AccountAddress> {
        self.user.as_ref()
    }

    pub fn connect(&mut self, address: AccountAddress) {
        info!(account = %address, "demo wallet connected");
        self.user = Some(address);
    }

    /// Forget the address. Campaign data and backing flags stay.
    pub fn disconnect(&mut self) {
        info!("demo wallet disconnected");
        self.user = None;
    }

    pub fn select(&mut self, index: usize) -> Result<(), DemoError> {
        let campaign = self
            .campaigns
            .get(index)
            .ok_or(DemoError::UnknownCampaign(index))?;
        self.selected = Some(campaign.summary.address.clone());
        Ok(())
    }

    fn selected_mut(&mut self) -> Result<&mut DemoCampaign, DemoError> {
        let address = self.selected.as_ref().ok_or(DemoError::NoSelection)?;
        self.campaigns
            .iter_mut()
            .find(|c| &c.summary.address == address)
            .ok_or(DemoError::NoSelection)
    }

    fn selected(&self) -> Option<&DemoCampaign> {
        let address = self.selected.as_ref()?;
        self.campaigns.iter().find(|c| &c.summary.address == address)
    }

    pub fn fund(&mut self, tier_index: usize) -> Result<(), DemoError> {
        if self.user.is_none() {
            return Err(DemoError::NotConnected);
        }
        let already_backed = self
            .selected
            .as_ref()
            .is_some_and(|a| self.backed.contains(a));
        let campaign = self.selected_mut()?;
        if !gating::can_fund(campaign.status(), campaign.balance, campaign.summary.goal) {
            warn!(campaign = %campaign.summary.address, "demo funding closed");
            return Err(DemoError::FundingClosed);
        }
        if already_backed {
            return Err(DemoError::AlreadyBacked);
        }
        let tier = campaign
            .tiers
            .get_mut(tier_index)
            .ok_or(DemoError::InvalidTier(tier_index))?;
        tier.backers += 1;
        campaign.balance += tier.amount;
        let address = campaign.summary.address.clone();
        info!(campaign = %address, tier = tier_index, "demo funded");
        self.backed.insert(address);
        Ok(())
    }

    pub fn withdraw(&mut self) -> Result<(), DemoError> {
        let user = self.user.clone().ok_or(DemoError::NotConnected)?;
        let campaign = self.selected_mut()?;
        if !user.matches(&campaign.summary.owner) {
            return Err(DemoError::NotOwner);
        }
        campaign.balance = U256::ZERO;
        info!(campaign = %campaign.summary.address, "demo withdraw");
        Ok(())
    }

    /// Returns the amount of the first tier that still has backers, not
    /// necessarily the tier this user funded; only one flag per campaign is
    /// tracked.
    pub fn refund(&mut self) -> Result<(), DemoError> {
        if self.user.is_none() {
            return Err(DemoError::NotConnected);
        }
        let address = self.selected.clone().ok_or(DemoError::NoSelection)?;
        if !self.backed.contains(&address) {
            return Err(DemoError::NotBacked);
        }
        let campaign = self.selected_mut()?;
        if let Some(tier) = campaign.tiers.iter_mut().find(|t| t.backers > 0) {
            campaign.balance = campaign.balance.saturating_sub(tier.amount);
            tier.backers -= 1;
        }
        self.backed.remove(&address);
        info!(campaign = %address, "demo refund");
        Ok(())
    }

    /// Adds a campaign at the front of the list. A goal that does not parse
    /// falls back to 10 ETH.
    pub fn create(&mut self, name: &str, goal_eth: &str) -> Result<(), DemoError> {
        let owner = self.user.clone().ok_or(DemoError::NotConnected)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DemoError::InvalidInput("Campaign name is required".into()));
        }
        let goal = parse_eth(goal_eth)
            .filter(|g| !g.is_zero())
            .unwrap_or_else(|| ether(DEFAULT_CREATE_GOAL));

        self.created += 1;
        let address = CampaignAddress(format!("0xNEW{:04x}", self.created));
        info!(campaign = %address, name, "demo campaign created");
        self.campaigns.insert(
            0,
            DemoCampaign {
                summary: CampaignSummary {
                    address,
                    owner,
                    name: name.to_owned(),
                    description: CREATED_DESCRIPTION.to_owned(),
                    goal,
                },
                balance: U256::ZERO,
                tiers: vec![tier("Supporter", milli(100), 0)],
            },
        );
        Ok(())
    }

    pub fn view(&self) -> AppView {
        let list = if self.campaigns.is_empty() {
            ListView::Empty
        } else {
            ListView::Cards(
                self.campaigns
                    .iter()
                    .enumerate()
                    .map(|(index, c)| CampaignCard {
                        index,
                        name: c.summary.name.clone(),
                        owner_short: c.summary.owner.short(),
                        description: description_or_default(&c.summary.description),
                        goal: format_eth(c.summary.goal, SUMMARY_DECIMALS),
                        raised: format_eth(c.balance, SUMMARY_DECIMALS),
                        progress: progress_percent(c.balance, c.summary.goal),
                        status: c.status(),
                        selected: self.selected.as_ref() == Some(&c.summary.address),
                    })
                    .collect(),
            )
        };

        AppView {
            wallet_label: view::wallet_label(self.user.as_ref().map(|u| u.0.as_str())),
            busy: false,
            create_enabled: self.user.is_some(),
            list,
            detail: self.selected().map(|c| self.detail(c)),
        }
    }

    fn detail(&self, c: &DemoCampaign) -> DetailView {
        let status = c.status();
        let backed = self.backed.contains(&c.summary.address);
        let fundable = gating::can_fund(status, c.balance, c.summary.goal) && !backed;
        let is_owner = self.user.as_ref().is_some_and(|u| u.matches(&c.summary.owner));

        DetailView {
            name: c.summary.name.clone(),
            owner_label: format!("Owner: {}", c.summary.owner.short()),
            balance: format!("{} ETH", format_eth(c.balance, DETAIL_DECIMALS)),
            status,
            status_label: status.to_string(),
            tiers: c
                .tiers
                .iter()
                .enumerate()
                .map(|(index, t)| TierRow {
                    index,
                    name: t.name.clone(),
                    amount: format_eth(t.amount, DETAIL_DECIMALS),
                    backers: t.backers,
                    fund_enabled: fundable,
                    fund_label: if backed { "Funded" } else { "Fund" },
                })
                .collect(),
            withdraw_enabled: is_owner,
            refund_enabled: self.user.is_some() && backed,
            error: None,
        }
    }
}
