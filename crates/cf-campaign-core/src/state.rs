//! View-local state.
//!
//! Everything here is a transient copy of contract state. It is replaced
//! wholesale on every refresh and cleared when the wallet disconnects.

use alloy_primitives::U256;
use cf_api_types::{AccountAddress, CampaignStatus, CampaignSummary, Tier};

use crate::controller::WriteKind;

/// One list entry: the factory summary plus its live balance and status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignRow {
    pub summary: CampaignSummary,
    pub balance: U256,
    pub status: CampaignStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    NotLoaded,
    Loaded(Vec<CampaignRow>),
    /// A refresh failed; no partial list is kept.
    Failed(String),
}

impl ListState {
    pub fn rows(&self) -> &[CampaignRow] {
        match self {
            ListState::Loaded(rows) => rows,
            _ => &[],
        }
    }
}

/// Freshly read state of the selected campaign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignDetail {
    pub tiers: Vec<Tier>,
    pub status: CampaignStatus,
    pub balance: U256,
}

#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub user: Option<AccountAddress>,
    pub list: ListState,
    pub selected: Option<CampaignSummary>,
    pub detail: Option<CampaignDetail>,
    pub detail_error: Option<String>,
    pub in_flight: Option<WriteKind>,
}

impl ViewState {
    pub fn is_connected(&self) -> bool {
        self.user.is_some()
    }

    /// Drop everything tied to the session or the contract handles. A write
    /// already submitted keeps its in-flight marker until it finalizes, so a
    /// reconnect cannot start a second one alongside it.
    pub fn clear(&mut self) {
        *self = ViewState {
            in_flight: self.in_flight,
            ..ViewState::default()
        };
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.detail = None;
        self.detail_error = None;
    }
}
