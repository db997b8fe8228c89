//! Declarative view model.
//!
//! `render(&ViewState) -> AppView` is re-run after every state change; the
//! DOM shell only paints what it is given. The demo engine builds the same
//! types, so both modes share one painter.

use cf_api_types::{
    CampaignStatus, DETAIL_DECIMALS, SUMMARY_DECIMALS, format_eth, progress_percent,
    shorten_address,
};

use crate::gating;
use crate::state::{ListState, ViewState};

pub const CONNECT_LABEL: &str = "Connect Wallet";
pub const NO_DESCRIPTION: &str = "No description";

#[derive(Clone, Debug, PartialEq)]
pub struct AppView {
    pub wallet_label: String,
    /// A write is awaiting finalization; every write control is held disabled.
    pub busy: bool,
    pub create_enabled: bool,
    pub list: ListView,
    pub detail: Option<DetailView>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ListView {
    Disconnected,
    Loading,
    Empty,
    Failed,
    Cards(Vec<CampaignCard>),
}

impl ListView {
    /// Text shown in place of the card grid, and whether it reports an error.
    pub fn placeholder(&self) -> Option<(&'static str, bool)> {
        match self {
            ListView::Disconnected => Some(("Connect your wallet to load campaigns.", false)),
            ListView::Loading => Some(("Loading campaigns...", false)),
            ListView::Empty => Some(("No campaigns yet. Create one!", false)),
            ListView::Failed => Some(("Failed to load campaigns.", true)),
            ListView::Cards(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CampaignCard {
    pub index: usize,
    pub name: String,
    pub owner_short: String,
    pub description: String,
    pub goal: String,
    pub raised: String,
    pub progress: f64,
    pub status: CampaignStatus,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub name: String,
    pub owner_label: String,
    pub balance: String,
    pub status: CampaignStatus,
    pub status_label: String,
    pub tiers: Vec<TierRow>,
    pub withdraw_enabled: bool,
    pub refund_enabled: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TierRow {
    pub index: usize,
    pub name: String,
    pub amount: String,
    pub backers: u64,
    pub fund_enabled: bool,
    pub fund_label: &'static str,
}

pub fn wallet_label(user: Option<&str>) -> String {
    match user {
        Some(addr) => shorten_address(addr),
        None => CONNECT_LABEL.to_owned(),
    }
}

pub fn description_or_default(description: &str) -> String {
    if description.trim().is_empty() {
        NO_DESCRIPTION.to_owned()
    } else {
        description.to_owned()
    }
}

pub fn render(state: &ViewState) -> AppView {
    let busy = state.in_flight.is_some();
    let connected = state.is_connected();

    let list = match &state.list {
        ListState::NotLoaded if !connected => ListView::Disconnected,
        ListState::NotLoaded => ListView::Loading,
        ListState::Failed(_) => ListView::Failed,
        ListState::Loaded(rows) if rows.is_empty() => ListView::Empty,
        ListState::Loaded(rows) => ListView::Cards(
            rows.iter()
                .enumerate()
                .map(|(index, row)| CampaignCard {
                    index,
                    name: row.summary.name.clone(),
                    owner_short: row.summary.owner.short(),
                    description: description_or_default(&row.summary.description),
                    goal: format_eth(row.summary.goal, SUMMARY_DECIMALS),
                    raised: format_eth(row.balance, SUMMARY_DECIMALS),
                    progress: progress_percent(row.balance, row.summary.goal),
                    status: row.status,
                    selected: state
                        .selected
                        .as_ref()
                        .is_some_and(|s| s.address == row.summary.address),
                })
                .collect(),
        ),
    };

    AppView {
        wallet_label: wallet_label(state.user.as_ref().map(|u| u.0.as_str())),
        busy,
        create_enabled: connected && !busy,
        list,
        detail: render_detail(state, busy),
    }
}

fn render_detail(state: &ViewState, busy: bool) -> Option<DetailView> {
    let summary = state.selected.as_ref()?;
    let owner_label = format!("Owner: {}", summary.owner.short());

    let Some(detail) = &state.detail else {
        return Some(DetailView {
            name: summary.name.clone(),
            owner_label,
            balance: "\u{2014}".to_owned(),
            status: CampaignStatus::Unknown,
            status_label: "Loading...".to_owned(),
            tiers: Vec::new(),
            withdraw_enabled: false,
            refund_enabled: false,
            error: state.detail_error.clone(),
        });
    };

    // A failed re-read leaves the last values on screen but nothing actionable.
    let live = !busy && state.detail_error.is_none();
    let fundable = gating::can_fund(detail.status, detail.balance, summary.goal);

    let tiers = detail
        .tiers
        .iter()
        .enumerate()
        .map(|(index, tier)| TierRow {
            index,
            name: tier.name.clone(),
            amount: format_eth(tier.amount, DETAIL_DECIMALS),
            backers: tier.backers,
            fund_enabled: live && fundable,
            fund_label: "Fund",
        })
        .collect();

    Some(DetailView {
        name: summary.name.clone(),
        owner_label,
        balance: format!("{} ETH", format_eth(detail.balance, DETAIL_DECIMALS)),
        status: detail.status,
        status_label: detail.status.to_string(),
        tiers,
        withdraw_enabled: live
            && gating::can_withdraw(state.user.as_ref(), &summary.owner, detail.status),
        refund_enabled: live && gating::can_refund(detail.status),
        error: state.detail_error.clone(),
    })
}
