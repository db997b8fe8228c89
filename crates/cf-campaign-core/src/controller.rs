//! Wallet session, refresh protocol and write protocol for the live contract.
//!
//! The controller is shared as `Rc<CampaignController<_>>` between event
//! handlers on a single-threaded executor. State lives behind `RefCell`s that
//! are never borrowed across an `.await`, so a notification arriving mid-call
//! can still read and replace state; the later completion wins.

use cf_api_types::{AccountAddress, TxReceipt, parse_eth};
use cf_chain_client::{
    CampaignGateway, CreateCampaignRequest, GatewayError, GatewayResult, PendingTx, WalletProvider,
};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::state::{CampaignDetail, CampaignRow, ListState, ViewState};
use crate::view::{self, AppView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Fund,
    Withdraw,
    Refund,
}

impl WriteKind {
    pub fn success_message(&self) -> &'static str {
        match self {
            WriteKind::Create => "Campaign created successfully!",
            WriteKind::Fund => "Funded successfully!",
            WriteKind::Withdraw => "Withdraw successful!",
            WriteKind::Refund => "Refund successful!",
        }
    }

    pub fn failure_prefix(&self) -> &'static str {
        match self {
            WriteKind::Create => "Error creating campaign",
            WriteKind::Fund => "Funding failed",
            WriteKind::Withdraw => "Withdraw failed",
            WriteKind::Refund => "Refund failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("connect wallet first")]
    NotConnected,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error("select a campaign first")]
    NoSelection,
    #[error("no campaign at position {0}")]
    UnknownCampaign(usize),
    #[error("another transaction is still pending")]
    Busy,
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// What the shell must do after a wallet notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    Connected(AccountAddress),
    Disconnected,
    /// Handles are bound to the old network; only a full reload is safe.
    Reload,
}

type Listener = Box<dyn Fn(&AppView)>;

pub struct CampaignController<P: WalletProvider> {
    provider: P,
    gateway: RefCell<Option<Rc<P::Gateway>>>,
    state: RefCell<ViewState>,
    listeners: RefCell<Vec<Listener>>,
}

impl<P: WalletProvider> CampaignController<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            gateway: RefCell::new(None),
            state: RefCell::new(ViewState::default()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register a painter. It is called with a fresh view after every change
    /// and must not register further listeners from inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&AppView) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn view(&self) -> AppView {
        view::render(&self.state.borrow())
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<AccountAddress> {
        self.state.borrow().user.clone()
    }

    fn notify(&self) {
        let view = self.view();
        for listener in self.listeners.borrow().iter() {
            listener(&view);
        }
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        f(&mut self.state.borrow_mut());
        self.notify();
    }

    fn gateway(&self) -> Result<Rc<P::Gateway>, ActionError> {
        self.gateway.borrow().clone().ok_or(ActionError::NotConnected)
    }

    // ── Session ──

    /// Ask the wallet for accounts, bind a gateway to the first one and load
    /// campaigns.
    pub async fn connect(&self) -> Result<AccountAddress, ActionError> {
        let accounts = self.provider.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or(ActionError::NoAccounts)?;
        self.adopt_account(account.clone())?;
        info!(account = %account, "wallet connected");

        self.refresh_views().await;
        Ok(account)
    }

    pub async fn accounts_changed(
        &self,
        accounts: Vec<AccountAddress>,
    ) -> Result<SessionAction, ActionError> {
        let Some(account) = accounts.into_iter().next() else {
            self.disconnect();
            return Ok(SessionAction::Disconnected);
        };

        self.adopt_account(account.clone())?;
        info!(account = %account, "wallet account changed");
        self.refresh_views().await;
        Ok(SessionAction::Connected(account))
    }

    pub fn chain_changed(&self) -> SessionAction {
        warn!("network changed; discarding session");
        self.gateway.replace(None);
        self.update(ViewState::clear);
        SessionAction::Reload
    }

    pub fn disconnect(&self) {
        info!("wallet disconnected");
        self.gateway.replace(None);
        self.update(ViewState::clear);
    }

    fn adopt_account(&self, account: AccountAddress) -> Result<(), ActionError> {
        let gateway = self.provider.gateway_for(&account)?;
        self.gateway.replace(Some(Rc::new(gateway)));
        self.update(|s| s.user = Some(account));
        Ok(())
    }

    // ── Reads ──

    async fn load_rows(gateway: &P::Gateway) -> GatewayResult<Vec<CampaignRow>> {
        let campaigns = gateway.list_campaigns().await?;
        let mut rows = Vec::with_capacity(campaigns.len());
        for summary in campaigns {
            let balance = gateway.get_balance(&summary.address).await?;
            let status = gateway.get_status(&summary.address).await?;
            rows.push(CampaignRow {
                summary,
                balance,
                status,
            });
        }
        Ok(rows)
    }

    /// Re-read every campaign with its live balance and status. Any failing
    /// call replaces the whole list with a failure marker.
    pub async fn refresh_list(&self) -> Result<(), ActionError> {
        let gateway = self.gateway()?;
        match Self::load_rows(&gateway).await {
            Ok(rows) => {
                info!(count = rows.len(), "campaigns loaded");
                self.update(|s| {
                    let refreshed = s.selected.as_ref().and_then(|selected| {
                        rows.iter()
                            .find(|r| r.summary.address == selected.address)
                            .map(|r| r.summary.clone())
                    });
                    if let Some(summary) = refreshed {
                        s.selected = Some(summary);
                    }
                    s.list = ListState::Loaded(rows);
                });
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "loading campaigns failed");
                let message = err.to_string();
                self.update(|s| s.list = ListState::Failed(message));
                Err(err.into())
            }
        }
    }

    pub async fn select(&self, index: usize) -> Result<(), ActionError> {
        self.gateway()?;
        let summary = self
            .state
            .borrow()
            .list
            .rows()
            .get(index)
            .map(|row| row.summary.clone())
            .ok_or(ActionError::UnknownCampaign(index))?;

        info!(campaign = %summary.address, "campaign selected");
        self.update(|s| {
            s.clear_selection();
            s.selected = Some(summary);
        });
        self.refresh_detail().await
    }

    /// Re-read tiers, status and balance of the selected campaign.
    pub async fn refresh_detail(&self) -> Result<(), ActionError> {
        let gateway = self.gateway()?;
        let address = self
            .state
            .borrow()
            .selected
            .as_ref()
            .map(|s| s.address.clone())
            .ok_or(ActionError::NoSelection)?;

        let loaded = async {
            let tiers = gateway.get_tiers(&address).await?;
            let status = gateway.get_status(&address).await?;
            let balance = gateway.get_balance(&address).await?;
            GatewayResult::Ok(CampaignDetail {
                tiers,
                status,
                balance,
            })
        }
        .await;

        let still_selected = |s: &ViewState| s.selected.as_ref().is_some_and(|c| c.address == address);
        match loaded {
            Ok(detail) => {
                self.update(|s| {
                    if still_selected(s) {
                        s.detail = Some(detail);
                        s.detail_error = None;
                    }
                });
                Ok(())
            }
            Err(err) => {
                error!(campaign = %address, error = %err, "loading campaign details failed");
                let message = err.to_string();
                self.update(|s| {
                    if still_selected(s) {
                        s.detail_error = Some(message);
                    }
                });
                Err(err.into())
            }
        }
    }

    /// List first, then the selected campaign. Failures are recorded in the
    /// view state rather than returned.
    async fn refresh_views(&self) {
        if let Err(err) = self.refresh_list().await {
            warn!(error = %err, "list refresh failed");
        }
        let has_selection = self.state.borrow().selected.is_some();
        if has_selection {
            if let Err(err) = self.refresh_detail().await {
                warn!(error = %err, "detail refresh failed");
            }
        }
    }

    // ── Writes ──

    pub async fn create_campaign(
        &self,
        name: &str,
        description: &str,
        goal_eth: &str,
        duration_days: &str,
    ) -> Result<TxReceipt, ActionError> {
        let request = parse_create_request(name, description, goal_eth, duration_days)?;
        self.run_write(WriteKind::Create, move |gw| async move {
            gw.create_campaign(request).await
        })
        .await
    }

    /// Fund a tier of the selected campaign with exactly its fixed amount.
    /// Tiers are re-read first so a stale index is refused.
    pub async fn fund(&self, tier_index: usize) -> Result<TxReceipt, ActionError> {
        let address = self.selected_address()?;
        self.run_write(WriteKind::Fund, move |gw| async move {
            let tiers = gw.get_tiers(&address).await?;
            let tier = tiers
                .get(tier_index)
                .ok_or(GatewayError::InvalidTier(tier_index))?;
            gw.fund(&address, tier_index, tier.amount).await
        })
        .await
    }

    /// Withdraw raised funds. Ownership is re-read from the contract, not
    /// taken from the cached summary.
    pub async fn withdraw(&self) -> Result<TxReceipt, ActionError> {
        let address = self.selected_address()?;
        let user = self.user().ok_or(ActionError::NotConnected)?;
        self.run_write(WriteKind::Withdraw, move |gw| async move {
            let owner = gw.owner(&address).await?;
            if !owner.matches(&user) {
                return Err(GatewayError::NotOwner);
            }
            gw.withdraw(&address).await
        })
        .await
    }

    pub async fn refund(&self) -> Result<TxReceipt, ActionError> {
        let address = self.selected_address()?;
        self.run_write(WriteKind::Refund, move |gw| async move { gw.refund(&address).await })
            .await
    }

    fn selected_address(&self) -> Result<cf_api_types::CampaignAddress, ActionError> {
        let state = self.state.borrow();
        if state.user.is_none() {
            return Err(ActionError::NotConnected);
        }
        state
            .selected
            .as_ref()
            .map(|s| s.address.clone())
            .ok_or(ActionError::NoSelection)
    }

    /// Submit, await finalization, then re-read everything. Only one write may
    /// be in flight; a second is refused with [`ActionError::Busy`].
    async fn run_write<F, Fut>(&self, kind: WriteKind, submit: F) -> Result<TxReceipt, ActionError>
    where
        F: FnOnce(Rc<P::Gateway>) -> Fut,
        Fut: Future<Output = GatewayResult<PendingTx>>,
    {
        let gateway = self.gateway()?;
        let guard = self.begin_write(kind)?;

        let outcome = async move {
            let pending = submit(gateway.clone()).await?;
            gateway.wait(pending).await
        }
        .await;
        drop(guard);

        let receipt = outcome.map_err(|err| {
            error!(?kind, error = %err, "write failed");
            ActionError::from(err)
        })?;
        info!(?kind, tx_hash = %receipt.tx_hash, "write finalized");

        self.refresh_views().await;
        Ok(receipt)
    }

    fn begin_write(&self, kind: WriteKind) -> Result<InFlight<'_, P>, ActionError> {
        {
            let mut state = self.state.borrow_mut();
            if let Some(current) = state.in_flight {
                warn!(?kind, ?current, "write refused while another is pending");
                return Err(ActionError::Busy);
            }
            state.in_flight = Some(kind);
        }
        self.notify();
        Ok(InFlight { controller: self })
    }
}

/// Clears the in-flight marker however the write ends.
struct InFlight<'a, P: WalletProvider> {
    controller: &'a CampaignController<P>,
}

impl<P: WalletProvider> Drop for InFlight<'_, P> {
    fn drop(&mut self) {
        self.controller.update(|s| s.in_flight = None);
    }
}

pub fn parse_create_request(
    name: &str,
    description: &str,
    goal_eth: &str,
    duration_days: &str,
) -> Result<CreateCampaignRequest, ActionError> {
    let name = name.trim();
    if name.is_empty() || goal_eth.trim().is_empty() || duration_days.trim().is_empty() {
        return Err(ActionError::InvalidInput("All fields are required!".into()));
    }
    let goal = parse_eth(goal_eth)
        .ok_or_else(|| ActionError::InvalidInput(format!("invalid goal amount '{goal_eth}'")))?;
    let duration_days = duration_days
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| ActionError::InvalidInput(format!("invalid duration '{duration_days}'")))?;

    Ok(CreateCampaignRequest {
        name: name.to_owned(),
        description: description.trim().to_owned(),
        goal,
        duration_days,
    })
}

#[cfg(test)]
mod tests;
