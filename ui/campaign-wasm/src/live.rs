//! Handlers for the live contract mode.
//!
//! Every handler reports its outcome with a blocking `alert()`, the way the
//! page has always talked to users. The controller has already logged the
//! failure by the time an alert is shown.

use cf_api_types::{AccountAddress, TxReceipt};
use cf_campaign_core::{ActionError, CampaignController, SessionAction, WriteKind, view};
use cf_chain_client::GatewayError;
use cf_chain_evm::EvmWallet;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::config::AppConfig;
use crate::dom::{self, Elements};
use crate::events;
use crate::provider::{self, BrowserTransport};
use crate::render;
use crate::state;

pub async fn start(els: &Elements, config: &AppConfig) -> Result<(), JsValue> {
    let transport = match BrowserTransport::detect() {
        Ok(t) => t,
        Err(err) => {
            warn!(error = %err, "no injected wallet; connect will report it");
            render::paint(els, &view::render(&Default::default()));
            return events::bind_live(els);
        }
    };

    let wallet = EvmWallet::new(transport.clone(), config.factory)
        .with_poll_interval(config.receipt_poll);
    let controller = Rc::new(CampaignController::new(wallet));
    {
        let els = els.clone();
        controller.subscribe(move |view| render::paint(&els, view));
    }
    render::paint(els, &controller.view());
    state::set_live(controller);

    transport.on("accountsChanged", |accounts| {
        let accounts = provider::accounts_from_js(accounts);
        wasm_bindgen_futures::spawn_local(on_accounts_changed(accounts));
    })?;
    transport.on("chainChanged", |_| {
        if let Some(controller) = state::live() {
            controller.chain_changed();
        }
        dom::reload();
    })?;

    events::bind_live(els)?;

    if let Some(account) = transport.selected_address() {
        info!(account = %account, "wallet already authorized; reconnecting");
        on_connect(els).await;
    }
    Ok(())
}

fn controller() -> Option<Rc<state::LiveController>> {
    let controller = state::live();
    if controller.is_none() {
        dom::alert("MetaMask not found!");
    }
    controller
}

/// Alert text for a refused or failed action.
fn describe(kind: Option<WriteKind>, err: &ActionError) -> String {
    match err {
        ActionError::NotConnected | ActionError::NoSelection if kind.is_some() => {
            "Select a campaign and connect wallet first!".to_owned()
        }
        ActionError::NotConnected => "Connect wallet first!".to_owned(),
        ActionError::InvalidInput(msg) => msg.clone(),
        ActionError::Gateway(GatewayError::InvalidTier(_)) => "Invalid tier".to_owned(),
        ActionError::Gateway(GatewayError::NotOwner) => "Only owner can withdraw".to_owned(),
        other => match kind {
            Some(kind) => format!("{}: {other}", kind.failure_prefix()),
            None => other.to_string(),
        },
    }
}

fn report(kind: WriteKind, result: Result<TxReceipt, ActionError>) {
    match result {
        Ok(_) => dom::alert(kind.success_message()),
        Err(err) => dom::alert(&describe(Some(kind), &err)),
    }
}

pub async fn on_connect(_els: &Elements) {
    let Some(controller) = controller() else {
        return;
    };
    if let Err(err) = controller.connect().await {
        dom::alert(&format!("Wallet connection failed: {err}"));
    }
}

async fn on_accounts_changed(accounts: Vec<AccountAddress>) {
    let Some(controller) = state::live() else {
        return;
    };
    match controller.accounts_changed(accounts).await {
        Ok(SessionAction::Disconnected) => dom::alert("Wallet disconnected"),
        Ok(_) => {}
        Err(err) => dom::alert(&describe(None, &err)),
    }
}

pub async fn on_select(index: usize) {
    let Some(controller) = controller() else {
        return;
    };
    match controller.select(index).await {
        Ok(()) => {}
        Err(ActionError::Gateway(err)) => {
            dom::alert(&format!("Error loading campaign details: {err}"));
        }
        Err(err) => dom::alert(&describe(None, &err)),
    }
}

pub async fn on_create(_els: &Elements) {
    let Some(controller) = controller() else {
        return;
    };
    if controller.user().is_none() {
        dom::alert("Connect wallet first!");
        return;
    }
    // A cancelled prompt counts as an empty answer and fails validation.
    let name = dom::prompt("Enter campaign name:", "").unwrap_or_default();
    let description = dom::prompt("Enter description:", "").unwrap_or_default();
    let goal = dom::prompt("Enter goal (ETH):", "").unwrap_or_default();
    let duration = dom::prompt("Enter duration (days):", "").unwrap_or_default();

    let result = controller
        .create_campaign(&name, &description, &goal, &duration)
        .await;
    report(WriteKind::Create, result);
}

pub async fn on_fund(tier_index: usize) {
    let Some(controller) = controller() else {
        return;
    };
    report(WriteKind::Fund, controller.fund(tier_index).await);
}

pub async fn on_withdraw(_els: &Elements) {
    let Some(controller) = controller() else {
        return;
    };
    report(WriteKind::Withdraw, controller.withdraw().await);
}

pub async fn on_refund(_els: &Elements) {
    let Some(controller) = controller() else {
        return;
    };
    report(WriteKind::Refund, controller.refund().await);
}
