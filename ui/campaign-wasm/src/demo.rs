//! Demo mode: the page driven by a local [`DemoEngine`], no wallet needed.

use cf_api_types::AccountAddress;
use cf_campaign_core::{DemoEngine, DemoError};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::dom::{self, Elements};
use crate::events;
use crate::render;
use crate::state;

pub fn start(els: &Elements) -> Result<(), JsValue> {
    info!("running in demo mode; no transactions are sent");
    repaint(els);
    events::bind_demo(els)
}

fn repaint(els: &Elements) {
    let view = state::with_demo(|engine| engine.view());
    render::paint(els, &view);
}

/// `0x` + eight random hex digits + `ABCDEF`.
fn fabricated_address() -> AccountAddress {
    let n = (js_sys::Math::random() * f64::from(u32::MAX)) as u32;
    AccountAddress(format!("0x{n:08x}ABCDEF"))
}

fn apply(
    els: &Elements,
    op: impl FnOnce(&mut DemoEngine) -> Result<(), DemoError>,
    success: Option<&str>,
) {
    let result = state::with_demo(op);
    repaint(els);
    match result {
        Ok(()) => {
            if let Some(message) = success {
                dom::alert(message);
            }
        }
        Err(err) => {
            warn!(error = %err, "demo action refused");
            dom::alert(&err.to_string());
        }
    }
}

pub fn on_connect(els: &Elements) {
    state::with_demo(|engine| {
        if engine.user().is_some() {
            engine.disconnect();
        } else {
            engine.connect(fabricated_address());
        }
    });
    repaint(els);
}

pub fn on_create(els: &Elements) {
    if state::with_demo(|engine| engine.user().is_none()) {
        dom::alert("Connect wallet to create campaigns");
        return;
    }
    let Some(name) = dom::prompt("Campaign name:", "").filter(|n| !n.trim().is_empty()) else {
        return;
    };
    let goal = dom::prompt("Goal (ETH):", "10").unwrap_or_default();
    apply(els, |engine| engine.create(&name, &goal), None);
}

pub fn on_select(els: &Elements, index: usize) {
    apply(els, |engine| engine.select(index), None);
}

pub fn on_fund(els: &Elements, tier: usize) {
    apply(els, |engine| engine.fund(tier), None);
}

pub fn on_withdraw(els: &Elements) {
    apply(
        els,
        DemoEngine::withdraw,
        Some("Withdraw simulated: balance set to 0"),
    );
}

pub fn on_refund(els: &Elements) {
    apply(
        els,
        DemoEngine::refund,
        Some("Refund processed: contribution returned and balance updated"),
    );
}
