//! Page-wide singletons.
//!
//! WASM runs on one thread, so the controller and the demo engine sit in
//! `thread_local!` slots that event handlers reach without threading
//! references through every closure.

use cf_campaign_core::{CampaignController, DemoEngine};
use cf_chain_evm::EvmWallet;
use std::cell::RefCell;
use std::rc::Rc;

use crate::provider::BrowserTransport;

pub type LiveController = CampaignController<EvmWallet<BrowserTransport>>;

thread_local! {
    static LIVE: RefCell<Option<Rc<LiveController>>> = const { RefCell::new(None) };
    static DEMO: RefCell<DemoEngine> = RefCell::new(DemoEngine::seeded());
}

pub fn set_live(controller: Rc<LiveController>) {
    LIVE.with(|slot| *slot.borrow_mut() = Some(controller));
}

/// `None` when the page has no injected wallet.
pub fn live() -> Option<Rc<LiveController>> {
    LIVE.with(|slot| slot.borrow().clone())
}

/// Run a closure with mutable access to the demo engine. The closure must
/// not call back into this function.
pub fn with_demo<F, R>(f: F) -> R
where
    F: FnOnce(&mut DemoEngine) -> R,
{
    DEMO.with(|engine| f(&mut engine.borrow_mut()))
}
