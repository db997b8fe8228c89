//! Event binding.
//!
//! Buttons with a fixed id get one listener each. Cards and tier rows are
//! rebuilt on every paint, so their clicks are caught once on the container
//! and resolved through `data-index` / `data-tier`.

use crate::demo;
use crate::dom::{self, Elements};
use crate::live;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Helper: attach sync click handler.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Helper: delegated click on a container, resolved to the index stored in
/// `data-<attr>` on the clicked child.
macro_rules! on_index_click {
    ($el:expr, $attr:expr, $handler:expr) => {{
        on_click!($el, move |ev: web_sys::MouseEvent| {
            if let Some(index) = dom::index_from_event(&ev, $attr) {
                $handler(index);
            }
        });
    }};
}

/// Bind the live-contract handlers. Call once after init.
pub fn bind_live(els: &Elements) -> Result<(), JsValue> {
    on_click_async!(els.connect_wallet_btn, els, live::on_connect);
    on_click_async!(els.create_campaign_btn, els, live::on_create);
    on_click_async!(els.withdraw_btn, els, live::on_withdraw);
    on_click_async!(els.refund_btn, els, live::on_refund);

    on_index_click!(els.campaigns_grid, "index", |index| {
        wasm_bindgen_futures::spawn_local(live::on_select(index));
    });
    on_index_click!(els.tiers_list, "tier", |tier| {
        wasm_bindgen_futures::spawn_local(live::on_fund(tier));
    });
    Ok(())
}

/// Bind the demo handlers. Everything is synchronous.
pub fn bind_demo(els: &Elements) -> Result<(), JsValue> {
    {
        let els2 = els.clone();
        on_click!(els.connect_wallet_btn, move |_: web_sys::MouseEvent| {
            demo::on_connect(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.create_campaign_btn, move |_: web_sys::MouseEvent| {
            demo::on_create(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.withdraw_btn, move |_: web_sys::MouseEvent| {
            demo::on_withdraw(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_click!(els.refund_btn, move |_: web_sys::MouseEvent| {
            demo::on_refund(&els2);
        });
    }
    {
        let els2 = els.clone();
        on_index_click!(els.campaigns_grid, "index", |index| demo::on_select(&els2, index));
    }
    {
        let els2 = els.clone();
        on_index_click!(els.tiers_list, "tier", |tier| demo::on_fund(&els2, tier));
    }
    Ok(())
}
