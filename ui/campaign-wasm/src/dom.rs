//! DOM element bindings.
//!
//! Every element the page needs is resolved once at start-up into
//! [`Elements`]; a missing id aborts start-up with a console error.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

// ── Helpers ──

fn doc() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn window() -> Option<web_sys::Window> {
    web_sys::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    doc()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .create_element(tag)
}

/// Create `<tag class="...">text</tag>`.
pub fn el_with_text(tag: &str, class: &str, text: &str) -> Result<Element, JsValue> {
    let el = create_element(tag)?;
    el.set_class_name(class);
    el.set_text_content(Some(text));
    Ok(el)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_inner_html("");
}

pub fn set_disabled(btn: &HtmlButtonElement, disabled: bool) {
    btn.set_disabled(disabled);
    let _ = btn
        .class_list()
        .toggle_with_force("opacity-50", disabled);
    let _ = btn
        .class_list()
        .toggle_with_force("cursor-not-allowed", disabled);
}

pub fn alert(message: &str) {
    if let Some(w) = window() {
        let _ = w.alert_with_message(message);
    }
}

/// `None` when the user cancels the dialog.
pub fn prompt(message: &str, default: &str) -> Option<String> {
    window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}

pub fn reload() {
    if let Some(w) = window() {
        let _ = w.location().reload();
    }
}

pub fn query_param(name: &str) -> Option<String> {
    let search = window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get(name)
}

/// Walk up from an event target to the nearest element carrying
/// `data-<attr>` and parse it as an index.
pub fn index_from_event(event: &web_sys::Event, attr: &str) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let holder = target.closest(&format!("[data-{attr}]")).ok()??;
    holder.get_attribute(&format!("data-{attr}"))?.parse().ok()
}

// ── Elements struct ──

/// All DOM element references used by the campaign page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Header
    pub connect_wallet_btn: HtmlButtonElement,
    pub create_campaign_btn: HtmlButtonElement,

    // List
    pub campaigns_grid: Element,

    // Detail
    pub selected_name: Element,
    pub selected_owner: Element,
    pub selected_balance: Element,
    pub selected_status: HtmlElement,
    pub tiers_list: Element,
    pub withdraw_btn: HtmlButtonElement,
    pub refund_btn: HtmlButtonElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_btn {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            connect_wallet_btn: get_btn!("connectWalletBtn"),
            create_campaign_btn: get_btn!("createCampaignBtn"),

            campaigns_grid: get_el!("campaignsGrid"),

            selected_name: get_el!("selectedName"),
            selected_owner: get_el!("selectedOwner"),
            selected_balance: get_el!("selectedBalance"),
            selected_status: get_html!("selectedStatus"),
            tiers_list: get_el!("tiersList"),
            withdraw_btn: get_btn!("withdrawBtn"),
            refund_btn: get_btn!("refundBtn"),
        })
    }
}
