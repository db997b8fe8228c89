//! Paints an [`AppView`] into the page.
//!
//! Text from the chain is only ever set through `textContent`, never parsed
//! as markup.

use cf_api_types::CampaignStatus;
use cf_campaign_core::{AppView, CampaignCard, DetailView, TierRow};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{self, Elements};

const CARD_CLASS: &str = "bg-white rounded-xl shadow-sm hover:shadow-lg transition p-4 flex flex-col";
const TIER_CLASS: &str =
    "tier-card bg-gray-50 border border-gray-100 rounded-lg p-3 flex items-center justify-between";

fn status_class(status: CampaignStatus) -> &'static str {
    match status {
        CampaignStatus::Successful => "text-green-600",
        CampaignStatus::Failed => "text-red-600",
        CampaignStatus::Active | CampaignStatus::Unknown => "text-gray-500",
    }
}

pub fn paint(els: &Elements, view: &AppView) {
    if let Err(err) = try_paint(els, view) {
        tracing::error!(?err, "render failed");
    }
}

fn try_paint(els: &Elements, view: &AppView) -> Result<(), JsValue> {
    els.connect_wallet_btn.set_text_content(Some(&view.wallet_label));
    dom::set_disabled(&els.connect_wallet_btn, view.busy);
    dom::set_disabled(&els.create_campaign_btn, !view.create_enabled);

    paint_list(els, view)?;
    match &view.detail {
        Some(detail) => paint_detail(els, detail)?,
        None => paint_no_selection(els),
    }
    Ok(())
}

fn paint_list(els: &Elements, view: &AppView) -> Result<(), JsValue> {
    let grid = &els.campaigns_grid;
    dom::clear(grid);

    if let Some((text, is_error)) = view.list.placeholder() {
        let class = if is_error { "text-red-500" } else { "text-gray-500" };
        grid.append_child(&*dom::el_with_text("p", class, text)?)?;
        return Ok(());
    }
    if let cf_campaign_core::ListView::Cards(cards) = &view.list {
        for card in cards {
            grid.append_child(&*card_element(card, view.busy)?)?;
        }
    }
    Ok(())
}

fn card_element(card: &CampaignCard, busy: bool) -> Result<Element, JsValue> {
    let art = dom::create_element("article")?;
    art.set_class_name(CARD_CLASS);
    if card.selected {
        let _ = art.class_list().add_1("ring-2");
    }

    let head = dom::el_with_text("div", "flex items-start justify-between gap-2", "")?;
    let title = dom::create_element("div")?;
    title.append_child(&*dom::el_with_text("h3", "font-semibold text-gray-800", &card.name)?)?;
    title.append_child(&*dom::el_with_text(
        "p",
        "text-xs text-gray-500 mt-1 font-mono",
        &format!("Owner: {}", card.owner_short),
    )?)?;
    head.append_child(&title)?;

    let select = dom::el_with_text("button", "selectBtn text-sm text-blue-600", "Select")?;
    select.set_attribute("data-index", &card.index.to_string())?;
    if busy {
        select.set_attribute("disabled", "")?;
    }
    head.append_child(&select)?;
    art.append_child(&head)?;

    art.append_child(&*dom::el_with_text("p", "text-sm text-gray-600 mt-3", &card.description)?)?;

    let amounts = dom::el_with_text("div", "mt-4 flex items-center justify-between", "")?;
    amounts.append_child(&*dom::el_with_text(
        "div",
        "text-sm text-gray-500",
        &format!("Goal: {} ETH", card.goal),
    )?)?;
    amounts.append_child(&*dom::el_with_text(
        "div",
        "text-sm text-gray-500",
        &format!("Raised: {} ETH", card.raised),
    )?)?;
    art.append_child(&amounts)?;

    let track = dom::el_with_text("div", "mt-3 w-full bg-gray-100 rounded-full h-2 overflow-hidden", "")?;
    let bar = dom::el_with_text("div", "bg-blue-600 h-2", "")?;
    bar.set_attribute("style", &format!("width:{:.2}%", card.progress))?;
    track.append_child(&bar)?;
    art.append_child(&track)?;

    art.append_child(&*dom::el_with_text(
        "div",
        &format!("mt-2 text-sm font-semibold {}", status_class(card.status)),
        card.status.as_str(),
    )?)?;
    Ok(art)
}

fn paint_detail(els: &Elements, detail: &DetailView) -> Result<(), JsValue> {
    dom::set_text(&els.selected_name, &detail.name);
    dom::set_text(&els.selected_owner, &detail.owner_label);
    dom::set_text(&els.selected_balance, &detail.balance);
    els.selected_status.set_text_content(Some(&detail.status_label));
    els.selected_status
        .set_class_name(&format!("font-semibold {}", status_class(detail.status)));

    dom::set_disabled(&els.withdraw_btn, !detail.withdraw_enabled);
    dom::set_disabled(&els.refund_btn, !detail.refund_enabled);

    let list = &els.tiers_list;
    dom::clear(list);
    if let Some(error) = &detail.error {
        list.append_child(&*dom::el_with_text(
            "p",
            "text-sm text-red-500",
            &format!("Error loading campaign details: {error}"),
        )?)?;
    }
    for tier in &detail.tiers {
        list.append_child(&*tier_element(tier)?)?;
    }
    Ok(())
}

fn tier_element(tier: &TierRow) -> Result<Element, JsValue> {
    let row = dom::create_element("div")?;
    row.set_class_name(TIER_CLASS);

    let info = dom::create_element("div")?;
    info.append_child(&*dom::el_with_text("div", "text-sm font-medium", &tier.name)?)?;
    info.append_child(&*dom::el_with_text(
        "div",
        "text-xs text-gray-500",
        &format!("Amount: {} ETH \u{2022} Backers: {}", tier.amount, tier.backers),
    )?)?;
    row.append_child(&info)?;

    let btn: web_sys::HtmlButtonElement = dom::el_with_text(
        "button",
        "fundBtn px-3 py-1 rounded-md text-sm text-white bg-blue-600 hover:bg-blue-700",
        tier.fund_label,
    )?
    .dyn_into()?;
    btn.set_attribute("data-tier", &tier.index.to_string())?;
    dom::set_disabled(&btn, !tier.fund_enabled);
    row.append_child(&btn)?;
    Ok(row)
}

fn paint_no_selection(els: &Elements) {
    dom::set_text(&els.selected_name, "Select a campaign");
    dom::set_text(&els.selected_owner, "");
    dom::set_text(&els.selected_balance, "\u{2014}");
    els.selected_status.set_text_content(Some("\u{2014}"));
    els.selected_status.set_class_name("font-semibold text-gray-500");
    dom::clear(&els.tiers_list);
    dom::set_disabled(&els.withdraw_btn, true);
    dom::set_disabled(&els.refund_btn, true);
}
