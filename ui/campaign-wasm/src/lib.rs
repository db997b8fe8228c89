//! CrowdFund WASM front-end.
//!
//! Binds the campaign page to either the deployed contracts (through the
//! injected EIP-1193 wallet) or the local demo engine, depending on
//! [`config::AppConfig::mode`].

pub mod config;
pub mod demo;
pub mod dom;
pub mod events;
pub mod live;
pub mod logging;
pub mod provider;
pub mod render;
pub mod state;

use tracing::{error, info};
use wasm_bindgen::prelude::*;

use crate::config::{AppConfig, Mode};

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    init().await.inspect_err(|err| error!(?err, "start-up failed"))
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = AppConfig::from_document()
        .map_err(|err| JsValue::from_str(&format!("invalid configuration: {err:#}")))?;
    info!(mode = ?config.mode, factory = %config.factory, "starting");

    match config.mode {
        Mode::Live => live::start(&els, &config).await,
        Mode::Demo => demo::start(&els),
    }
}
