//! The injected `window.ethereum` provider as an [`Eip1193Transport`].

use anyhow::anyhow;
use async_trait::async_trait;
use cf_api_types::AccountAddress;
use cf_chain_client::{GatewayError, GatewayResult};
use cf_chain_evm::Eip1193Transport;
use js_sys::{Function, Promise, Reflect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// JSON-RPC "internal error", used when a rejection carries no code.
const INTERNAL_ERROR: i64 = -32603;

#[derive(Clone)]
pub struct BrowserTransport {
    ethereum: JsValue,
}

#[derive(Serialize)]
struct RequestArgs<'a> {
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct ProviderError {
    code: Option<i64>,
    message: Option<String>,
}

fn rpc_error(err: JsValue) -> GatewayError {
    match serde_wasm_bindgen::from_value::<ProviderError>(err.clone()) {
        Ok(e) => GatewayError::from_rpc(
            e.code.unwrap_or(INTERNAL_ERROR),
            e.message.unwrap_or_else(|| "provider request failed".into()),
        ),
        Err(_) => GatewayError::from_rpc(INTERNAL_ERROR, format!("{err:?}")),
    }
}

impl BrowserTransport {
    pub fn detect() -> GatewayResult<Self> {
        let window = web_sys::window().ok_or(GatewayError::NoProvider)?;
        let ethereum =
            Reflect::get(&window, &JsValue::from_str("ethereum")).map_err(|_| GatewayError::NoProvider)?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return Err(GatewayError::NoProvider);
        }
        Ok(Self { ethereum })
    }

    /// The account the wallet already exposes to this origin, if any.
    pub fn selected_address(&self) -> Option<AccountAddress> {
        Reflect::get(&self.ethereum, &JsValue::from_str("selectedAddress"))
            .ok()?
            .as_string()
            .filter(|a| !a.is_empty())
            .map(AccountAddress)
    }

    /// Subscribe to a provider event. The handler lives for the page.
    pub fn on(&self, event: &str, handler: impl FnMut(JsValue) + 'static) -> Result<(), JsValue> {
        let on: Function = Reflect::get(&self.ethereum, &JsValue::from_str("on"))?.dyn_into()?;
        let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(JsValue)>);
        on.call2(&self.ethereum, &JsValue::from_str(event), cb.as_ref().unchecked_ref())?;
        cb.forget();
        Ok(())
    }
}

/// Decode the account list carried by `accountsChanged`.
pub fn accounts_from_js(value: JsValue) -> Vec<AccountAddress> {
    serde_wasm_bindgen::from_value::<Vec<String>>(value)
        .unwrap_or_default()
        .into_iter()
        .map(AccountAddress)
        .collect()
}

#[async_trait(?Send)]
impl Eip1193Transport for BrowserTransport {
    async fn request(&self, method: &str, params: Value) -> GatewayResult<Value> {
        let args = RequestArgs { method, params }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| GatewayError::Malformed(anyhow!("encoding {method} params: {e}")))?;

        let request: Function = Reflect::get(&self.ethereum, &JsValue::from_str("request"))
            .and_then(|f| f.dyn_into().map_err(JsValue::from))
            .map_err(|_| GatewayError::NoProvider)?;
        let promise: Promise = request
            .call1(&self.ethereum, &args)
            .map_err(rpc_error)?
            .dyn_into()
            .map_err(|_| GatewayError::Malformed(anyhow!("{method} did not return a promise")))?;

        let result = JsFuture::from(promise).await.map_err(rpc_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| GatewayError::Malformed(anyhow!("decoding {method} result: {e}")))
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
