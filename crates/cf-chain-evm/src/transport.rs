use async_trait::async_trait;
use cf_chain_client::GatewayResult;
use serde_json::Value;
use std::time::Duration;

/// An EIP-1193 `request({ method, params })` channel to a wallet or node.
#[async_trait(?Send)]
pub trait Eip1193Transport {
    async fn request(&self, method: &str, params: Value) -> GatewayResult<Value>;

    /// Pause between receipt polls.
    async fn sleep(&self, duration: Duration);
}
