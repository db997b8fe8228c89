pub mod abi;
mod transport;

pub use transport::Eip1193Transport;

use abi::{ICrowdfunding, ICrowdfundingFactory};
use alloy_primitives::{Address, Bytes, U256, U64};
use alloy_sol_types::SolCall;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use cf_api_types::{
    AccountAddress, CampaignAddress, CampaignStatus, CampaignSummary, Tier, TxHash, TxReceipt,
};
use cf_chain_client::{
    CampaignGateway, CreateCampaignRequest, GatewayError, GatewayResult, PendingTx, WalletProvider,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Factory deployment the UI talks to unless configured otherwise.
pub const DEFAULT_FACTORY_ADDRESS: &str = "0xD94C35b46e1884Ac5003367a8f299EB8F0a0cd1b";

pub const DEFAULT_RECEIPT_POLL: Duration = Duration::from_millis(1500);

// ── JSON-RPC payloads ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRequest {
    from: Address,
    to: Address,
    data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<U256>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptResponse {
    #[serde(default)]
    block_number: Option<U64>,
    #[serde(default)]
    status: Option<U64>,
}

// ── Wallet ──

/// The injected wallet: grants accounts and binds gateways that sign as one
/// of them.
#[derive(Clone)]
pub struct EvmWallet<T> {
    transport: T,
    factory: Address,
    poll_interval: Duration,
}

impl<T: Eip1193Transport + Clone> EvmWallet<T> {
    pub fn new(transport: T, factory: Address) -> Self {
        Self {
            transport,
            factory,
            poll_interval: DEFAULT_RECEIPT_POLL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport + Clone> WalletProvider for EvmWallet<T> {
    type Gateway = EvmCampaignGateway<T>;

    async fn request_accounts(&self) -> GatewayResult<Vec<AccountAddress>> {
        let value = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await?;
        let accounts: Vec<String> = serde_json::from_value(value)
            .context("eth_requestAccounts result")
            .map_err(GatewayError::Malformed)?;
        Ok(accounts.into_iter().map(AccountAddress).collect())
    }

    fn gateway_for(&self, account: &AccountAddress) -> GatewayResult<Self::Gateway> {
        let sender = parse_address(&account.0)?;
        Ok(EvmCampaignGateway {
            transport: self.transport.clone(),
            factory: self.factory,
            sender,
            poll_interval: self.poll_interval,
        })
    }
}

// ── Gateway ──

/// [`CampaignGateway`] over `eth_call` / `eth_sendTransaction`.
pub struct EvmCampaignGateway<T> {
    transport: T,
    factory: Address,
    sender: Address,
    poll_interval: Duration,
}

impl<T: Eip1193Transport> EvmCampaignGateway<T> {
    pub fn sender(&self) -> Address {
        self.sender
    }

    async fn read<C: SolCall>(&self, to: Address, call: &C) -> GatewayResult<C::Return> {
        let tx = json!({
            "from": self.sender,
            "to": to,
            "data": Bytes::from(call.abi_encode()),
        });
        let value = self.transport.request("eth_call", json!([tx, "latest"])).await?;
        let data: Bytes = serde_json::from_value(value)
            .with_context(|| format!("{} result", C::SIGNATURE))
            .map_err(GatewayError::Malformed)?;
        C::abi_decode_returns(&data, true)
            .map_err(|err| GatewayError::Malformed(anyhow!("{} decode: {err}", C::SIGNATURE)))
    }

    async fn submit<C: SolCall>(
        &self,
        to: Address,
        call: &C,
        value: Option<U256>,
    ) -> GatewayResult<PendingTx> {
        let request = TransactionRequest {
            from: self.sender,
            to,
            data: Bytes::from(call.abi_encode()),
            value,
        };
        let params = serde_json::to_value([request])
            .context("transaction request")
            .map_err(GatewayError::Malformed)?;
        let result = self.transport.request("eth_sendTransaction", params).await?;
        let tx_hash = result
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| GatewayError::Malformed(anyhow!("eth_sendTransaction returned {result}")))?;

        info!(tx_hash = %tx_hash, call = C::SIGNATURE, "transaction submitted");
        Ok(PendingTx {
            tx_hash: TxHash(tx_hash),
        })
    }
}

#[async_trait(?Send)]
impl<T: Eip1193Transport> CampaignGateway for EvmCampaignGateway<T> {
    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignSummary>> {
        let campaigns = self
            .read(self.factory, &ICrowdfundingFactory::getAllCampaignsCall {})
            .await?
            ._0;

        Ok(campaigns
            .into_iter()
            .map(|c| CampaignSummary {
                address: CampaignAddress(c.campaignAddress.to_string()),
                owner: AccountAddress(c.owner.to_string()),
                name: c.name,
                description: c.description,
                goal: c.goal,
            })
            .collect())
    }

    async fn get_tiers(&self, campaign: &CampaignAddress) -> GatewayResult<Vec<Tier>> {
        let to = parse_address(&campaign.0)?;
        let tiers = self.read(to, &ICrowdfunding::getTiersCall {}).await?._0;
        Ok(tiers
            .into_iter()
            .map(|t| Tier {
                name: t.name,
                amount: t.amount,
                backers: t.backers.saturating_to::<u64>(),
            })
            .collect())
    }

    async fn get_status(&self, campaign: &CampaignAddress) -> GatewayResult<CampaignStatus> {
        let to = parse_address(&campaign.0)?;
        let code = self
            .read(to, &ICrowdfunding::getCampaignStatusCall {})
            .await?
            ._0;
        Ok(CampaignStatus::from_code(code))
    }

    async fn get_balance(&self, campaign: &CampaignAddress) -> GatewayResult<U256> {
        let to = parse_address(&campaign.0)?;
        Ok(self
            .read(to, &ICrowdfunding::getContractBalanceCall {})
            .await?
            ._0)
    }

    async fn owner(&self, campaign: &CampaignAddress) -> GatewayResult<AccountAddress> {
        let to = parse_address(&campaign.0)?;
        let owner = self.read(to, &ICrowdfunding::ownerCall {}).await?._0;
        Ok(AccountAddress(owner.to_string()))
    }

    async fn create_campaign(&self, req: CreateCampaignRequest) -> GatewayResult<PendingTx> {
        let call = ICrowdfundingFactory::createCampaignCall {
            name: req.name,
            description: req.description,
            goal: req.goal,
            durationInDays: U256::from(req.duration_days),
        };
        self.submit(self.factory, &call, None).await
    }

    async fn fund(
        &self,
        campaign: &CampaignAddress,
        tier_index: usize,
        value: U256,
    ) -> GatewayResult<PendingTx> {
        let to = parse_address(&campaign.0)?;
        let call = ICrowdfunding::fundCall {
            tierIndex: U256::from(tier_index),
        };
        self.submit(to, &call, Some(value)).await
    }

    async fn withdraw(&self, campaign: &CampaignAddress) -> GatewayResult<PendingTx> {
        let to = parse_address(&campaign.0)?;
        self.submit(to, &ICrowdfunding::withdrawCall {}, None).await
    }

    async fn refund(&self, campaign: &CampaignAddress) -> GatewayResult<PendingTx> {
        let to = parse_address(&campaign.0)?;
        self.submit(to, &ICrowdfunding::refundCall {}, None).await
    }

    async fn wait(&self, tx: PendingTx) -> GatewayResult<TxReceipt> {
        loop {
            let value = self
                .transport
                .request("eth_getTransactionReceipt", json!([tx.tx_hash.0]))
                .await?;

            if value.is_null() {
                debug!(tx_hash = %tx.tx_hash, "receipt pending");
                self.transport.sleep(self.poll_interval).await;
                continue;
            }

            let receipt: ReceiptResponse = serde_json::from_value(value)
                .context("eth_getTransactionReceipt result")
                .map_err(GatewayError::Malformed)?;

            // Pre-Byzantium receipts carry no status; treat inclusion as success.
            let success = receipt.status.is_none_or(|s| s == U64::from(1));
            if !success {
                return Err(GatewayError::Reverted { tx_hash: tx.tx_hash });
            }

            let block_number = receipt.block_number.map(|n| n.to::<u64>());
            info!(tx_hash = %tx.tx_hash, ?block_number, "transaction final");
            return Ok(TxReceipt {
                tx_hash: tx.tx_hash,
                block_number,
                success,
            });
        }
    }
}

pub fn parse_address(raw: &str) -> GatewayResult<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|err| GatewayError::InvalidInput(format!("invalid address '{raw}': {err}")))
}
