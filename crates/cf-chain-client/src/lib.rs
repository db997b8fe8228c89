use alloy_primitives::U256;
use async_trait::async_trait;
use cf_api_types::{
    AccountAddress, CampaignAddress, CampaignStatus, CampaignSummary, Tier, TxHash, TxReceipt,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no wallet provider found")]
    NoProvider,
    #[error("request rejected in wallet")]
    Rejected,
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
    #[error("malformed response: {0:#}")]
    Malformed(anyhow::Error),
    #[error("invalid tier {0}")]
    InvalidTier(usize),
    #[error("only the campaign owner can withdraw")]
    NotOwner,
    #[error("{0}")]
    InvalidInput(String),
}

impl GatewayError {
    /// EIP-1193 code 4001: the user dismissed the wallet prompt.
    pub const USER_REJECTED_CODE: i64 = 4001;

    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == Self::USER_REJECTED_CODE {
            return Self::Rejected;
        }
        Self::Rpc {
            code,
            message: message.into(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub description: String,
    pub goal: U256,
    pub duration_days: u64,
}

/// A submitted write whose effects are not yet final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: TxHash,
}

/// Account access through the injected wallet.
#[async_trait(?Send)]
pub trait WalletProvider {
    type Gateway: CampaignGateway;

    /// Prompts the user when the site is not yet authorized. A dismissed
    /// prompt surfaces as [`GatewayError::Rejected`].
    async fn request_accounts(&self) -> GatewayResult<Vec<AccountAddress>>;

    /// Contract handles that sign writes as `account`.
    fn gateway_for(&self, account: &AccountAddress) -> GatewayResult<Self::Gateway>;
}

/// Remote reads and writes against the campaign factory and per-campaign
/// contracts. Writes return a [`PendingTx`]; callers must [`wait`] on it
/// before reading back.
///
/// [`wait`]: CampaignGateway::wait
#[async_trait(?Send)]
pub trait CampaignGateway {
    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignSummary>>;
    async fn get_tiers(&self, campaign: &CampaignAddress) -> GatewayResult<Vec<Tier>>;
    async fn get_status(&self, campaign: &CampaignAddress) -> GatewayResult<CampaignStatus>;
    async fn get_balance(&self, campaign: &CampaignAddress) -> GatewayResult<U256>;
    async fn owner(&self, campaign: &CampaignAddress) -> GatewayResult<AccountAddress>;

    async fn create_campaign(&self, req: CreateCampaignRequest) -> GatewayResult<PendingTx>;
    async fn fund(
        &self,
        campaign: &CampaignAddress,
        tier_index: usize,
        value: U256,
    ) -> GatewayResult<PendingTx>;
    async fn withdraw(&self, campaign: &CampaignAddress) -> GatewayResult<PendingTx>;
    async fn refund(&self, campaign: &CampaignAddress) -> GatewayResult<PendingTx>;

    /// Block until `tx` is final. A reverted transaction is an error.
    async fn wait(&self, tx: PendingTx) -> GatewayResult<TxReceipt>;
}
