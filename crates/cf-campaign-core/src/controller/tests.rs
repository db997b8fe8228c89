use super::*;
use alloy_primitives::U256;
use async_trait::async_trait;
use cf_api_types::{CampaignAddress, CampaignStatus, CampaignSummary, Tier, TxHash};
use std::collections::HashMap;

const OWNER: &str = "0x87B2cD34fA9e1234567890aBcDEF1234567890ab";
const BACKER: &str = "0x12F3a4567890abcdef1234567890ABCDEF123456";

fn eth(s: &str) -> U256 {
    parse_eth(s).unwrap()
}

struct FakeCampaign {
    summary: CampaignSummary,
    tiers: Vec<Tier>,
    status: CampaignStatus,
    balance: U256,
}

enum Effect {
    Fund { campaign: usize, tier: usize, value: U256 },
    Withdraw(usize),
    Refund(usize),
    Create(CampaignSummary),
}

#[derive(Default)]
struct Chain {
    campaigns: Vec<FakeCampaign>,
    fail_reads: bool,
    revert: bool,
    /// Receipts stay pending while set.
    hold_receipts: bool,
    pending: HashMap<String, Effect>,
    submitted: Vec<String>,
    tier_reads: usize,
}

impl Chain {
    fn position(&self, address: &CampaignAddress) -> GatewayResult<usize> {
        self.campaigns
            .iter()
            .position(|c| &c.summary.address == address)
            .ok_or_else(|| GatewayError::from_rpc(-32000, "execution reverted"))
    }

    fn read_guard(&self) -> GatewayResult<()> {
        if self.fail_reads {
            return Err(GatewayError::from_rpc(-32603, "node unavailable"));
        }
        Ok(())
    }

    fn queue(&mut self, effect: Effect) -> PendingTx {
        let hash = format!("0x{:04x}", self.submitted.len() + 1);
        self.submitted.push(hash.clone());
        self.pending.insert(hash.clone(), effect);
        PendingTx {
            tx_hash: TxHash(hash),
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Fund {
                campaign,
                tier,
                value,
            } => {
                let c = &mut self.campaigns[campaign];
                c.balance += value;
                c.tiers[tier].backers += 1;
                if c.balance >= c.summary.goal {
                    c.status = CampaignStatus::Successful;
                }
            }
            Effect::Withdraw(campaign) => self.campaigns[campaign].balance = U256::ZERO,
            Effect::Refund(campaign) => {
                let c = &mut self.campaigns[campaign];
                c.balance -= c.tiers[0].amount;
                c.tiers[0].backers -= 1;
            }
            Effect::Create(summary) => self.campaigns.push(FakeCampaign {
                summary,
                tiers: Vec::new(),
                status: CampaignStatus::Active,
                balance: U256::ZERO,
            }),
        }
    }
}

#[derive(Clone)]
struct FakeWallet {
    chain: Rc<RefCell<Chain>>,
    accounts: Rc<RefCell<GatewayResult<Vec<AccountAddress>>>>,
}

struct FakeGateway {
    chain: Rc<RefCell<Chain>>,
    account: AccountAddress,
}

#[async_trait(?Send)]
impl WalletProvider for FakeWallet {
    type Gateway = FakeGateway;

    async fn request_accounts(&self) -> GatewayResult<Vec<AccountAddress>> {
        match &*self.accounts.borrow() {
            Ok(accounts) => Ok(accounts.clone()),
            Err(_) => Err(GatewayError::Rejected),
        }
    }

    fn gateway_for(&self, account: &AccountAddress) -> GatewayResult<FakeGateway> {
        Ok(FakeGateway {
            chain: self.chain.clone(),
            account: account.clone(),
        })
    }
}

#[async_trait(?Send)]
impl CampaignGateway for FakeGateway {
    async fn list_campaigns(&self) -> GatewayResult<Vec<CampaignSummary>> {
        let chain = self.chain.borrow();
        chain.read_guard()?;
        Ok(chain.campaigns.iter().map(|c| c.summary.clone()).collect())
    }

    async fn get_tiers(&self, campaign: &CampaignAddress) -> GatewayResult<Vec<Tier>> {
        let mut chain = self.chain.borrow_mut();
        chain.read_guard()?;
        chain.tier_reads += 1;
        let i = chain.position(campaign)?;
        Ok(chain.campaigns[i].tiers.clone())
    }

    async fn get_status(&self, campaign: &CampaignAddress) -> GatewayResult<CampaignStatus> {
        let chain = self.chain.borrow();
        chain.read_guard()?;
        Ok(chain.campaigns[chain.position(campaign)?].status)
    }

    async fn get_balance(&self, campaign: &CampaignAddress) -> GatewayResult<U256> {
        let chain = self.chain.borrow();
        chain.read_guard()?;
        Ok(chain.campaigns[chain.position(campaign)?].balance)
    }

    async fn owner(&self, campaign: &CampaignAddress) -> GatewayResult<AccountAddress> {
        let chain = self.chain.borrow();
        Ok(chain.campaigns[chain.position(campaign)?].summary.owner.clone())
    }

    async fn create_campaign(&self, req: CreateCampaignRequest) -> GatewayResult<PendingTx> {
        let mut chain = self.chain.borrow_mut();
        let address = CampaignAddress(format!("0x{:040x}", chain.campaigns.len() + 1));
        let summary = CampaignSummary {
            address,
            owner: self.account.clone(),
            name: req.name,
            description: req.description,
            goal: req.goal,
        };
        Ok(chain.queue(Effect::Create(summary)))
    }

    async fn fund(
        &self,
        campaign: &CampaignAddress,
        tier_index: usize,
        value: U256,
    ) -> GatewayResult<PendingTx> {
        let mut chain = self.chain.borrow_mut();
        let i = chain.position(campaign)?;
        assert_eq!(chain.campaigns[i].tiers[tier_index].amount, value);
        Ok(chain.queue(Effect::Fund {
            campaign: i,
            tier: tier_index,
            value,
        }))
    }

    async fn withdraw(&self, campaign: &CampaignAddress) -> GatewayResult<PendingTx> {
        let mut chain = self.chain.borrow_mut();
        let i = chain.position(campaign)?;
        Ok(chain.queue(Effect::Withdraw(i)))
    }

    async fn refund(&self, campaign: &CampaignAddress) -> GatewayResult<PendingTx> {
        let mut chain = self.chain.borrow_mut();
        let i = chain.position(campaign)?;
        Ok(chain.queue(Effect::Refund(i)))
    }

    async fn wait(&self, tx: PendingTx) -> GatewayResult<TxReceipt> {
        while self.chain.borrow().hold_receipts {
            tokio::task::yield_now().await;
        }
        let mut chain = self.chain.borrow_mut();
        let effect = chain.pending.remove(&tx.tx_hash.0).expect("known tx");
        if chain.revert {
            return Err(GatewayError::Reverted { tx_hash: tx.tx_hash });
        }
        chain.apply(effect);
        Ok(TxReceipt {
            tx_hash: tx.tx_hash,
            block_number: Some(1),
            success: true,
        })
    }
}

fn campaign(n: u8, owner: &str, goal: &str, balance: &str, status: CampaignStatus) -> FakeCampaign {
    FakeCampaign {
        summary: CampaignSummary {
            address: CampaignAddress(format!("0x{:040x}", 0xa0 + n as u32)),
            owner: AccountAddress(owner.into()),
            name: format!("Campaign {n}"),
            description: "demo".into(),
            goal: eth(goal),
        },
        tiers: vec![
            Tier {
                name: "Bronze".into(),
                amount: eth("0.1"),
                backers: 3,
            },
            Tier {
                name: "Silver".into(),
                amount: eth("0.5"),
                backers: 8,
            },
        ],
        status,
        balance: eth(balance),
    }
}

fn setup(user: &str) -> (Rc<RefCell<Chain>>, CampaignController<FakeWallet>) {
    let chain = Rc::new(RefCell::new(Chain {
        campaigns: vec![
            campaign(0, OWNER, "100", "64", CampaignStatus::Active),
            campaign(1, OWNER, "20", "20", CampaignStatus::Successful),
            campaign(2, OWNER, "50", "12", CampaignStatus::Failed),
        ],
        ..Chain::default()
    }));
    let wallet = FakeWallet {
        chain: chain.clone(),
        accounts: Rc::new(RefCell::new(Ok(vec![AccountAddress(user.into())]))),
    };
    (chain, CampaignController::new(wallet))
}

#[tokio::test]
async fn connect_loads_campaigns_with_live_values() -> anyhow::Result<()> {
    let (_chain, controller) = setup(BACKER);
    let account = controller.connect().await?;
    assert_eq!(account.0, BACKER);

    let state = controller.snapshot();
    let rows = state.list.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].balance, eth("64"));
    assert_eq!(rows[1].status, CampaignStatus::Successful);
    assert_eq!(controller.view().wallet_label, "0x12F3...3456");
    Ok(())
}

#[tokio::test]
async fn connect_failures_leave_session_empty() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    let wallet_accounts = FakeWallet {
        chain: chain.clone(),
        accounts: Rc::new(RefCell::new(Ok(Vec::new()))),
    };
    let empty = CampaignController::new(wallet_accounts);
    assert!(matches!(empty.connect().await, Err(ActionError::NoAccounts)));
    assert!(empty.user().is_none());

    let rejecting = CampaignController::new(FakeWallet {
        chain,
        accounts: Rc::new(RefCell::new(Err(GatewayError::Rejected))),
    });
    let err = rejecting.connect().await.unwrap_err();
    assert!(matches!(err, ActionError::Gateway(GatewayError::Rejected)));

    assert!(matches!(controller.select(0).await, Err(ActionError::NotConnected)));
    Ok(())
}

#[tokio::test]
async fn failing_read_replaces_whole_list() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;
    assert_eq!(controller.snapshot().list.rows().len(), 3);

    chain.borrow_mut().fail_reads = true;
    assert!(controller.refresh_list().await.is_err());
    assert!(matches!(controller.snapshot().list, ListState::Failed(_)));
    assert_eq!(controller.view().list, crate::view::ListView::Failed);
    Ok(())
}

#[tokio::test]
async fn fund_rereads_tiers_then_refreshes_after_finalization() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;
    let reads_before = chain.borrow().tier_reads;

    controller.fund(1).await?;

    // one re-read before submitting, one in the post-write refresh
    assert_eq!(chain.borrow().tier_reads, reads_before + 2);

    let state = controller.snapshot();
    let detail = state.detail.expect("detail loaded");
    assert_eq!(detail.balance, eth("64.5"));
    assert_eq!(detail.tiers[1].backers, 9);
    assert_eq!(state.list.rows()[0].balance, eth("64.5"));
    assert!(state.in_flight.is_none());
    Ok(())
}

#[tokio::test]
async fn stale_tier_index_is_refused_before_submission() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;

    chain.borrow_mut().campaigns[0].tiers.truncate(1);
    let err = controller.fund(1).await.unwrap_err();
    assert!(matches!(err, ActionError::Gateway(GatewayError::InvalidTier(1))));
    assert!(chain.borrow().submitted.is_empty());
    Ok(())
}

#[tokio::test]
async fn withdraw_checks_owner_on_chain() -> anyhow::Result<()> {
    let (chain, controller) = setup(&OWNER.to_lowercase());
    controller.connect().await?;
    controller.select(1).await?;
    assert!(controller.view().detail.unwrap().withdraw_enabled);

    // Ownership moved on-chain; the cached summary still names the user.
    chain.borrow_mut().campaigns[1].summary.owner = AccountAddress(BACKER.into());
    let err = controller.withdraw().await.unwrap_err();
    assert!(matches!(err, ActionError::Gateway(GatewayError::NotOwner)));
    assert!(chain.borrow().submitted.is_empty());

    chain.borrow_mut().campaigns[1].summary.owner = AccountAddress(OWNER.into());
    controller.withdraw().await?;
    assert_eq!(controller.snapshot().detail.unwrap().balance, U256::ZERO);
    Ok(())
}

#[tokio::test]
async fn refund_on_failed_campaign_refreshes_detail() -> anyhow::Result<()> {
    let (_chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(2).await?;
    assert!(controller.view().detail.unwrap().refund_enabled);

    controller.refund().await?;
    let detail = controller.snapshot().detail.unwrap();
    assert_eq!(detail.balance, eth("11.9"));
    assert_eq!(detail.tiers[0].backers, 2);
    Ok(())
}

#[tokio::test]
async fn reverted_write_keeps_previous_state() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;
    let before = controller.snapshot();

    chain.borrow_mut().revert = true;
    let err = controller.fund(0).await.unwrap_err();
    assert!(matches!(err, ActionError::Gateway(GatewayError::Reverted { .. })));

    let after = controller.snapshot();
    assert_eq!(after.detail, before.detail);
    assert_eq!(after.list, before.list);
    assert!(after.in_flight.is_none());
    Ok(())
}

async fn until_in_flight(controller: &CampaignController<FakeWallet>) {
    while controller.snapshot().in_flight.is_none() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn second_write_while_pending_is_refused() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;
    chain.borrow_mut().hold_receipts = true;

    let (first, second) = tokio::join!(controller.fund(0), async {
        until_in_flight(&controller).await;
        let second = controller.fund(1).await;
        chain.borrow_mut().hold_receipts = false;
        second
    });
    assert!(first.is_ok());
    assert!(matches!(second, Err(ActionError::Busy)));
    assert_eq!(chain.borrow().submitted.len(), 1);
    assert_eq!(controller.snapshot().detail.unwrap().tiers[0].backers, 4);
    Ok(())
}

#[tokio::test]
async fn reconnect_does_not_release_pending_write() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;
    chain.borrow_mut().hold_receipts = true;

    let (first, second) = tokio::join!(controller.fund(0), async {
        until_in_flight(&controller).await;
        controller.accounts_changed(Vec::new()).await?;
        assert!(controller.view().busy);

        controller.connect().await?;
        controller.select(0).await?;
        let second = controller.fund(1).await;
        assert!(controller.view().busy);
        chain.borrow_mut().hold_receipts = false;
        Ok::<_, ActionError>(second)
    });
    assert!(first.is_ok());
    assert!(matches!(second?, Err(ActionError::Busy)));
    assert_eq!(chain.borrow().submitted.len(), 1);

    let state = controller.snapshot();
    assert!(state.in_flight.is_none());
    assert_eq!(state.detail.unwrap().tiers[0].backers, 4);
    Ok(())
}

#[tokio::test]
async fn listeners_see_busy_then_idle() -> anyhow::Result<()> {
    let (_chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.subscribe(move |view| sink.borrow_mut().push(view.busy));

    controller.fund(0).await?;
    let seen = seen.borrow();
    assert_eq!(seen.first(), Some(&true));
    assert_eq!(seen.last(), Some(&false));
    Ok(())
}

#[tokio::test]
async fn account_and_network_notifications() -> anyhow::Result<()> {
    let (_chain, controller) = setup(BACKER);
    controller.connect().await?;
    controller.select(0).await?;

    let switched = controller
        .accounts_changed(vec![AccountAddress(OWNER.into())])
        .await?;
    assert_eq!(switched, SessionAction::Connected(AccountAddress(OWNER.into())));
    assert_eq!(controller.user(), Some(AccountAddress(OWNER.into())));
    assert!(controller.snapshot().detail.is_some());

    let gone = controller.accounts_changed(Vec::new()).await?;
    assert_eq!(gone, SessionAction::Disconnected);
    let state = controller.snapshot();
    assert!(state.user.is_none());
    assert!(state.selected.is_none());
    assert!(matches!(controller.refund().await, Err(ActionError::NotConnected)));

    controller.connect().await?;
    assert_eq!(controller.chain_changed(), SessionAction::Reload);
    assert!(controller.snapshot().list.rows().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_validates_then_submits() -> anyhow::Result<()> {
    let (chain, controller) = setup(BACKER);
    controller.connect().await?;

    let err = controller.create_campaign("", "x", "10", "30").await.unwrap_err();
    assert!(matches!(err, ActionError::InvalidInput(_)));
    let err = controller
        .create_campaign("Solar", "x", "ten", "30")
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::InvalidInput(_)));
    let err = controller
        .create_campaign("Solar", "x", "10", "0")
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::InvalidInput(_)));
    assert!(chain.borrow().submitted.is_empty());

    controller
        .create_campaign("Solar Roofs", "Panels", "10", "30")
        .await?;
    let rows = controller.snapshot().list.rows().to_vec();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3].summary.name, "Solar Roofs");
    assert_eq!(rows[3].summary.goal, eth("10"));
    assert!(rows[3].summary.owner.matches(&AccountAddress(BACKER.into())));
    Ok(())
}
