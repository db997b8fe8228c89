use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits of the native unit (1 ETH = 10^18 wei).
pub const ETHER_DECIMALS: u32 = 18;

/// Fractional digits shown on list cards.
pub const SUMMARY_DECIMALS: u32 = 2;

/// Fractional digits shown in the detail panel and tier rows.
pub const DETAIL_DECIMALS: u32 = 4;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CampaignStatus {
    #[default]
    Active,
    Successful,
    Failed,
    Unknown,
}

impl CampaignStatus {
    /// Maps the contract's `CampaignState` enum discriminant.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Active,
            1 => Self::Successful,
            2 => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Successful => "Successful",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    /// Hex addresses compare case-insensitively (EIP-55 checksums only change case).
    pub fn matches(&self, other: &AccountAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn short(&self) -> String {
        shorten_address(&self.0)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CampaignAddress(pub String);

impl fmt::Display for CampaignAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignSummary {
    pub address: CampaignAddress,
    pub owner: AccountAddress,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub goal: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tier {
    pub name: String,
    pub amount: U256,
    pub backers: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

// ── Display helpers ──

/// Render a wei amount as ETH rounded half-up to `decimals` fractional digits.
pub fn format_eth(wei: U256, decimals: u32) -> String {
    let decimals = decimals.min(ETHER_DECIMALS);
    let ten = U256::from(10u8);
    let unit = ten.pow(U256::from(ETHER_DECIMALS - decimals));
    let scale = ten.pow(U256::from(decimals));

    let scaled = wei.saturating_add(unit / U256::from(2u8)) / unit;
    let whole = scaled / scale;
    if decimals == 0 {
        return whole.to_string();
    }

    // frac < 10^decimals <= 10^18, always fits
    let frac = (scaled % scale).to::<u64>();
    format!("{whole}.{frac:0width$}", width = decimals as usize)
}

/// Parse a decimal ETH amount ("0.5", "12") into wei.
pub fn parse_eth(input: &str) -> Option<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    alloy_primitives::utils::parse_ether(trimmed).ok()
}

/// Share of `goal` already raised, in percent, clamped to `[0, 100]`.
/// The result is truncated to whole basis points (0.01%), never rounded up.
/// A zero goal yields 0 rather than a division artefact.
pub fn progress_percent(balance: U256, goal: U256) -> f64 {
    if goal.is_zero() {
        return 0.0;
    }
    let full = U256::from(10_000u32);
    let basis_points = (balance.saturating_mul(full) / goal).min(full);
    basis_points.to::<u64>() as f64 / 100.0
}

/// `0x87B2...90ab` style shortening used across the UI.
pub fn shorten_address(addr: &str) -> String {
    if addr.len() <= 10 || !addr.is_ascii() {
        return addr.to_owned();
    }
    format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(s: &str) -> U256 {
        parse_eth(s).expect("valid ether amount")
    }

    #[test]
    fn formats_summary_and_detail_precision() {
        assert_eq!(format_eth(eth("64.5"), SUMMARY_DECIMALS), "64.50");
        assert_eq!(format_eth(eth("64.5"), DETAIL_DECIMALS), "64.5000");
        assert_eq!(format_eth(U256::ZERO, SUMMARY_DECIMALS), "0.00");
        assert_eq!(format_eth(eth("0.05"), DETAIL_DECIMALS), "0.0500");
    }

    #[test]
    fn format_rounds_half_up() {
        assert_eq!(format_eth(eth("1.005"), 2), "1.01");
        assert_eq!(format_eth(eth("1.004"), 2), "1.00");
        assert_eq!(format_eth(eth("9.999"), 2), "10.00");
        assert_eq!(format_eth(eth("2.6"), 0), "3");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_eth(""), None);
        assert_eq!(parse_eth("   "), None);
        assert_eq!(parse_eth("ten"), None);
        assert_eq!(parse_eth("1"), Some(U256::from(10u64).pow(U256::from(18u8))));
    }

    #[test]
    fn progress_is_clamped_and_safe_for_zero_goal() {
        assert_eq!(progress_percent(eth("64"), eth("100")), 64.0);
        assert_eq!(progress_percent(eth("20"), eth("20")), 100.0);
        assert_eq!(progress_percent(eth("30"), eth("20")), 100.0);
        assert_eq!(progress_percent(eth("5"), U256::ZERO), 0.0);
        assert_eq!(progress_percent(eth("1"), eth("3")), 33.33);
    }

    #[test]
    fn progress_truncates_to_basis_points() {
        assert_eq!(progress_percent(eth("2"), eth("3")), 66.66);
        assert_eq!(progress_percent(U256::from(99_999u32), U256::from(100_000u32)), 99.99);
        assert_eq!(progress_percent(U256::from(1u8), U256::from(20_000u32)), 0.0);
    }

    #[test]
    fn status_maps_closed_set_with_unknown_fallback() {
        assert_eq!(CampaignStatus::from_code(0), CampaignStatus::Active);
        assert_eq!(CampaignStatus::from_code(1), CampaignStatus::Successful);
        assert_eq!(CampaignStatus::from_code(2), CampaignStatus::Failed);
        assert_eq!(CampaignStatus::from_code(7), CampaignStatus::Unknown);
        assert_eq!(CampaignStatus::Successful.to_string(), "Successful");
    }

    #[test]
    fn addresses_compare_case_insensitively() {
        let a = AccountAddress("0x87B2cD34fA9e1234567890aBcDEF1234567890ab".into());
        let b = AccountAddress("0x87b2cd34fa9e1234567890abcdef1234567890AB".into());
        assert!(a.matches(&b));
        assert_eq!(a.short(), "0x87B2...90ab");
        assert_eq!(shorten_address("0xabc"), "0xabc");
    }
}
