//! Start-up configuration.
//!
//! Read once from `data-*` attributes on the `#app` root plus the page's
//! query string. Every field has a default so a bare page still boots.

use alloy_primitives::Address;
use anyhow::{Context, bail};
use cf_chain_evm::{DEFAULT_FACTORY_ADDRESS, DEFAULT_RECEIPT_POLL, parse_address};
use std::time::Duration;

use crate::dom;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Live,
    Demo,
}

impl Mode {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "demo" | "mock" => Ok(Mode::Demo),
            other => bail!("unknown mode '{other}' (expected 'live' or 'demo')"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub factory: Address,
    pub receipt_poll: Duration,
    pub mode: Mode,
}

/// Raw attribute values, before validation.
#[derive(Debug, Default)]
pub struct RawConfig<'a> {
    pub factory_address: Option<&'a str>,
    pub receipt_poll_ms: Option<&'a str>,
    pub mode: Option<&'a str>,
    pub query_mode: Option<&'a str>,
}

impl AppConfig {
    pub fn parse(raw: RawConfig<'_>) -> anyhow::Result<Self> {
        let factory_raw = raw
            .factory_address
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_FACTORY_ADDRESS);
        let factory = parse_address(factory_raw)
            .with_context(|| format!("data-factory-address '{factory_raw}'"))?;

        let receipt_poll = match raw.receipt_poll_ms.filter(|s| !s.trim().is_empty()) {
            Some(ms) => {
                let ms: u64 = ms
                    .trim()
                    .parse()
                    .with_context(|| format!("data-receipt-poll-ms '{ms}'"))?;
                if ms == 0 {
                    bail!("data-receipt-poll-ms must be positive");
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_RECEIPT_POLL,
        };

        // The query string wins so a deployed page can be opened in demo mode.
        let mode = match raw.query_mode.or(raw.mode) {
            Some(m) => Mode::parse(m).context("selecting mode")?,
            None => Mode::Live,
        };

        Ok(Self {
            factory,
            receipt_poll,
            mode,
        })
    }

    pub fn from_document() -> anyhow::Result<Self> {
        let root = dom::by_id("app");
        let attr = |name: &str| root.as_ref().and_then(|el| el.get_attribute(name));
        let factory_address = attr("data-factory-address");
        let receipt_poll_ms = attr("data-receipt-poll-ms");
        let mode = attr("data-mode");
        let query_mode = dom::query_param("mode");

        Self::parse(RawConfig {
            factory_address: factory_address.as_deref(),
            receipt_poll_ms: receipt_poll_ms.as_deref(),
            mode: mode.as_deref(),
            query_mode: query_mode.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_a_bare_page() {
        let config = AppConfig::parse(RawConfig::default()).unwrap();
        assert_eq!(config.factory, parse_address(DEFAULT_FACTORY_ADDRESS).unwrap());
        assert_eq!(config.receipt_poll, Duration::from_millis(1500));
        assert_eq!(config.mode, Mode::Live);
    }

    #[test]
    fn query_mode_overrides_attribute() {
        let config = AppConfig::parse(RawConfig {
            mode: Some("live"),
            query_mode: Some("demo"),
            receipt_poll_ms: Some("250"),
            ..RawConfig::default()
        })
        .unwrap();
        assert_eq!(config.mode, Mode::Demo);
        assert_eq!(config.receipt_poll, Duration::from_millis(250));
    }

    #[test]
    fn invalid_values_fail_with_context() {
        let err = AppConfig::parse(RawConfig {
            factory_address: Some("0x1234"),
            ..RawConfig::default()
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("data-factory-address"));

        let err = AppConfig::parse(RawConfig {
            receipt_poll_ms: Some("soon"),
            ..RawConfig::default()
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("data-receipt-poll-ms"));

        assert!(
            AppConfig::parse(RawConfig {
                mode: Some("staging"),
                ..RawConfig::default()
            })
            .is_err()
        );
    }
}
