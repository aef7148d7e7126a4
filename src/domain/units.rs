//! Conversions between user-facing units and chain base units.
//!
//! All monetary values cross the service boundary as decimal ETH
//! strings and live on chain as wei. Conversion happens here and only
//! here.

use alloy::primitives::{
    utils::{format_ether, parse_ether},
    U256,
};

use super::error::MarketError;

/// Parses a decimal ETH string ("0.002") into wei.
pub fn parse_eth(value: &str) -> Result<U256, MarketError> {
    parse_ether(value.trim()).map_err(|e| MarketError::InvalidAmount {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Formats wei as a decimal ETH string with trailing zeros trimmed.
///
/// `format_ether` always emits 18 fractional digits; trimming keeps the
/// strings readable and stable ("0.002", not "0.002000000000000000").
#[must_use]
pub fn format_eth(wei: U256) -> String {
    let raw = format_ether(wei);
    match raw.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{int}.{frac}")
            }
        }
        None => raw,
    }
}

/// Converts a percentage (2.5) to contract basis points (250).
///
/// Truncates beyond two decimal places since the contract cannot
/// represent finer increments.
#[must_use]
pub fn percent_to_bps(percent: f64) -> u32 {
    (percent * 100.0).floor() as u32
}

/// Parses a decimal token or auction id ("42") into a contract word.
pub fn parse_decimal_id(value: &str) -> Result<U256, MarketError> {
    U256::from_str_radix(value.trim(), 10).map_err(|e| MarketError::InvalidAmount {
        value: value.to_string(),
        message: e.to_string(),
    })
}
