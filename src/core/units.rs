//! Exact decimal <-> base-unit conversion for on-chain amounts.
//!
//! Floating point is forbidden on this path: `"0.01"` at 18 decimals must be
//! exactly `10000000000000000`, and U256 values must serialize to JSON as
//! decimal strings, never numbers.

use ethers::types::U256;

use crate::core::errors::BridgeError;

/// Converts a human-readable decimal amount into base units (wei-equivalent).
///
/// The fractional part may not exceed `decimals` digits; shorter fractions are
/// right-padded with zeros. The amount must be strictly positive.
pub fn to_base_units(amount: &str, decimals: u32) -> Result<U256, BridgeError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(BridgeError::ValidationError("Amount cannot be empty".to_string()));
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(BridgeError::ValidationError("Invalid decimal amount".to_string()));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(BridgeError::ValidationError(format!(
            "Invalid decimal amount: {}",
            amount
        )));
    }
    if frac_part.len() > decimals as usize {
        return Err(BridgeError::ValidationError(format!(
            "Amount has more than {} decimal places",
            decimals
        )));
    }

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let scale = U256::from(10u64).pow(U256::from(decimals));

    let int_units = U256::from_dec_str(int_part)
        .map_err(|e| BridgeError::ValidationError(format!("Invalid amount: {}", e)))?
        .checked_mul(scale)
        .ok_or_else(|| BridgeError::ValidationError("Amount overflows U256".to_string()))?;

    let frac_units = if frac_part.is_empty() {
        U256::zero()
    } else {
        let mut padded = frac_part.to_string();
        while padded.len() < decimals as usize {
            padded.push('0');
        }
        U256::from_dec_str(&padded)
            .map_err(|e| BridgeError::ValidationError(format!("Invalid amount: {}", e)))?
    };

    let total = int_units
        .checked_add(frac_units)
        .ok_or_else(|| BridgeError::ValidationError("Amount overflows U256".to_string()))?;

    if total.is_zero() {
        return Err(BridgeError::ValidationError("Amount must be positive".to_string()));
    }
    Ok(total)
}

/// Renders a base-unit value back to a decimal string, trimming trailing
/// fractional zeros. Inverse of `to_base_units` for round-trip checks.
pub fn from_base_units(value: U256, decimals: u32) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let int_part = value / scale;
    let frac_part = value % scale;
    if frac_part.is_zero() {
        return int_part.to_string();
    }
    let mut frac = format!("{:0>width$}", frac_part.to_string(), width = decimals as usize);
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("{}.{}", int_part, frac)
}

/// Serde adapter: U256 as a decimal string in JSON. Accepts decimal or
/// 0x-prefixed hex on input since the provider has used both.
pub mod u256_string {
    use ethers::types::U256;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let parsed = if let Some(hex) = raw.strip_prefix("0x") {
            U256::from_str_radix(hex, 16).map_err(de::Error::custom)?
        } else {
            U256::from_dec_str(&raw).map_err(de::Error::custom)?
        };
        Ok(parsed)
    }
}
