use anyhow::Result;
use regex::Regex;

/// Validates an EVM address: 0x followed by 40 hex digits. Checksum casing is
/// not enforced because the native-token sentinel uses arbitrary mixed case.
pub fn validate_evm_address(address: &str) -> Result<()> {
    if !address.starts_with("0x") || address.len() != 42 {
        return Err(anyhow::anyhow!("Invalid address format"));
    }
    let hex_regex =
        Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("Hardcoded regex should always compile");
    if !hex_regex.is_match(address) {
        return Err(anyhow::anyhow!("Invalid address characters"));
    }
    Ok(())
}

/// Strict decimal check for user-supplied amounts; exactness matters on this
/// path, so the rules are narrow. No sign, no exponent, no leading zeros, at
/// most `max_decimals` fractional digits, and the value must be nonzero.
pub fn validate_amount_strict(amount: &str, max_decimals: usize) -> Result<()> {
    if amount.is_empty() {
        return Err(anyhow::anyhow!("Amount cannot be empty"));
    }
    let pattern = format!(r"^(?:0|[1-9]\d*)(?:\.\d{{1,{}}})?$", max_decimals);
    let re = Regex::new(&pattern).expect("Hardcoded regex should always compile");
    if !re.is_match(amount) {
        return Err(anyhow::anyhow!("Invalid decimal amount"));
    }
    // zero in any spelling: "0", "0.0", "0.000", ...
    if amount.chars().all(|c| c == '0' || c == '.') {
        return Err(anyhow::anyhow!("Amount must be positive"));
    }
    Ok(())
}
