use alloy::primitives::U256;

use crate::constants::TOKEN_DECIMALS;
use crate::CqmError;

fn scale() -> U256 {
    U256::from(10u64).pow(U256::from(TOKEN_DECIMALS))
}

/// Convert a whole-token amount to base units (`whole * 10^18`).
pub fn to_base_units(whole: U256) -> Result<U256, CqmError> {
    whole
        .checked_mul(scale())
        .ok_or_else(|| CqmError::InvalidInput(format!("amount {whole} overflows uint256")))
}

/// Parse a user-entered whole-token amount ("25") into base units.
pub fn parse_whole_tokens(input: &str) -> Result<U256, CqmError> {
    let whole: U256 = input
        .trim()
        .parse()
        .map_err(|e| CqmError::InvalidInput(format!("invalid amount {input:?}: {e}")))?;
    to_base_units(whole)
}

/// Render base units as whole tokens, rounding down.
pub fn format_whole_tokens(base: U256) -> String {
    (base / scale()).to_string()
}
