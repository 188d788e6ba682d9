use bigdecimal::{rounding::RoundingMode, BigDecimal};

/// Decimal places used when formatting native price-like amounts.
pub const NATIVE_DECIMALS: i64 = 4;
/// Decimal places used when formatting fiat price-like amounts.
pub const FIAT_DECIMALS: i64 = 2;
/// Decimal places used when formatting large fiat aggregates.
pub const FIAT_AGGREGATE_DECIMALS: i64 = 0;
/// Decimal places used when formatting percentages and ratios.
pub const PERCENT_DECIMALS: i64 = 2;

/// Rounds at the serialization boundary only. Internal computation keeps full
/// precision.
pub fn format_amount(value: &BigDecimal, decimals: i64) -> String {
    value
        .with_scale_round(decimals, RoundingMode::HalfUp)
        .to_string()
}

/// Decodes a `0x`-prefixed hex quantity as returned by `eth_call` and
/// `eth_blockNumber`. Returns `None` for anything that is not a valid
/// hex-encoded unsigned integer.
pub fn parse_hex_uint(value: &str) -> Option<u64> {
    let digits = value.strip_prefix("0x")?;

    if digits.is_empty() || digits.len() > 64 {
        return None;
    }

    let parsed = u128::from_str_radix(digits.trim_start_matches('0'), 16);

    match parsed {
        Ok(number) => number.try_into().ok(),
        Err(_) => {
            // all-zero payload trims down to an empty string
            if digits.bytes().all(|b| b == b'0') {
                return Some(0);
            }
            None
        },
    }
}
