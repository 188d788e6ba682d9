use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::helpers::format_amount;

/// Marker serialized into every fiat field whose value could not be derived.
pub const FIAT_UNAVAILABLE: &str = "unavailable";

/// A fiat-denominated field is either a formatted amount or an explicit
/// "unavailable" marker. Null never reaches the boundary, and no fiat amount
/// exists without a positive native counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiatAmount {
    Amount(String),
    Unavailable,
}

impl FiatAmount {
    /// Converts a native amount at the given rate, rounded to `decimals`
    /// fractional digits. Missing rate or non-positive native amount yields
    /// the unavailable marker.
    pub fn convert(
        native: &BigDecimal,
        rate: Option<&BigDecimal>,
        decimals: i64,
    ) -> FiatAmount {
        match rate {
            Some(rate) if native > &BigDecimal::zero() => {
                FiatAmount::Amount(format_amount(&(native * rate), decimals))
            },
            _ => FiatAmount::Unavailable,
        }
    }
}

impl Serialize for FiatAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FiatAmount::Amount(amount) => serializer.serialize_str(amount),
            FiatAmount::Unavailable => {
                serializer.serialize_str(FIAT_UNAVAILABLE)
            },
        }
    }
}

/// One normalized view over all upstream sources, produced by a single
/// refresh. Immutable once built; replaced wholesale on the next refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub floor_price: String,
    pub currency: String,
    pub floor_price_usd: FiatAmount,
    pub market_cap: String,
    pub market_cap_usd: FiatAmount,
    pub volume_24h: String,
    pub volume_24h_usd: FiatAmount,
    pub volume_7d: String,
    pub volume_7d_usd: FiatAmount,
    pub price_change_24h: String,
    pub price_change_7d: String,
    pub holder_count: u64,
    pub total_supply: u64,
    pub listed_count: u64,
    pub listing_ratio: String,
    pub cap_to_volume_ratio: String,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn convert_multiplies_positive_native_by_rate() {
        let native = BigDecimal::from_str("1.5").unwrap();
        let rate = BigDecimal::from_str("3000").unwrap();

        assert_eq!(
            FiatAmount::convert(&native, Some(&rate), 2),
            FiatAmount::Amount("4500.00".to_owned())
        );
    }

    #[test]
    fn convert_without_rate_is_unavailable() {
        let native = BigDecimal::from_str("1.5").unwrap();
        assert_eq!(
            FiatAmount::convert(&native, None, 2),
            FiatAmount::Unavailable
        );
    }

    #[test]
    fn convert_of_non_positive_native_is_unavailable() {
        let rate = BigDecimal::from_str("3000").unwrap();
        assert_eq!(
            FiatAmount::convert(&BigDecimal::from(0), Some(&rate), 2),
            FiatAmount::Unavailable
        );
    }

    #[test]
    fn unavailable_serializes_to_marker_string() {
        let json = serde_json::to_value(FiatAmount::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!("unavailable"));
    }
}
