use std::collections::HashMap;

use bigdecimal::BigDecimal;
use serde::Deserialize;

/// Spot-rate payload keyed by asset id, each entry keyed by fiat unit.
/// Shape: `{"ethereum": {"usd": 3000.0}}`.
#[derive(Debug, Deserialize)]
pub struct FxRateResponse(pub HashMap<String, HashMap<String, BigDecimal>>);

impl FxRateResponse {
    pub fn rate(&self, asset: &str, fiat: &str) -> Option<BigDecimal> {
        self.0.get(asset)?.get(fiat).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn rate_lookup_by_asset_and_fiat() {
        let response: FxRateResponse =
            serde_json::from_str(r#"{"ethereum":{"usd":3000.0}}"#).unwrap();

        assert_eq!(
            response.rate("ethereum", "usd"),
            BigDecimal::from_str("3000.0").ok()
        );
        assert_eq!(response.rate("ethereum", "eur"), None);
        assert_eq!(response.rate("bitcoin", "usd"), None);
    }
}
