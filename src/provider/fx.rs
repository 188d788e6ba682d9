use bigdecimal::BigDecimal;
use tracing::warn;

use crate::types::FxRateResponse;

use super::HTTP;

/// Fiat unit every conversion targets.
const FIAT_UNIT: &str = "usd";

impl HTTP {
    /// Native-currency → USD spot rate. Absence degrades fiat fields to the
    /// "unavailable" marker; native metrics are never affected.
    pub async fn fetch_rate(&self) -> Option<BigDecimal> {
        let url = self.config.fx_rate_url();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("fx rate request failed: {}", err);
                return None;
            },
        };

        if !response.status().is_success() {
            warn!("fx rate returned {}", response.status());
            return None;
        }

        let payload = match response.json::<FxRateResponse>().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!("fx rate body did not parse: {}", err);
                return None;
            },
        };

        let rate = payload.rate(&self.config.fx_asset_id, FIAT_UNIT);

        if rate.is_none() {
            warn!(
                "fx rate response held no {}/{} pair",
                self.config.fx_asset_id, FIAT_UNIT
            );
        }

        rate
    }
}
