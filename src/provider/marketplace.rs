use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    error::{FailureKind, UpstreamResult},
    types::{MarketStatsV2, MarketStatsV22, RawMarketStats},
};

use super::HTTP;

impl HTTP {
    /// Marketplace stats, protocol v2.2. Primary floor-price source.
    pub async fn fetch_stats(&self) -> UpstreamResult<RawMarketStats> {
        let url = self.config.marketplace_stats_url();
        self.stats_request::<MarketStatsV22>(&url)
            .await
            .map(RawMarketStats::from)
    }

    /// Marketplace stats, legacy protocol v2. Same provider, overlapping
    /// fields under older names.
    pub async fn fetch_stats_legacy(&self) -> UpstreamResult<RawMarketStats> {
        let url = self.config.marketplace_stats_legacy_url();
        self.stats_request::<MarketStatsV2>(&url)
            .await
            .map(RawMarketStats::from)
    }

    async fn stats_request<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> UpstreamResult<T> {
        let response = self
            .client
            .get(url)
            .header("X-API-Key", &self.config.marketplace_api_key)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|err| {
                warn!("marketplace stats request failed: {}", err);
                FailureKind::UpstreamUnavailable
            })?;

        if !response.status().is_success() {
            warn!("marketplace stats returned {}", response.status());
            return Err(FailureKind::UpstreamUnavailable);
        }

        response.json::<T>().await.map_err(|err| {
            warn!("marketplace stats body did not parse: {}", err);
            FailureKind::UpstreamMalformed
        })
    }
}
