use tracing::warn;

use crate::{
    error::{FailureKind, UpstreamResult},
    types::{AggregatorResponse, RawMarketStats},
};

use super::HTTP;

impl HTTP {
    /// Alternate marketplace aggregator: fallback floor price and listed
    /// count. Unauthenticated.
    pub async fn fetch_floor(&self) -> UpstreamResult<RawMarketStats> {
        let url = self.config.aggregator_floor_url();

        let response = self.client.get(&url).send().await.map_err(|err| {
            warn!("aggregator request failed: {}", err);
            FailureKind::UpstreamUnavailable
        })?;

        if !response.status().is_success() {
            warn!("aggregator returned {}", response.status());
            return Err(FailureKind::UpstreamUnavailable);
        }

        let payload =
            response.json::<AggregatorResponse>().await.map_err(|err| {
                warn!("aggregator body did not parse: {}", err);
                FailureKind::UpstreamMalformed
            })?;

        let collection = payload.collections.into_iter().next().ok_or_else(
            || {
                warn!("aggregator response held no collection");
                FailureKind::UpstreamMalformed
            },
        )?;

        Ok(RawMarketStats::from(collection))
    }
}
