use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    cache::SnapshotCache,
    configuration::{AppState, State},
    error::Error,
    types::MetricsSnapshot,
};

use super::derive::{derive_snapshot, SourceSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Cache fast path, refresh on miss, stale fallback on refresh failure.
pub async fn current_snapshot(
    state: &AppState<State>,
) -> Result<(MetricsSnapshot, Freshness), Error> {
    if let Some(snapshot) = state.cache.get(Instant::now()).await {
        return Ok((snapshot, Freshness::Fresh));
    }

    let refreshed = refresh(state).await;
    resolve(&state.cache, refreshed, Instant::now()).await
}

/// Applies the failure-to-staleness policy: a successful refresh replaces the
/// cache entry; a failed one is masked by the previous snapshot when there is
/// one, and propagates only from an empty cache.
pub async fn resolve(
    cache: &SnapshotCache,
    refreshed: Result<MetricsSnapshot, Error>,
    now: Instant,
) -> Result<(MetricsSnapshot, Freshness), Error> {
    match refreshed {
        Ok(snapshot) => {
            cache.store(snapshot.clone(), now).await;
            Ok((snapshot, Freshness::Fresh))
        },
        Err(err) => match cache.stale().await {
            Some(snapshot) => {
                if let Some(produced_at) = cache.produced_at().await {
                    warn!(
                        "refresh failed ({}); serving snapshot aged {:?}",
                        err,
                        now.duration_since(produced_at)
                    );
                }
                Ok((snapshot, Freshness::Stale))
            },
            None => Err(err),
        },
    }
}

/// One full aggregation: fan out to every upstream concurrently, consume
/// every outcome, derive. Fixed-arity join, not a race; no adapter failure
/// cancels another, and a started refresh always runs to completion.
pub async fn refresh(
    state: &AppState<State>,
) -> Result<MetricsSnapshot, Error> {
    let http = &state.http;

    let (primary, legacy, aggregator, chain_supply, block_height, fx_rate) =
        futures::join!(
            http.fetch_stats(),
            http.fetch_stats_legacy(),
            http.fetch_floor(),
            http.fetch_total_supply(),
            http.latest_block_number(),
            http.fetch_rate(),
        );

    if let Some(height) = block_height {
        debug!("refresh observed chain height {}", height);
    }

    let sources = SourceSet {
        primary,
        legacy,
        aggregator,
        chain_supply,
        fx_rate,
    };

    let snapshot = derive_snapshot(
        &sources,
        &state.config.native_currency,
        Utc::now(),
    )?;

    info!(
        "aggregated snapshot: floor {} {}, supply {}",
        snapshot.floor_price, snapshot.currency, snapshot.total_supply
    );

    Ok(snapshot)
}
