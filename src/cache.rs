use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::types::MetricsSnapshot;

/// The single cached aggregation result.
pub struct CacheEntry {
    pub snapshot: MetricsSnapshot,
    pub produced_at: Instant,
}

/// One time-boxed slot holding the last successfully derived snapshot.
///
/// Two states: empty (no refresh has succeeded yet) and populated. The slot
/// is replaced atomically on every successful refresh and is never persisted.
/// Callers supply `now` so tests control the clock. There is no refresh lock:
/// overlapping misses may duplicate a refresh, and the later writer wins.
pub struct SnapshotCache {
    slot: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl SnapshotCache {
    pub fn new(ttl_seconds: u64) -> Self {
        SnapshotCache {
            slot: RwLock::new(None),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Returns the cached snapshot while it is younger than the TTL.
    pub async fn get(&self, now: Instant) -> Option<MetricsSnapshot> {
        let slot = self.slot.read().await;

        match slot.as_ref() {
            Some(entry)
                if now.duration_since(entry.produced_at) < self.ttl =>
            {
                Some(entry.snapshot.clone())
            },
            _ => None,
        }
    }

    pub async fn store(&self, snapshot: MetricsSnapshot, now: Instant) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry {
            snapshot,
            produced_at: now,
        });
    }

    /// Stale-serve escape hatch: the snapshot regardless of age. Leaves the
    /// entry untouched, `produced_at` included.
    pub async fn stale(&self) -> Option<MetricsSnapshot> {
        let slot = self.slot.read().await;
        slot.as_ref().map(|entry| entry.snapshot.clone())
    }

    pub async fn produced_at(&self) -> Option<Instant> {
        let slot = self.slot.read().await;
        slot.as_ref().map(|entry| entry.produced_at)
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::FiatAmount;

    fn sample_snapshot(floor_price: &str) -> MetricsSnapshot {
        MetricsSnapshot {
            floor_price: floor_price.to_owned(),
            currency: "ETH".to_owned(),
            floor_price_usd: FiatAmount::Unavailable,
            market_cap: "1200.0000".to_owned(),
            market_cap_usd: FiatAmount::Unavailable,
            volume_24h: "12.5000".to_owned(),
            volume_24h_usd: FiatAmount::Unavailable,
            volume_7d: "80.1000".to_owned(),
            volume_7d_usd: FiatAmount::Unavailable,
            price_change_24h: "3.45".to_owned(),
            price_change_7d: "25.00".to_owned(),
            holder_count: 800,
            total_supply: 800,
            listed_count: 420,
            listing_ratio: "52.50".to_owned(),
            cap_to_volume_ratio: "96.00".to_owned(),
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn get_within_ttl_returns_identical_snapshot() {
        let cache = SnapshotCache::new(60);
        let t0 = Instant::now();
        let snapshot = sample_snapshot("1.5000");

        cache.store(snapshot.clone(), t0).await;

        let hit = cache.get(t0 + Duration::from_secs(30)).await;
        assert_eq!(hit, Some(snapshot));
    }

    #[tokio::test]
    async fn get_after_ttl_misses() {
        let cache = SnapshotCache::new(60);
        let t0 = Instant::now();

        cache.store(sample_snapshot("1.5000"), t0).await;

        assert!(cache.get(t0 + Duration::from_secs(60)).await.is_none());
    }

    #[tokio::test]
    async fn get_on_empty_cache_misses() {
        let cache = SnapshotCache::new(60);
        assert!(cache.get(Instant::now()).await.is_none());
    }

    #[tokio::test]
    async fn stale_ignores_ttl_and_keeps_produced_at() {
        let cache = SnapshotCache::new(60);
        let t0 = Instant::now();
        let snapshot = sample_snapshot("1.5000");

        cache.store(snapshot.clone(), t0).await;

        let expired = t0 + Duration::from_secs(3600);
        assert!(cache.get(expired).await.is_none());
        assert_eq!(cache.stale().await, Some(snapshot));
        assert_eq!(cache.produced_at().await, Some(t0));
    }

    #[tokio::test]
    async fn store_replaces_the_previous_entry() {
        let cache = SnapshotCache::new(60);
        let t0 = Instant::now();

        cache.store(sample_snapshot("1.5000"), t0).await;
        let t1 = t0 + Duration::from_secs(10);
        cache.store(sample_snapshot("1.6000"), t1).await;

        let hit = cache.get(t1).await.unwrap();
        assert_eq!(hit.floor_price, "1.6000");
        assert_eq!(cache.produced_at().await, Some(t1));
    }
}
