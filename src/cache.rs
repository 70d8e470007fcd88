//! Time-bounded snapshots of loaded fixtures, keyed by scope and lookback window.

use std::collections::hash_map::Entry;
use std::ops::AddAssign;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Snapshot lifetime used unless overridden.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub scope: String,
    pub window_days: u32,
}
impl CacheKey {
    pub fn new(scope: impl Into<String>, window_days: u32) -> Self {
        Self {
            scope: scope.into(),
            window_days,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    hits: usize,
    misses: usize,
}
impl CacheStats {
    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl AddAssign<bool> for CacheStats {
    fn add_assign(&mut self, cache_hit: bool) {
        if cache_hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

#[derive(Debug)]
struct Snapshot<V> {
    value: Arc<V>,
    expires_at: DateTime<Utc>,
}

/// Values are shared read-only as [Arc] snapshots; an expired entry is treated as absent.
#[derive(Debug)]
pub struct SnapshotCache<V> {
    ttl: Duration,
    entries: FxHashMap<CacheKey, Snapshot<V>>,
    stats: CacheStats,
}
impl<V> Default for SnapshotCache<V> {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_TTL_MINUTES))
    }
}
impl<V> SnapshotCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&mut self, key: &CacheKey, now: DateTime<Utc>) -> Option<Arc<V>> {
        let value = self
            .entries
            .get(key)
            .filter(|snapshot| now < snapshot.expires_at)
            .map(|snapshot| Arc::clone(&snapshot.value));
        self.stats += value.is_some();
        value
    }

    pub fn insert(&mut self, key: CacheKey, value: V, now: DateTime<Utc>) -> Arc<V> {
        let value = Arc::new(value);
        trace!("caching {key:?} until {}", now + self.ttl);
        self.entries.insert(
            key,
            Snapshot {
                value: Arc::clone(&value),
                expires_at: now + self.ttl,
            },
        );
        value
    }

    /// Returns the live snapshot under `key`, or loads, stores and returns a fresh one. A failed
    /// load leaves the cache untouched.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: CacheKey,
        now: DateTime<Utc>,
        loader: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let ttl = self.ttl;
        match self.entries.entry(key) {
            Entry::Occupied(entry) if now < entry.get().expires_at => {
                self.stats += true;
                Ok(Arc::clone(&entry.get().value))
            }
            Entry::Occupied(mut entry) => {
                self.stats += false;
                let value = Arc::new(loader()?);
                trace!("refreshing expired {:?}", entry.key());
                entry.insert(Snapshot {
                    value: Arc::clone(&value),
                    expires_at: now + ttl,
                });
                Ok(value)
            }
            Entry::Vacant(entry) => {
                self.stats += false;
                let value = Arc::new(loader()?);
                trace!("caching {:?}", entry.key());
                entry.insert(Snapshot {
                    value: Arc::clone(&value),
                    expires_at: now + ttl,
                });
                Ok(value)
            }
        }
    }

    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every window cached under `scope`, returning the number of entries removed.
    pub fn invalidate_scope(&mut self, scope: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.scope != scope);
        before - self.entries.len()
    }

    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, snapshot| now < snapshot.expires_at);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 17, 19, 30, 0).unwrap()
    }

    #[test]
    fn stats_add_assign_bool() {
        let mut stats = CacheStats::default();
        stats += false;
        assert_eq!(CacheStats { hits: 0, misses: 1 }, stats);
        stats += true;
        stats += true;
        assert_eq!(CacheStats { hits: 2, misses: 1 }, stats);
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = SnapshotCache::default();
        let key = CacheKey::new("EPL", 30);
        cache.insert(key.clone(), "fixtures", epoch());
        assert_eq!(Some(Arc::new("fixtures")), cache.get(&key, epoch() + Duration::minutes(4)));
        assert_eq!(None, cache.get(&CacheKey::new("EPL", 7), epoch()));
        assert_eq!(1, cache.stats().hits());
        assert_eq!(1, cache.stats().misses());
    }

    #[test]
    fn miss_after_expiry() {
        let mut cache = SnapshotCache::new(Duration::minutes(5));
        let key = CacheKey::new("EPL", 30);
        cache.insert(key.clone(), 42, epoch());
        assert_eq!(None, cache.get(&key, epoch() + Duration::minutes(5)));
        assert_eq!(1, cache.purge_expired(epoch() + Duration::minutes(5)));
        assert!(cache.is_empty());
    }

    #[test]
    fn snapshots_outlive_eviction() {
        let mut cache = SnapshotCache::default();
        let key = CacheKey::new("EPL", 30);
        let snapshot = cache.insert(key.clone(), vec![1, 2, 3], epoch());
        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert_eq!(vec![1, 2, 3], *snapshot);
    }

    #[test]
    fn invalidate_scope_drops_all_windows() {
        let mut cache = SnapshotCache::default();
        cache.insert(CacheKey::new("EPL", 7), 1, epoch());
        cache.insert(CacheKey::new("EPL", 30), 2, epoch());
        cache.insert(CacheKey::new("LaLiga", 30), 3, epoch());
        assert_eq!(2, cache.invalidate_scope("EPL"));
        assert_eq!(1, cache.len());
        assert_eq!(Some(Arc::new(3)), cache.get(&CacheKey::new("LaLiga", 30), epoch()));
    }

    #[test]
    fn loads_once_within_ttl() {
        let mut cache = SnapshotCache::default();
        let key = CacheKey::new("EPL", 30);
        let mut loads = 0;
        for minutes in [0, 1, 2] {
            let value = cache
                .get_or_try_insert_with(key.clone(), epoch() + Duration::minutes(minutes), || {
                    loads += 1;
                    Ok::<_, String>(loads)
                })
                .unwrap();
            assert_eq!(1, *value);
        }
        assert_eq!(1, loads);
        assert_eq!(CacheStats { hits: 2, misses: 1 }, cache.stats());

        let value = cache
            .get_or_try_insert_with(key, epoch() + Duration::minutes(10), || Ok::<_, String>(99))
            .unwrap();
        assert_eq!(99, *value);
        assert_eq!(2, cache.stats().misses());
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache: SnapshotCache<u32> = SnapshotCache::default();
        let key = CacheKey::new("EPL", 30);
        let result = cache.get_or_try_insert_with(key.clone(), epoch(), || Err("unreachable feed"));
        assert_eq!(Err("unreachable feed"), result);
        assert!(cache.is_empty());
        assert_eq!(None, cache.get(&key, epoch()));
    }
}
