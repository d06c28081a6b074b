//! Client-side settings cache with explicit invalidation.
//!
//! Settings change rarely, so reads come from a short TTL cache. After a
//! successful write the writer calls [`SettingsCache::invalidate`],
//! which drops the entry and publishes a [`SettingsEvent`] on the
//! broadcast bus so every subscriber (widgets, watchers) can re-fetch.

use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;
use tokio::sync::broadcast;

use ceycan_core::SettingsKind;

use crate::error::ApiClientError;

/// Default time-to-live for cached settings payloads.
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Capacity of the invalidation event bus.
const EVENT_BUS_CAPACITY: usize = 16;

/// Event published when a settings kind is invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsKind,
}

/// TTL cache over settings payloads with a pub/sub invalidation hook.
#[derive(Clone)]
pub struct SettingsCache {
    cache: Cache<SettingsKind, Value>,
    events: broadcast::Sender<SettingsEvent>,
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SettingsCache {
    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(ttl)
            .build();
        let (events, _) = broadcast::channel(EVENT_BUS_CAPACITY);

        Self { cache, events }
    }

    /// Get the cached payload for `kind`, or fetch and cache it.
    ///
    /// Concurrent callers may fetch twice; last write wins, which is
    /// harmless for read-mostly display settings.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error; nothing is cached on failure.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        kind: SettingsKind,
        fetch: F,
    ) -> Result<Value, ApiClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiClientError>>,
    {
        if let Some(cached) = self.cache.get(&kind).await {
            return Ok(cached);
        }

        let value = fetch().await?;
        self.cache.insert(kind, value.clone()).await;
        Ok(value)
    }

    /// Drop the cached entry for `kind` and notify subscribers.
    ///
    /// Call after every successful settings write.
    pub async fn invalidate(&self, kind: SettingsKind) {
        self.cache.invalidate(&kind).await;
        // No receivers is fine; the event is advisory
        let _ = self.events.send(SettingsEvent { kind });
    }

    /// Subscribe to invalidation events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = SettingsCache::default();
        let fetches = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(SettingsKind::Contact, || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"phone": "+94 11 234 5678"}))
                })
                .await
                .unwrap();
            assert_eq!(value["phone"], "+94 11 234 5678");
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_and_publishes_event() {
        let cache = SettingsCache::default();
        let mut events = cache.subscribe();
        let fetches = AtomicUsize::new(0);

        let fetch = || async {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(json!({}))
        };

        cache
            .get_or_fetch(SettingsKind::Social, fetch)
            .await
            .unwrap();
        cache.invalidate(SettingsKind::Social).await;
        cache
            .get_or_fetch(SettingsKind::Social, fetch)
            .await
            .unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(
            events.try_recv().unwrap(),
            SettingsEvent {
                kind: SettingsKind::Social
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_errors_are_not_cached() {
        let cache = SettingsCache::default();

        let result = cache
            .get_or_fetch(SettingsKind::Contact, || async {
                Err(ApiClientError::SessionExpired)
            })
            .await;
        assert!(result.is_err());

        // A later successful fetch still runs
        let value = cache
            .get_or_fetch(SettingsKind::Contact, || async { Ok(json!({"ok": true})) })
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }
}
