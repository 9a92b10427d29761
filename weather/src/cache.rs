// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::models::weather::WeatherInfo;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Bounded city-keyed snapshot store with per-entry expiry and FIFO eviction.
///
/// Eviction order is insertion order, not access recency: reading an entry
/// never moves it. Replacing an existing key counts as a fresh insertion and
/// moves it to the newest slot, so polling-refreshed entries are not evicted
/// ahead of entries inserted after them. An entry older than `ttl` is treated
/// as absent on read; physical removal is deferred to the next `put`.
pub struct BoundedTtlCache {
  inner: RwLock<CacheInner>,
  capacity: usize,
  ttl: Duration,
}

struct CacheInner {
  entries: HashMap<String, CacheEntry>,
  // front = oldest insertion; always mirrors the key set of `entries`
  order: VecDeque<String>,
}

struct CacheEntry {
  value: WeatherInfo,
  inserted_at: Instant,
}

impl CacheEntry {
  fn is_fresh(&self, ttl: Duration) -> bool {
    self.inserted_at.elapsed() < ttl
  }
}

impl BoundedTtlCache {
  pub fn new(capacity: usize, ttl: Duration) -> Self {
    Self {
      inner: RwLock::new(CacheInner {
        entries: HashMap::new(),
        order: VecDeque::new(),
      }),
      capacity,
      ttl,
    }
  }

  /// Returns the cached snapshot for `city` if present and not expired.
  pub async fn get(&self, city: &str) -> Option<WeatherInfo> {
    let inner = self.inner.read().await;
    inner
      .entries
      .get(city)
      .filter(|entry| entry.is_fresh(self.ttl))
      .map(|entry| entry.value.clone())
  }

  /// Inserts or replaces the snapshot for `city`, evicting oldest-first
  /// once over capacity.
  pub async fn put(&self, city: &str, value: WeatherInfo) {
    let mut inner = self.inner.write().await;
    inner.purge_expired(self.ttl);

    if inner.entries.remove(city).is_some() {
      inner.order.retain(|k| k != city);
    }
    inner.entries.insert(
      city.to_string(),
      CacheEntry {
        value,
        inserted_at: Instant::now(),
      },
    );
    inner.order.push_back(city.to_string());

    while inner.entries.len() > self.capacity {
      let Some(oldest) = inner.order.pop_front() else {
        break;
      };
      inner.entries.remove(&oldest);
      debug!("Evicted oldest city from cache: {}", oldest);
    }
  }

  /// Point-in-time snapshot of the live (non-expired) keys, oldest first.
  pub async fn keys(&self) -> Vec<String> {
    let inner = self.inner.read().await;
    inner
      .order
      .iter()
      .filter(|city| {
        inner
          .entries
          .get(city.as_str())
          .is_some_and(|entry| entry.is_fresh(self.ttl))
      })
      .cloned()
      .collect()
  }

  /// Count of live (non-expired) entries.
  pub async fn len(&self) -> usize {
    let inner = self.inner.read().await;
    inner
      .entries
      .values()
      .filter(|entry| entry.is_fresh(self.ttl))
      .count()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

impl CacheInner {
  fn purge_expired(&mut self, ttl: Duration) {
    self.entries.retain(|_, entry| entry.is_fresh(ttl));
    let entries = &self.entries;
    self.order.retain(|city| entries.contains_key(city));
  }
}
