// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{cache::BoundedTtlCache, fetch::WeatherApi, models::weather::WeatherInfo};
use error::Error;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, instrument};

type FlightResult = Result<WeatherInfo, Error>;

/// Cache-or-fetch orchestration with per-city request coalescing.
///
/// At most one outbound call is in flight per city: concurrent callers that
/// miss on the same key join the existing flight and receive a clone of its
/// result. The flight runs on its own task, so a caller dropping its future
/// cannot strand the joiners. A failed fetch writes nothing to the cache and
/// clears the in-flight slot, so the next call retries fresh.
pub struct FetchCoordinator {
  api: Arc<dyn WeatherApi>,
  cache: Arc<BoundedTtlCache>,
  inflight: Arc<Mutex<HashMap<String, broadcast::Sender<FlightResult>>>>,
}

impl FetchCoordinator {
  pub fn new(api: Arc<dyn WeatherApi>, cache: Arc<BoundedTtlCache>) -> Self {
    Self {
      api,
      cache,
      inflight: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// Returns the cached snapshot when fresh, otherwise fetches (or joins an
  /// in-flight fetch), stores the result, and returns it.
  #[instrument(skip(self))]
  pub async fn get_or_fetch(&self, city: &str) -> FlightResult {
    if let Some(cached) = self.cache.get(city).await {
      debug!("Returning cached weather data for {}", city);
      return Ok(cached);
    }
    self.refresh(city).await
  }

  /// Fetch-and-replace without the fresh-hit short-circuit. Used by the
  /// refresh scheduler; still coalesces with caller-driven flights.
  pub async fn refresh(&self, city: &str) -> FlightResult {
    let mut rx = {
      let mut inflight = self.inflight.lock().await;
      match inflight.get(city) {
        Some(tx) => {
          debug!("Joining in-flight fetch for {}", city);
          tx.subscribe()
        }
        None => {
          let (tx, rx) = broadcast::channel(1);
          inflight.insert(city.to_string(), tx.clone());
          self.spawn_flight(city.to_string(), tx);
          rx
        }
      }
    };

    match rx.recv().await {
      Ok(result) => result,
      // The flight task dropped its sender without broadcasting.
      Err(_) => Err(Error::CoordinationError(city.to_string())),
    }
  }

  fn spawn_flight(&self, city: String, tx: broadcast::Sender<FlightResult>) {
    let api = Arc::clone(&self.api);
    let cache = Arc::clone(&self.cache);
    let inflight = Arc::clone(&self.inflight);

    tokio::spawn(async move {
      let result = api.fetch_weather(&city).await;
      if let Ok(info) = &result {
        cache.put(&city, info.clone()).await;
      }
      // Clear the slot before broadcasting: receivers subscribed while the
      // slot was live still get the result, and any caller arriving after
      // this point starts a fresh flight.
      inflight.lock().await.remove(&city);
      let _ = tx.send(result);
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::MockApi;
  use std::time::Duration;

  fn coordinator(api: Arc<MockApi>, capacity: usize) -> FetchCoordinator {
    let cache = Arc::new(BoundedTtlCache::new(capacity, Duration::from_secs(600)));
    FetchCoordinator::new(api, cache)
  }

  #[tokio::test]
  async fn second_call_within_ttl_hits_the_cache() {
    let api = Arc::new(MockApi::new());
    let coordinator = coordinator(api.clone(), 10);

    let first = coordinator.get_or_fetch("Berlin").await.unwrap();
    let second = coordinator.get_or_fetch("Berlin").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(api.calls_for("Berlin"), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn concurrent_misses_share_one_network_call() {
    let api = Arc::new(MockApi::new());
    api.set_delay(Duration::from_millis(50));
    let coordinator = Arc::new(coordinator(api.clone(), 10));

    let mut handles = Vec::new();
    for _ in 0..5 {
      let coordinator = Arc::clone(&coordinator);
      handles.push(tokio::spawn(
        async move { coordinator.get_or_fetch("Berlin").await },
      ));
    }

    let mut results = Vec::new();
    for handle in handles {
      results.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(api.calls_for("Berlin"), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
  }

  #[tokio::test(start_paused = true)]
  async fn concurrent_misses_share_one_failure() {
    let api = Arc::new(MockApi::new());
    api.set_delay(Duration::from_millis(50));
    api.set_response("Berlin", Err(Error::ApiError(503)));
    let coordinator = Arc::new(coordinator(api.clone(), 10));

    let mut handles = Vec::new();
    for _ in 0..3 {
      let coordinator = Arc::clone(&coordinator);
      handles.push(tokio::spawn(
        async move { coordinator.get_or_fetch("Berlin").await },
      ));
    }

    for handle in handles {
      assert_eq!(handle.await.unwrap(), Err(Error::ApiError(503)));
    }
    assert_eq!(api.calls_for("Berlin"), 1);
  }

  #[tokio::test]
  async fn failure_writes_nothing_and_the_next_call_retries() {
    let api = Arc::new(MockApi::new());
    api.set_response("Berlin", Err(Error::TimeoutError));
    let coordinator = coordinator(api.clone(), 10);

    assert_eq!(
      coordinator.get_or_fetch("Berlin").await,
      Err(Error::TimeoutError)
    );
    assert!(coordinator.cache.get("Berlin").await.is_none());

    api.set_response("Berlin", Ok(MockApi::snapshot("Berlin", 21.0)));
    let info = coordinator.get_or_fetch("Berlin").await.unwrap();
    assert_eq!(info.temp, 21.0);
    assert_eq!(api.calls_for("Berlin"), 2);
  }

  #[tokio::test]
  async fn eleventh_city_evicts_only_the_first() {
    let api = Arc::new(MockApi::new());
    let coordinator = coordinator(api.clone(), 10);

    for i in 0..11 {
      coordinator.get_or_fetch(&format!("City{i}")).await.unwrap();
    }

    // City0 was evicted; re-querying it goes back to the network.
    coordinator.get_or_fetch("City0").await.unwrap();
    assert_eq!(api.calls_for("City0"), 2);

    // The other ten are still cache hits.
    for i in 1..11 {
      let city = format!("City{i}");
      coordinator.get_or_fetch(&city).await.unwrap();
      assert_eq!(api.calls_for(&city), 1, "{city} should still be cached");
    }
  }

  #[tokio::test(start_paused = true)]
  async fn expired_entry_triggers_a_fresh_fetch() {
    let api = Arc::new(MockApi::new());
    let cache = Arc::new(BoundedTtlCache::new(10, Duration::from_secs(600)));
    let coordinator = FetchCoordinator::new(api.clone(), cache);

    coordinator.get_or_fetch("Berlin").await.unwrap();
    tokio::time::advance(Duration::from_secs(600)).await;

    coordinator.get_or_fetch("Berlin").await.unwrap();
    assert_eq!(api.calls_for("Berlin"), 2);
  }

  #[tokio::test]
  async fn refresh_bypasses_a_fresh_cache_hit() {
    let api = Arc::new(MockApi::new());
    let coordinator = coordinator(api.clone(), 10);

    coordinator.get_or_fetch("Berlin").await.unwrap();
    coordinator.refresh("Berlin").await.unwrap();

    assert_eq!(api.calls_for("Berlin"), 2);
  }
}
