// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  cache::BoundedTtlCache,
  config::WeatherConfig,
  fetch::{OpenWeatherClient, WeatherApi},
  models::weather::WeatherInfo,
  registry::ClientRegistry,
  scheduler::RefreshScheduler,
  singleflight::FetchCoordinator,
};
use error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Fetch on demand only; cache entries go stale after the TTL.
  OnDemand,
  /// Additionally keep every cached city fresh on a periodic timer.
  Polling { interval: Duration },
}

/// Facade over one cache, one fetch coordinator and one refresh scheduler.
pub struct WeatherService {
  config: WeatherConfig,
  cache: Arc<BoundedTtlCache>,
  coordinator: Arc<FetchCoordinator>,
  scheduler: RefreshScheduler,
  registry: ClientRegistry,
}

impl WeatherService {
  /// Fails with a configuration error before any cache or scheduler state is
  /// created when the credential is unusable, and with `InstanceExists` when
  /// another live client already holds this API key.
  pub fn new(config: WeatherConfig, mode: Mode, registry: &ClientRegistry) -> Result<Self, Error> {
    let api = Arc::new(OpenWeatherClient::new(&config)?);
    Self::with_api(config, mode, registry, api)
  }

  pub(crate) fn with_api(
    config: WeatherConfig,
    mode: Mode,
    registry: &ClientRegistry,
    api: Arc<dyn WeatherApi>,
  ) -> Result<Self, Error> {
    registry.register(&config.api_key)?;

    let cache = Arc::new(BoundedTtlCache::new(config.cache_capacity, config.cache_ttl));
    let coordinator = Arc::new(FetchCoordinator::new(api, Arc::clone(&cache)));
    let scheduler = RefreshScheduler::new(Arc::clone(&coordinator), Arc::clone(&cache));

    let service = Self {
      config,
      cache,
      coordinator,
      scheduler,
      registry: registry.clone(),
    };

    if let Mode::Polling { interval } = mode {
      service.start_polling(interval);
    }
    Ok(service)
  }

  pub fn api_key(&self) -> &str {
    &self.config.api_key
  }

  /// Returns the snapshot for `city`, from cache when fresh, otherwise via
  /// a (coalesced) remote fetch.
  #[instrument(skip(self))]
  pub async fn get_weather(&self, city: &str) -> Result<WeatherInfo, Error> {
    self.coordinator.get_or_fetch(city).await
  }

  pub fn start_polling(&self, interval: Duration) {
    self.scheduler.start(interval);
  }

  pub async fn stop_polling(&self) {
    self.scheduler.stop().await;
  }

  /// Number of cities currently cached.
  pub async fn cached_cities(&self) -> usize {
    self.cache.len().await
  }

  /// Explicit teardown: stops the scheduler and frees this API key's
  /// registry slot. Dropping the service without calling this keeps the
  /// slot claimed.
  #[instrument(skip(self))]
  pub async fn shutdown(self) {
    self.scheduler.stop().await;
    self.registry.release(&self.config.api_key);
    info!("Weather service shut down");
  }
}
