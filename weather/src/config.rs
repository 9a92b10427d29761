// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::constants::{CACHE_CAPACITY, CACHE_TTL};
use ::config::{Units, WeatherSettings};
use error::Error;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WeatherConfig {
  pub(crate) api_key: String,
  pub(crate) units: Units,
  pub(crate) cache_capacity: usize,
  pub(crate) cache_ttl: Duration,
}

impl WeatherConfig {
  /// Fails with a configuration error when the API key is missing or empty,
  /// before any cache or network state exists.
  pub fn new(api_key: impl Into<String>, units: Units) -> Result<Self, Error> {
    let api_key = api_key.into();
    if api_key.trim().is_empty() {
      return Err(Error::InvalidApiKey);
    }

    Ok(Self {
      api_key,
      units,
      cache_capacity: CACHE_CAPACITY,
      cache_ttl: CACHE_TTL,
    })
  }

  pub fn from_settings(settings: &WeatherSettings) -> Result<Self, Error> {
    Self::new(settings.api_key.clone(), settings.units)
  }
}
