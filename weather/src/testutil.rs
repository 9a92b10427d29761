// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{fetch::WeatherApi, models::weather::WeatherInfo};
use async_trait::async_trait;
use error::Error;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Scriptable in-memory fetcher: counts calls per city, optionally delays,
/// and returns either a configured result or an echo snapshot for the city.
pub(crate) struct MockApi {
  responses: Mutex<HashMap<String, Result<WeatherInfo, Error>>>,
  calls: Mutex<HashMap<String, usize>>,
  delay: Mutex<Duration>,
}

impl MockApi {
  pub(crate) fn new() -> Self {
    Self {
      responses: Mutex::new(HashMap::new()),
      calls: Mutex::new(HashMap::new()),
      delay: Mutex::new(Duration::ZERO),
    }
  }

  pub(crate) fn snapshot(city: &str, temp: f64) -> WeatherInfo {
    WeatherInfo {
      temp,
      feels_like: temp - 1.5,
      visibility: 10000,
      condition: "Clouds".into(),
      description: "scattered clouds".into(),
      observed_at: 1675744800,
      sunrise: 1675751262,
      sunset: 1675787560,
      timezone: 3600,
      city: city.into(),
    }
  }

  pub(crate) fn set_response(&self, city: &str, result: Result<WeatherInfo, Error>) {
    self
      .responses
      .lock()
      .unwrap()
      .insert(city.to_string(), result);
  }

  pub(crate) fn set_delay(&self, delay: Duration) {
    *self.delay.lock().unwrap() = delay;
  }

  pub(crate) fn calls_for(&self, city: &str) -> usize {
    self.calls.lock().unwrap().get(city).copied().unwrap_or(0)
  }

  pub(crate) fn total_calls(&self) -> usize {
    self.calls.lock().unwrap().values().sum()
  }
}

#[async_trait]
impl WeatherApi for MockApi {
  async fn fetch_weather(&self, city: &str) -> Result<WeatherInfo, Error> {
    *self
      .calls
      .lock()
      .unwrap()
      .entry(city.to_string())
      .or_insert(0) += 1;

    let delay = *self.delay.lock().unwrap();
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }

    match self.responses.lock().unwrap().get(city) {
      Some(result) => result.clone(),
      None => Ok(Self::snapshot(city, 20.0)),
    }
  }
}
