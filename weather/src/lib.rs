// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod cache;
pub mod config;
pub mod fetch;
pub mod models;
pub mod registry;
pub mod scheduler;
pub mod service;
pub mod singleflight;
#[cfg(test)]
pub(crate) mod testutil;

pub use crate::config::WeatherConfig;
pub use fetch::{OpenWeatherClient, WeatherApi};
pub use models::weather::WeatherInfo;
pub use registry::ClientRegistry;
pub use service::{Mode, WeatherService};

pub mod constants {
  use std::time::Duration;
  pub(crate) const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
  pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
  pub(crate) const CACHE_TTL: Duration = Duration::from_secs(10 * 60);
  pub(crate) const CACHE_CAPACITY: usize = 10;
}
