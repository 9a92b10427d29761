// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::Error;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::instrument;

const CONFIG_PATH_ENV: &str = "SKYCAST_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "skycast.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub weather: WeatherSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSettings {
  pub api_key: String,
  #[serde(default)]
  pub units: Units,
  pub default_city: Option<String>,
  pub polling_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Units {
  #[default]
  Metric,
  Imperial,
  Standard,
}

impl Config {
  #[instrument(skip(path))]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
    let content = fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content).map_err(|e| Error::ConfigError(e.to_string()))?;
    if config.weather.api_key.trim().is_empty() {
      return Err(Error::InvalidApiKey);
    }
    tracing::debug!("Loaded configuration successfully");
    Ok(config)
  }

  /// Loads from the path in `SKYCAST_CONFIG`, falling back to `skycast.toml`.
  pub fn load() -> Result<Self, Error> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    Self::from_file(path)
  }
}

impl std::fmt::Display for Units {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let units = match self {
      Units::Metric => "metric",
      Units::Imperial => "imperial",
      Units::Standard => "standard",
    };
    write!(f, "{}", units)
  }
}
