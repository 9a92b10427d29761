// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{
  config::WeatherConfig,
  constants::{API_BASE_URL, REQUEST_TIMEOUT},
  models::{api::WeatherResponse, weather::WeatherInfo},
};
use ::config::Units;
use async_trait::async_trait;
use error::Error;
use tracing::{error, instrument};
use url::Url;

/// One network round trip: city in, parsed snapshot out.
#[async_trait]
pub trait WeatherApi: Send + Sync {
  async fn fetch_weather(&self, city: &str) -> Result<WeatherInfo, Error>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
  client: reqwest::Client,
  api_key: String,
  units: Units,
  base_url: String,
}

impl OpenWeatherClient {
  pub fn new(config: &WeatherConfig) -> Result<Self, Error> {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()?;

    Ok(Self {
      client,
      api_key: config.api_key.clone(),
      units: config.units,
      base_url: API_BASE_URL.into(),
    })
  }

  #[cfg(test)]
  pub(crate) fn with_base_url(config: &WeatherConfig, base_url: &str) -> Result<Self, Error> {
    let mut client = Self::new(config)?;
    client.base_url = base_url.to_string();
    Ok(client)
  }

  fn build_api_url(&self, city: &str) -> Result<Url, Error> {
    Url::parse_with_params(
      &self.base_url,
      &[
        ("q", city),
        ("appid", &self.api_key),
        ("units", &self.units.to_string()),
      ],
    )
    .map_err(|_| Error::InvalidCity("Failed to build API URL".into()))
  }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
  #[instrument(skip(self))]
  async fn fetch_weather(&self, city: &str) -> Result<WeatherInfo, Error> {
    if city.trim().is_empty() {
      return Err(Error::InvalidCity("City name cannot be empty".into()));
    }

    let url = self.build_api_url(city)?;
    let response = self.client.get(url).send().await?;

    match response.status() {
      reqwest::StatusCode::OK => (),
      reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(Error::RateLimitExceeded),
      status => {
        error!("API request failed with status: {}", status);
        return Err(Error::ApiError(status.as_u16()));
      }
    }

    let weather_data: WeatherResponse = response
      .json()
      .await
      .map_err(|e| Error::ParseError(e.to_string()))?;

    if weather_data.cod != 200 {
      return Err(Error::InvalidResponse(format!(
        "Invalid response code: {}",
        weather_data.cod
      )));
    }

    WeatherInfo::from_response(weather_data)
  }
}
