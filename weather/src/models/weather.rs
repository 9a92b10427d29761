// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use super::api::WeatherResponse;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use error::Error;
use serde::Serialize;

/// Point-in-time weather observation for one city.
///
/// Timestamps are epoch seconds as reported by the API; `timezone` is the
/// UTC offset of the observed location in seconds. Two snapshots with equal
/// fields are interchangeable.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherInfo {
  pub temp: f64,
  pub feels_like: f64,
  pub visibility: u32,
  pub condition: String,
  pub description: String,
  pub observed_at: i64,
  pub sunrise: i64,
  pub sunset: i64,
  pub timezone: i32,
  /// Canonical city name as returned by the API; may differ from the query.
  pub city: String,
}

impl WeatherInfo {
  pub(crate) fn from_response(response: WeatherResponse) -> Result<Self, Error> {
    let weather = response
      .weather
      .first()
      .ok_or_else(|| Error::InvalidResponse("No weather data available".into()))?;

    FixedOffset::east_opt(response.timezone)
      .ok_or_else(|| Error::InvalidResponse("Invalid timezone offset".into()))?;

    Ok(Self {
      temp: response.main.temp,
      feels_like: response.main.feels_like,
      visibility: response.visibility,
      condition: weather.main.clone(),
      description: weather.description.clone(),
      observed_at: response.dt,
      sunrise: response.sys.sunrise,
      sunset: response.sys.sunset,
      timezone: response.timezone,
      city: response.name,
    })
  }

  pub fn local_sunrise(&self) -> Option<DateTime<FixedOffset>> {
    self.local_time(self.sunrise)
  }

  pub fn local_sunset(&self) -> Option<DateTime<FixedOffset>> {
    self.local_time(self.sunset)
  }

  fn local_time(&self, epoch: i64) -> Option<DateTime<FixedOffset>> {
    let tz_offset = FixedOffset::east_opt(self.timezone)?;
    Utc
      .timestamp_opt(epoch, 0)
      .single()
      .map(|dt| dt.with_timezone(&tz_offset))
  }

  pub fn format_summary(&self) -> String {
    let sun = match (self.local_sunrise(), self.local_sunset()) {
      (Some(sunrise), Some(sunset)) => format!(
        "The sun rises at {} and sets at {}.",
        sunrise.format("%H:%M"),
        sunset.format("%H:%M")
      ),
      _ => String::new(),
    };
    format!(
      "Currently in {}: {:.1}°C (feels like {:.1}°C), {}, visibility {} m.\n{}",
      self.city, self.temp, self.feels_like, self.description, self.visibility, sun,
    )
  }
}
