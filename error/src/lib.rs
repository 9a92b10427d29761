// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use thiserror::Error as ThisError;

/// Shared error taxonomy for the SDK.
///
/// Variants are `Clone` so a single fetch result can be delivered to every
/// caller coalesced onto the same in-flight request.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  #[error("Configuration error: {0}")]
  ConfigError(String),
  #[error("Invalid API key")]
  InvalidApiKey,
  #[error("An instance with this API key is already registered: {0}")]
  InstanceExists(String),
  #[error("Invalid city name: {0}")]
  InvalidCity(String),
  #[error("Network error: {0}")]
  NetworkError(String),
  #[error("Timeout error")]
  TimeoutError,
  #[error("API request failed with status: {0}")]
  ApiError(u16),
  #[error("Rate limit exceeded")]
  RateLimitExceeded,
  #[error("Failed to parse response: {0}")]
  ParseError(String),
  #[error("Invalid response from weather API: {0}")]
  InvalidResponse(String),
  #[error("Fetch coordination failed for {0}")]
  CoordinationError(String),
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Error::TimeoutError
    } else if e.is_decode() {
      Error::ParseError(e.to_string())
    } else {
      Error::NetworkError(e.to_string())
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Error::ConfigError(e.to_string())
  }
}
