// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use anyhow::{Context, Result};
use config::Config;
use std::env;
use std::time::Duration;
use tracing::info;
use weather::{ClientRegistry, Mode, WeatherConfig, WeatherService};

const DEFAULT_POLLING_INTERVAL_SECS: u64 = 600;

#[cfg(debug_assertions)]
fn setup_logging() {
  tracing_subscriber::fmt()
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .init();
}

#[cfg(not(debug_assertions))]
fn setup_logging() {
  tracing_subscriber::fmt().init();
}

#[tokio::main]
async fn main() -> Result<()> {
  setup_logging();

  let config = Config::load().context("Failed to load configuration")?;
  let settings = config.weather.clone();

  let args: Vec<String> = env::args().skip(1).collect();
  let poll = args.iter().any(|arg| arg == "--poll");
  let city = args
    .iter()
    .find(|arg| !arg.starts_with("--"))
    .cloned()
    .or_else(|| settings.default_city.clone())
    .context("No city given and no default_city configured")?;

  let mode = if poll {
    Mode::Polling {
      interval: Duration::from_secs(
        settings
          .polling_interval_secs
          .unwrap_or(DEFAULT_POLLING_INTERVAL_SECS),
      ),
    }
  } else {
    Mode::OnDemand
  };

  let registry = ClientRegistry::new();
  let service = WeatherService::new(WeatherConfig::from_settings(&settings)?, mode, &registry)?;

  let weather = service.get_weather(&city).await?;
  println!("{}", weather.format_summary());

  if poll {
    info!("Polling weather for cached cities; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
      .await
      .context("Failed to listen for shutdown signal")?;
  }

  service.shutdown().await;
  Ok(())
}
