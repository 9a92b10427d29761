// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use crate::{cache::BoundedTtlCache, singleflight::FetchCoordinator};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Periodic refresh of every city currently held in the cache.
///
/// `start` fires one tick immediately, then every `interval`. A failure for
/// one city is logged and neither cancels the tick nor stops the scheduler.
/// `stop` signals shutdown and then awaits the task, so no tick runs after
/// it returns; fetches already in flight are left to finish on their own.
pub struct RefreshScheduler {
  coordinator: Arc<FetchCoordinator>,
  cache: Arc<BoundedTtlCache>,
  running: Mutex<Option<RunningRefresh>>,
}

struct RunningRefresh {
  shutdown: watch::Sender<bool>,
  handle: JoinHandle<()>,
}

impl RefreshScheduler {
  pub fn new(coordinator: Arc<FetchCoordinator>, cache: Arc<BoundedTtlCache>) -> Self {
    Self {
      coordinator,
      cache,
      running: Mutex::new(None),
    }
  }

  /// Starts the periodic task. A second `start` while running is ignored;
  /// there is only ever one live timer per scheduler.
  pub fn start(&self, interval: Duration) {
    let mut running = self.running.lock().expect("scheduler lock poisoned");
    if running.is_some() {
      warn!("Refresh scheduler already running, ignoring start");
      return;
    }

    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let coordinator = Arc::clone(&self.coordinator);
    let cache = Arc::clone(&self.cache);

    let handle = tokio::spawn(async move {
      let mut ticker = tokio::time::interval(interval);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        tokio::select! {
          biased;
          _ = shutdown_rx.changed() => break,
          _ = ticker.tick() => {
            Self::refresh_all(&coordinator, &cache).await;
          }
        }
      }
      debug!("Refresh scheduler stopped");
    });

    info!("Refresh scheduler started with interval {:?}", interval);
    *running = Some(RunningRefresh { shutdown, handle });
  }

  /// Signals shutdown and drains the running task. No tick fires after this
  /// returns. A stopped scheduler can be started again.
  pub async fn stop(&self) {
    let running = self
      .running
      .lock()
      .expect("scheduler lock poisoned")
      .take();
    if let Some(RunningRefresh { shutdown, handle }) = running {
      let _ = shutdown.send(true);
      let _ = handle.await;
    }
  }

  pub fn is_running(&self) -> bool {
    self
      .running
      .lock()
      .expect("scheduler lock poisoned")
      .is_some()
  }

  async fn refresh_all(coordinator: &FetchCoordinator, cache: &BoundedTtlCache) {
    let cities = cache.keys().await;
    debug!("Polling weather data for {} cities", cities.len());
    for city in cities {
      match coordinator.refresh(&city).await {
        Ok(_) => debug!("Updated weather for {}", city),
        Err(e) => warn!("Failed to refresh weather for {}: {}", city, e),
      }
    }
  }
}
