// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
use error::Error;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Enforces at most one live client per API key.
///
/// An explicit collaborator held by the composition root rather than
/// process-wide state: tests get disposable registries instead of having to
/// reset a global. Slots are claimed at client construction and released
/// only by explicit teardown (`WeatherService::shutdown`).
#[derive(Debug, Default, Clone)]
pub struct ClientRegistry {
  keys: Arc<Mutex<HashSet<String>>>,
}

impl ClientRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn register(&self, api_key: &str) -> Result<(), Error> {
    let mut keys = self.keys.lock().expect("registry lock poisoned");
    if !keys.insert(api_key.to_string()) {
      return Err(Error::InstanceExists(mask(api_key)));
    }
    debug!("Registered client for key {}", mask(api_key));
    Ok(())
  }

  pub(crate) fn release(&self, api_key: &str) {
    let mut keys = self.keys.lock().expect("registry lock poisoned");
    keys.remove(api_key);
    debug!("Released client for key {}", mask(api_key));
  }

  /// Drops every registration. Reset hook for tests.
  pub fn clear(&self) {
    self.keys.lock().expect("registry lock poisoned").clear();
  }

  pub fn len(&self) -> usize {
    self.keys.lock().expect("registry lock poisoned").len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

// Error messages and logs must not leak the credential itself.
fn mask(api_key: &str) -> String {
  let visible: String = api_key.chars().take(4).collect();
  format!("{}****", visible)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_a_second_registration_of_the_same_key() {
    let registry = ClientRegistry::new();
    registry.register("abcdef123456").unwrap();
    assert!(matches!(
      registry.register("abcdef123456"),
      Err(Error::InstanceExists(_))
    ));
  }

  #[test]
  fn different_keys_coexist() {
    let registry = ClientRegistry::new();
    registry.register("key-one").unwrap();
    registry.register("key-two").unwrap();
    assert_eq!(registry.len(), 2);
  }

  #[test]
  fn release_frees_the_slot() {
    let registry = ClientRegistry::new();
    registry.register("abcdef123456").unwrap();
    registry.release("abcdef123456");
    registry.register("abcdef123456").unwrap();
  }

  #[test]
  fn clear_resets_everything() {
    let registry = ClientRegistry::new();
    registry.register("key-one").unwrap();
    registry.register("key-two").unwrap();
    registry.clear();
    assert!(registry.is_empty());
    registry.register("key-one").unwrap();
  }

  #[test]
  fn errors_do_not_leak_the_full_key() {
    let registry = ClientRegistry::new();
    registry.register("abcdef123456").unwrap();
    let Err(Error::InstanceExists(masked)) = registry.register("abcdef123456") else {
      panic!("expected InstanceExists");
    };
    assert!(!masked.contains("abcdef123456"));
    assert!(masked.starts_with("abcd"));
  }
}
