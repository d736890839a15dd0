//! Clock Port - Injected Time Source
//!
//! Cache expiry and expiry-date statistics depend on "now"; injecting the
//! clock keeps both deterministic under test.

use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Time source abstraction.
pub trait Clock: Send + Sync + 'static {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Manually-advanced clock for tests.
#[derive(Debug)]
pub struct ManualClock {
  now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self {
      now: Mutex::new(start),
    }
  }

  /// Move the clock forward.
  pub fn advance(&self, delta: chrono::Duration) {
    let mut guard = self.now.lock().unwrap_or_else(|p| p.into_inner());
    *guard += delta;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(|p| p.into_inner())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_manual_clock_advances() {
    let start = Utc::now();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);
    clock.advance(chrono::Duration::seconds(90));
    assert_eq!(clock.now(), start + chrono::Duration::seconds(90));
  }
}
