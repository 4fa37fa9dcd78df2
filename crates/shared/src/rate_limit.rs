use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;

/// Fixed-window request counter keyed by `(api_key_hash, floor(now/60s))`.
///
/// Entries are lazily evicted: any key whose window is more than `TTL_SECS`
/// old is dropped the next time `check` sweeps the map, so the map never
/// grows unbounded even without a background reaper.
pub struct RateLimiter {
  limit_per_minute: u32,
  counters: DashMap<(String, u64), u32>,
}

const WINDOW_SECS: u64 = 60;
const TTL_SECS: u64 = 90;

impl RateLimiter {
  #[must_use]
  pub fn new(limit_per_minute: u32) -> Self {
    Self {
      limit_per_minute,
      counters: DashMap::new(),
    }
  }

  fn now_secs() -> u64 {
    SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|d| d.as_secs())
      .unwrap_or_default()
  }

  /// Record a request for `api_key_hash` and report whether it is allowed.
  ///
  /// Returns `true` when the request is within the limit for the current
  /// window, `false` when it should be rejected with `rate_limit_exceeded`.
  pub fn check(&self, api_key_hash: &str) -> bool {
    let now = Self::now_secs();
    let window = now / WINDOW_SECS;

    self
      .counters
      .retain(|(_, w), _| now.saturating_sub(w * WINDOW_SECS) < TTL_SECS);

    let key = (api_key_hash.to_owned(), window);
    let mut entry = self.counters.entry(key).or_insert(0);
    *entry += 1;
    *entry <= self.limit_per_minute
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allows_up_to_the_limit() {
    let limiter = RateLimiter::new(3);
    assert!(limiter.check("key"));
    assert!(limiter.check("key"));
    assert!(limiter.check("key"));
    assert!(!limiter.check("key"));
  }

  #[test]
  fn tracks_keys_independently() {
    let limiter = RateLimiter::new(1);
    assert!(limiter.check("a"));
    assert!(limiter.check("b"));
    assert!(!limiter.check("a"));
  }
}
