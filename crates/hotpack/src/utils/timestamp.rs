use std::{
  sync::atomic::{AtomicU64, Ordering},
  time::{SystemTime, UNIX_EPOCH},
};

/// Hands out millisecond timestamps for HMR cycles. Two cycles never share a
/// timestamp, otherwise the browser would serve the second from its cache.
#[derive(Debug, Default)]
pub struct HmrClock {
  last: AtomicU64,
}

impl HmrClock {
  pub fn now(&self) -> u64 {
    let wall = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    let mut previous = self.last.load(Ordering::Relaxed);
    loop {
      let next = wall.max(previous + 1);
      match self.last.compare_exchange_weak(previous, next, Ordering::Relaxed, Ordering::Relaxed) {
        Ok(_) => return next,
        Err(actual) => previous = actual,
      }
    }
  }
}

#[test]
fn test_strictly_increasing() {
  let clock = HmrClock::default();
  let first = clock.now();
  let second = clock.now();
  assert!(second > first);
}
