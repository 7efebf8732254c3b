use std::path::{Path, PathBuf};

use dashmap::DashMap;

/// Collapses bursts of events for the same path: every event bumps the
/// generation of its path and only the cycle scheduled for the latest
/// generation is allowed to run.
#[derive(Default)]
pub struct Debouncer {
  generations: DashMap<PathBuf, u64>,
}

impl Debouncer {
  pub fn record(&self, path: &Path) -> u64 {
    let mut generation = self.generations.entry(path.to_path_buf()).or_insert(0);
    *generation += 1;
    *generation
  }

  /// True if no event for `path` arrived after `generation`. The path is
  /// forgotten in that case.
  pub fn take_if_latest(&self, path: &Path, generation: u64) -> bool {
    self.generations.remove_if(path, |_, latest| *latest == generation).is_some()
  }

  pub fn pending(&self) -> usize {
    self.generations.len()
  }
}

#[test]
fn only_latest_generation_runs() {
  let debouncer = Debouncer::default();
  let path = Path::new("/project/src/a.ts");
  let first = debouncer.record(path);
  let second = debouncer.record(path);
  let other = debouncer.record(Path::new("/project/src/b.ts"));

  assert!(!debouncer.take_if_latest(path, first));
  assert!(debouncer.take_if_latest(path, second));
  assert!(!debouncer.take_if_latest(path, second));
  assert!(debouncer.take_if_latest(Path::new("/project/src/b.ts"), other));
  assert_eq!(debouncer.pending(), 0);
}
