use hotpack_common::{ModuleState, ModuleUrl};
use hotpack_utils::indexmap::FxIndexSet;
use rustc_hash::FxHashSet;

use super::ModuleGraph;

/// A module that applies an update without its importers reloading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HmrBoundary {
  /// The module whose accept handler runs.
  pub boundary: ModuleUrl,
  /// The module that changed, as seen from `boundary`. Equal to `boundary`
  /// for self-accepting modules.
  pub accepted_via: ModuleUrl,
}

#[derive(Debug, Default)]
pub struct InvalidationResult {
  pub boundaries: FxIndexSet<HmrBoundary>,
  /// Propagation reached a module nobody imports and nobody accepts, so the
  /// page has to reload.
  pub has_dead_end: bool,
  /// Every module invalidated, in visiting order.
  pub invalidated: Vec<ModuleUrl>,
}

impl InvalidationResult {
  /// Also true when modules were invalidated but no path ended in a
  /// boundary, which happens for import cycles nothing accepts.
  pub fn needs_full_reload(&self) -> bool {
    self.has_dead_end || (self.boundaries.is_empty() && !self.invalidated.is_empty())
  }

  pub fn merge(&mut self, other: InvalidationResult) {
    self.boundaries.extend(other.boundaries);
    self.has_dead_end |= other.has_dead_end;
    self.invalidated.extend(other.invalidated);
  }
}

impl ModuleGraph {
  /// Invalidates `url` and walks up its importers until every path ends in a
  /// boundary or a dead end. `seen` is shared between calls of one change
  /// cycle so that every module is visited at most once, cycles included.
  ///
  /// With `is_hmr`, a self-accepting module stops the walk. An importer that
  /// accepts the module it reached through is a boundary in either mode and
  /// is left untouched.
  pub fn invalidate_module(
    &self,
    url: &ModuleUrl,
    seen: &mut FxHashSet<ModuleUrl>,
    timestamp: u64,
    is_hmr: bool,
  ) -> InvalidationResult {
    let mut inner = self.inner.write();
    let mut result = InvalidationResult::default();
    let mut stack = vec![url.clone()];

    while let Some(current) = stack.pop() {
      if !seen.insert(current.clone()) {
        continue;
      }
      let Some(node) = inner.url_to_module.get_mut(&current) else {
        continue;
      };

      node.transform_result = None;
      node.state = ModuleState::Stale;
      node.version += 1;
      node.last_invalidation_timestamp = timestamp;
      if is_hmr {
        node.last_hmr_timestamp = timestamp;
      }
      result.invalidated.push(current.clone());

      if is_hmr && node.is_self_accepting {
        result
          .boundaries
          .insert(HmrBoundary { boundary: current.clone(), accepted_via: current.clone() });
        continue;
      }

      if node.importers.is_empty() {
        result.has_dead_end |= is_hmr;
        continue;
      }

      let importers = node.importers.clone();
      for importer in importers {
        let accepts_current = inner
          .url_to_module
          .get(&importer)
          .is_some_and(|importer_node| importer_node.accepted_hmr_deps.contains(&current));
        if accepts_current {
          if is_hmr {
            result
              .boundaries
              .insert(HmrBoundary { boundary: importer, accepted_via: current.clone() });
          }
        } else if !seen.contains(&importer) {
          stack.push(importer);
        }
      }
    }

    result
  }

  /// Drops every cached result, e.g. after the config file changed.
  pub fn invalidate_all(&self, timestamp: u64) {
    let mut inner = self.inner.write();
    for node in inner.url_to_module.values_mut() {
      node.transform_result = None;
      node.state = ModuleState::Stale;
      node.version += 1;
      node.last_invalidation_timestamp = timestamp;
    }
  }
}
