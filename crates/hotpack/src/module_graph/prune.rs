use std::collections::VecDeque;

use hotpack_common::ModuleUrl;
use rustc_hash::FxHashSet;

use super::ModuleGraph;

impl ModuleGraph {
  /// Removes every module that can not be reached from an entry by following
  /// imports. Returns the removed urls.
  pub fn prune_unreachable(&self) -> Vec<ModuleUrl> {
    let mut inner = self.inner.write();

    let mut reachable = FxHashSet::default();
    let mut queue = inner.entries.iter().cloned().collect::<VecDeque<_>>();
    while let Some(url) = queue.pop_front() {
      if !reachable.insert(url.clone()) {
        continue;
      }
      if let Some(node) = inner.url_to_module.get(&url) {
        queue.extend(node.imported_modules.iter().filter(|dep| !reachable.contains(*dep)).cloned());
      }
    }

    let pruned = inner
      .url_to_module
      .keys()
      .filter(|url| !reachable.contains(*url))
      .cloned()
      .collect::<Vec<_>>();

    for url in &pruned {
      let Some(node) = inner.url_to_module.remove(url) else {
        continue;
      };
      for dep in &node.imported_modules {
        if let Some(dep_node) = inner.url_to_module.get_mut(dep) {
          dep_node.importers.shift_remove(url);
        }
      }
      for importer in &node.importers {
        if let Some(importer_node) = inner.url_to_module.get_mut(importer) {
          importer_node.imported_modules.shift_remove(url);
          importer_node.accepted_hmr_deps.shift_remove(url);
        }
      }
      if let Some(id) = &node.id {
        if inner.id_to_url.get(id) == Some(url) {
          inner.id_to_url.remove(id);
        }
      }
      if let Some(file) = &node.file {
        if let Some(urls) = inner.file_to_urls.get_mut(file) {
          urls.shift_remove(url);
          if urls.is_empty() {
            inner.file_to_urls.remove(file);
          }
        }
      }
      inner.entries.shift_remove(url);
    }

    pruned
  }
}
