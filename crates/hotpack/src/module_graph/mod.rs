mod invalidate;
mod prune;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use arcstr::ArcStr;
use hotpack_common::{ModuleInfo, ModuleNode, ModuleState, ModuleUrl, ResolvedId, TransformResult};
use hotpack_utils::indexmap::FxIndexSet;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

pub use invalidate::{HmrBoundary, InvalidationResult};

pub type SharedModuleGraph = Arc<ModuleGraph>;

/// The live graph of every module the browser has asked for, directly or
/// through an import.
///
/// The lock is only ever held for the duration of a single operation and
/// never across an `.await`, so unrelated modules compile in parallel.
#[derive(Default)]
pub struct ModuleGraph {
  inner: RwLock<GraphInner>,
}

#[derive(Default)]
struct GraphInner {
  url_to_module: FxHashMap<ModuleUrl, ModuleNode>,
  id_to_url: FxHashMap<ArcStr, ModuleUrl>,
  /// One file may back several urls, e.g. `/a.css` and `/a.css?inline`.
  file_to_urls: FxHashMap<PathBuf, FxIndexSet<ModuleUrl>>,
  entries: FxIndexSet<ModuleUrl>,
}

impl GraphInner {
  fn ensure_node(&mut self, url: &ModuleUrl) -> &mut ModuleNode {
    self.url_to_module.entry(url.clone()).or_insert_with(|| ModuleNode::new(url.clone()))
  }
}

impl ModuleGraph {
  pub fn new_shared() -> SharedModuleGraph {
    Arc::new(Self::default())
  }

  /// Strips the hash and cache-busting query parameters from a request url.
  pub fn resolve_url(&self, raw_url: &str) -> ModuleUrl {
    ModuleUrl::canonicalize(raw_url)
  }

  /// Get-or-create. Never fails.
  pub fn ensure_entry_from_url(&self, url: &ModuleUrl) -> ModuleInfo {
    self.inner.write().ensure_node(url).to_info()
  }

  /// Records what `url` resolved to and indexes it by id and file.
  pub fn update_resolved(&self, url: &ModuleUrl, resolved: &ResolvedId) {
    let mut inner = self.inner.write();
    let file = resolved.file();
    let node = inner.ensure_node(url);
    let previous_file = std::mem::replace(&mut node.file, file.clone());
    node.id = Some(resolved.id.clone());

    if let Some(previous_file) = previous_file.filter(|previous| Some(previous) != file.as_ref()) {
      if let Some(urls) = inner.file_to_urls.get_mut(&previous_file) {
        urls.shift_remove(url);
      }
    }
    inner.id_to_url.insert(resolved.id.clone(), url.clone());
    if let Some(file) = file {
      inner.file_to_urls.entry(file).or_default().insert(url.clone());
    }
  }

  pub fn get_module_by_url(&self, url: &str) -> Option<ModuleInfo> {
    self.inner.read().url_to_module.get(url).map(ModuleNode::to_info)
  }

  pub fn get_module_by_id(&self, id: &str) -> Option<ModuleInfo> {
    let inner = self.inner.read();
    let url = inner.id_to_url.get(id)?;
    inner.url_to_module.get(url).map(ModuleNode::to_info)
  }

  pub fn get_modules_by_file(&self, file: &Path) -> FxIndexSet<ModuleUrl> {
    self.inner.read().file_to_urls.get(file).cloned().unwrap_or_default()
  }

  pub fn module_count(&self) -> usize {
    self.inner.read().url_to_module.len()
  }

  pub fn urls(&self) -> Vec<ModuleUrl> {
    self.inner.read().url_to_module.keys().cloned().collect()
  }

  /// Rewires the forward edges of `url` to exactly `imported`, keeping the
  /// back references of both old and new dependencies in sync. Accepted deps
  /// outside `imported` are ignored.
  ///
  /// Returns the modules that lost their last importer because of this call.
  pub fn update_module_info(
    &self,
    url: &ModuleUrl,
    imported: &FxIndexSet<ModuleUrl>,
    accepted: &FxIndexSet<ModuleUrl>,
    is_self_accepting: bool,
  ) -> FxIndexSet<ModuleUrl> {
    let mut inner = self.inner.write();

    let node = inner.ensure_node(url);
    let previous = std::mem::replace(&mut node.imported_modules, imported.clone());
    node.accepted_hmr_deps = accepted.intersection(imported).cloned().collect();
    node.is_self_accepting = is_self_accepting;

    for dep in imported {
      inner.ensure_node(dep).importers.insert(url.clone());
    }

    let mut no_longer_imported = FxIndexSet::default();
    for dep in previous.iter().filter(|dep| !imported.contains(*dep)) {
      if let Some(dep_node) = inner.url_to_module.get_mut(dep) {
        dep_node.importers.shift_remove(url);
        if dep_node.importers.is_empty() {
          no_longer_imported.insert(dep.clone());
        }
      }
    }
    no_longer_imported
  }

  /// Marks `url` as a root of the reachability sweep.
  pub fn mark_entry(&self, url: &ModuleUrl) {
    let mut inner = self.inner.write();
    inner.ensure_node(url);
    inner.entries.insert(url.clone());
  }

  pub fn is_entry(&self, url: &str) -> bool {
    self.inner.read().entries.contains(url)
  }

  /// The cached output of `url`, if it is fresh.
  pub fn cached_result(&self, url: &str) -> Option<Arc<TransformResult>> {
    let inner = self.inner.read();
    let node = inner.url_to_module.get(url)?;
    match node.state {
      ModuleState::Fresh => node.transform_result.clone(),
      _ => None,
    }
  }

  /// Moves `url` to `Compiling` unless it was invalidated after `version`
  /// was observed.
  pub fn begin_compile(&self, url: &ModuleUrl, version: u64) {
    let mut inner = self.inner.write();
    let node = inner.ensure_node(url);
    if node.version == version {
      node.state = ModuleState::Compiling;
    }
  }

  /// Stores `result` if nothing invalidated `url` since `version`. Returns
  /// whether the result was committed.
  pub fn commit_transform_result(
    &self,
    url: &ModuleUrl,
    version: u64,
    result: Arc<TransformResult>,
  ) -> bool {
    let mut inner = self.inner.write();
    let Some(node) = inner.url_to_module.get_mut(url) else {
      return false;
    };
    if node.version != version {
      return false;
    }
    node.transform_result = Some(result);
    node.state = ModuleState::Fresh;
    true
  }

  /// Nothing is cached for an errored module, so the next request starts over.
  pub fn mark_errored(&self, url: &ModuleUrl, version: u64) {
    let mut inner = self.inner.write();
    if let Some(node) = inner.url_to_module.get_mut(url).filter(|node| node.version == version) {
      node.transform_result = None;
      node.state = ModuleState::Errored;
    }
  }

  pub fn has_errored_modules(&self) -> bool {
    self.inner.read().url_to_module.values().any(|node| node.state == ModuleState::Errored)
  }

  pub fn errored_modules(&self) -> Vec<ModuleUrl> {
    self
      .inner
      .read()
      .url_to_module
      .values()
      .filter(|node| node.state == ModuleState::Errored)
      .map(|node| node.url.clone())
      .collect()
  }
}
