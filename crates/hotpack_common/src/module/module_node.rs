use std::{path::PathBuf, sync::Arc};

use arcstr::ArcStr;
use hotpack_utils::indexmap::FxIndexSet;

use crate::{ModuleInfo, ModuleState, ModuleUrl, TransformResult};

/// A vertex of the module graph. Edges are stored as urls on both ends and are
/// kept symmetric by the graph: `a` is in `b.importers` exactly when `b` is in
/// `a.imported_modules`.
#[derive(Debug)]
pub struct ModuleNode {
  pub url: ModuleUrl,
  /// Set once the url has been resolved.
  pub id: Option<ArcStr>,
  /// `None` for virtual modules.
  pub file: Option<PathBuf>,
  pub imported_modules: FxIndexSet<ModuleUrl>,
  pub importers: FxIndexSet<ModuleUrl>,
  /// Imported modules whose updates this module applies itself.
  pub accepted_hmr_deps: FxIndexSet<ModuleUrl>,
  pub is_self_accepting: bool,
  pub transform_result: Option<Arc<TransformResult>>,
  /// Bumped on every invalidation. A compile that started on an older version
  /// must not be committed.
  pub version: u64,
  pub state: ModuleState,
  /// Timestamp of the last HMR invalidation, `0` if never hot updated.
  pub last_hmr_timestamp: u64,
  pub last_invalidation_timestamp: u64,
}

impl ModuleNode {
  pub fn new(url: ModuleUrl) -> Self {
    Self {
      url,
      id: None,
      file: None,
      imported_modules: FxIndexSet::default(),
      importers: FxIndexSet::default(),
      accepted_hmr_deps: FxIndexSet::default(),
      is_self_accepting: false,
      transform_result: None,
      version: 0,
      state: ModuleState::Stale,
      last_hmr_timestamp: 0,
      last_invalidation_timestamp: 0,
    }
  }

  pub fn to_info(&self) -> ModuleInfo {
    ModuleInfo {
      url: self.url.clone(),
      id: self.id.clone(),
      file: self.file.clone(),
      importers: self.importers.clone(),
      imported_modules: self.imported_modules.clone(),
      accepted_hmr_deps: self.accepted_hmr_deps.clone(),
      is_self_accepting: self.is_self_accepting,
      state: self.state,
      version: self.version,
      has_transform_result: self.transform_result.is_some(),
      last_hmr_timestamp: self.last_hmr_timestamp,
      last_invalidation_timestamp: self.last_invalidation_timestamp,
    }
  }
}
