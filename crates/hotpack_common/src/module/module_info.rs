use std::path::PathBuf;

use arcstr::ArcStr;
use hotpack_utils::indexmap::FxIndexSet;

use crate::{ModuleState, ModuleUrl};

/// A point-in-time copy of a [crate::ModuleNode], detached from the graph.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
  pub url: ModuleUrl,
  pub id: Option<ArcStr>,
  pub file: Option<PathBuf>,
  pub importers: FxIndexSet<ModuleUrl>,
  pub imported_modules: FxIndexSet<ModuleUrl>,
  pub accepted_hmr_deps: FxIndexSet<ModuleUrl>,
  pub is_self_accepting: bool,
  pub state: ModuleState,
  pub version: u64,
  pub has_transform_result: bool,
  pub last_hmr_timestamp: u64,
  pub last_invalidation_timestamp: u64,
}
