use std::path::{Path, PathBuf};

use hotpack_fs::SharedFileSystem;

/// What every hook gets to see of the dev server.
#[derive(Clone)]
pub struct PluginContext {
  root: PathBuf,
  fs: SharedFileSystem,
}

impl PluginContext {
  pub fn new(root: PathBuf, fs: SharedFileSystem) -> Self {
    Self { root, fs }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn fs(&self) -> &SharedFileSystem {
    &self.fs
  }
}
