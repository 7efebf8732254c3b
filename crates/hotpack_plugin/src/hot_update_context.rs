use std::path::{Path, PathBuf};

use anyhow::Context;
use hotpack_common::{FsEventKind, ModuleUrl};
use hotpack_fs::SharedFileSystem;
use tokio::sync::OnceCell;

/// Passed to `handle_hot_update` hooks for one file change.
pub struct HotUpdateContext {
  pub file: PathBuf,
  pub kind: FsEventKind,
  pub timestamp: u64,
  /// The modules that will be updated. Each hook sees the list left by the previous one.
  pub modules: Vec<ModuleUrl>,
  fs: SharedFileSystem,
  content: OnceCell<String>,
}

impl HotUpdateContext {
  pub fn new(
    file: PathBuf,
    kind: FsEventKind,
    timestamp: u64,
    modules: Vec<ModuleUrl>,
    fs: SharedFileSystem,
  ) -> Self {
    Self { file, kind, timestamp, modules, fs, content: OnceCell::new() }
  }

  pub fn file(&self) -> &Path {
    &self.file
  }

  /// The new content of the changed file. Read on first call, then cached.
  pub async fn read(&self) -> anyhow::Result<&str> {
    let content = self
      .content
      .get_or_try_init(|| async {
        self
          .fs
          .read_to_string(&self.file)
          .with_context(|| format!("Failed to read {}", self.file.display()))
      })
      .await?;
    Ok(content.as_str())
  }
}
