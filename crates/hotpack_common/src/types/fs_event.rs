use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEventKind {
  Add,
  Change,
  Unlink,
}

/// A file system change reported by a watcher. `path` is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
  pub path: PathBuf,
  pub kind: FsEventKind,
}

impl FsEvent {
  pub fn new(path: impl Into<PathBuf>, kind: FsEventKind) -> Self {
    Self { path: path.into(), kind }
  }
}
