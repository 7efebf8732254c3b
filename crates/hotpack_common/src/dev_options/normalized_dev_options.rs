use std::{
  path::{Path, PathBuf},
  time::Duration,
};

#[derive(Debug, Clone)]
pub struct NormalizedDevOptions {
  /// Absolute project root. Root-relative urls resolve against it.
  pub root: PathBuf,
  pub host: String,
  pub port: u16,
  pub debounce: Duration,
  pub client_buffer: usize,
  pub ping_interval: Duration,
  /// Absolute path of the config file, if any.
  pub config_file: Option<PathBuf>,
  pub conditions: Vec<String>,
  /// Absolute directories files may be served from. `root` is always first.
  pub fs_allow: Vec<PathBuf>,
}

impl NormalizedDevOptions {
  pub fn addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn is_config_file(&self, path: &Path) -> bool {
    self.config_file.as_deref() == Some(path)
  }

  /// Whether the file at the normalized absolute `path` may be served. Besides
  /// `fs_allow`, the `node_modules` directories bare imports resolve into are
  /// allowed.
  pub fn is_fs_allowed(&self, path: &Path) -> bool {
    self.fs_allow.iter().any(|dir| path.starts_with(dir))
      || self.root.ancestors().any(|dir| path.starts_with(dir.join("node_modules")))
  }
}
