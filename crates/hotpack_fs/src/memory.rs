use std::{
  io::{self, Read, Write},
  path::{Component, Path},
};

use vfs::{MemoryFS, VfsPath};

use crate::FileSystem;

/// An in-memory file system addressed with ordinary absolute paths.
pub struct MemoryFileSystem {
  root: VfsPath,
}

impl Default for MemoryFileSystem {
  fn default() -> Self {
    Self { root: MemoryFS::new().into() }
  }
}

impl MemoryFileSystem {
  pub fn new(files: &[(&str, &str)]) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(Path::new(path), content);
    }
    fs
  }

  /// Creates or overwrites `path`, creating missing parent directories.
  pub fn add_file(&self, path: &Path, content: &str) {
    let file = self.vfs_path(path).expect("invalid path for memory fs");
    file.parent().create_dir_all().expect("failed to create parent dirs in memory fs");
    let mut writer = file.create_file().expect("failed to create file in memory fs");
    writer.write_all(content.as_bytes()).expect("failed to write file in memory fs");
  }

  pub fn remove_file(&self, path: &Path) {
    if let Ok(file) = self.vfs_path(path) {
      let _ = file.remove_file();
    }
  }

  fn vfs_path(&self, path: &Path) -> io::Result<VfsPath> {
    let segments = path
      .components()
      .filter_map(|component| match component {
        Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
        _ => None,
      })
      .collect::<Vec<_>>();
    self.root.join(segments.join("/")).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
  }
}

impl FileSystem for MemoryFileSystem {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    let file = self.vfs_path(path)?;
    if !file.is_file().unwrap_or(false) {
      return Err(io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display())));
    }
    let mut reader = file.open_file().map_err(io::Error::other)?;
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.vfs_path(path).is_ok_and(|file| file.is_file().unwrap_or(false))
  }
}

#[test]
fn test_memory_fs() {
  let fs = MemoryFileSystem::new(&[("/project/src/main.ts", "import './util'")]);
  assert!(fs.is_file(Path::new("/project/src/main.ts")));
  assert!(!fs.is_file(Path::new("/project/src")));
  assert_eq!(fs.read_to_string(Path::new("/project/src/main.ts")).unwrap(), "import './util'");

  fs.add_file(Path::new("/project/src/main.ts"), "export {}");
  assert_eq!(fs.read_to_string(Path::new("/project/src/main.ts")).unwrap(), "export {}");

  fs.remove_file(Path::new("/project/src/main.ts"));
  let err = fs.read(Path::new("/project/src/main.ts")).unwrap_err();
  assert_eq!(err.kind(), io::ErrorKind::NotFound);
}
