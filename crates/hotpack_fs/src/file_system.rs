use std::{io, path::Path, sync::Arc};

/// The file system the dev server reads module sources from.
///
/// Implementations must be cheap to call from many tasks at once; the dev server
/// never writes through this trait.
pub trait FileSystem: Send + Sync + 'static {
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let bytes = self.read(path)?;
    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
  }

  fn is_file(&self, path: &Path) -> bool;
}

pub type SharedFileSystem = Arc<dyn FileSystem>;
