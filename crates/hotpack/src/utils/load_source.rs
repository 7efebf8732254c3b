use std::io;

use hotpack_common::ResolvedId;
use hotpack_error::{BuildError, BuildResult};
use hotpack_fs::FileSystem;

/// Reads a module from disk when no plugin loaded it.
pub fn load_source(fs: &dyn FileSystem, resolved_id: &ResolvedId) -> BuildResult<String> {
  let Some(file) = resolved_id.file() else {
    return Err(BuildError::not_found(&resolved_id.id));
  };
  fs.read_to_string(&file).map_err(|err| match err.kind() {
    io::ErrorKind::NotFound => BuildError::not_found(&resolved_id.id),
    _ => BuildError::load_failed(&resolved_id.id, err),
  })
}

#[test]
fn test_load_source() {
  use hotpack_error::BuildErrorKind;

  let fs = hotpack_fs::MemoryFileSystem::new(&[("/project/a.css", "a {}")]);
  assert_eq!(load_source(&fs, &ResolvedId::new("/project/a.css?inline")).unwrap(), "a {}");
  let err = load_source(&fs, &ResolvedId::new("/project/b.css")).unwrap_err();
  assert_eq!(err.kind, BuildErrorKind::NotFound);
  let err = load_source(&fs, &ResolvedId::new("\0virtual")).unwrap_err();
  assert_eq!(err.kind, BuildErrorKind::NotFound);
}
