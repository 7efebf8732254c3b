use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use hotpack_utils::url::clean_url;

/// The outcome of running `resolve_id` on a specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
  /// An absolute file path, optionally with a query suffix, or a virtual id
  /// such as `\0virtual:env`.
  pub id: ArcStr,
  pub is_external: bool,
}

impl ResolvedId {
  pub fn new(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: false }
  }

  pub fn external(id: impl Into<ArcStr>) -> Self {
    Self { id: id.into(), is_external: true }
  }

  /// The file on disk backing this id, `None` for virtual and external modules.
  pub fn file(&self) -> Option<PathBuf> {
    if self.is_external || self.id.starts_with('\0') {
      return None;
    }
    let path = Path::new(clean_url(&self.id));
    path.is_absolute().then(|| path.to_path_buf())
  }
}

#[test]
fn file_strips_query() {
  assert_eq!(
    ResolvedId::new("/project/src/a.css?inline").file(),
    Some(PathBuf::from("/project/src/a.css"))
  );
  assert_eq!(ResolvedId::new("\0virtual:env").file(), None);
  assert_eq!(ResolvedId::external("https://esm.sh/vue").file(), None);
}
