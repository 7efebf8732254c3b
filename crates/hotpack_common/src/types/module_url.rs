use std::{borrow::Borrow, fmt};

use arcstr::ArcStr;
use hotpack_utils::url::canonicalize_url;

/// `ModuleUrl` is the identity key of a module in the dev server's graph.
/// - It is the request url with the hash and cache-busting query parameters removed.
/// - Other query parameters are kept, so `/a.css` and `/a.css?inline` are two modules.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleUrl(ArcStr);

impl ModuleUrl {
  /// Wraps an url that is already canonical.
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn canonicalize(raw: &str) -> Self {
    Self(canonicalize_url(raw).into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }
}

impl std::ops::Deref for ModuleUrl {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleUrl {
  fn as_ref(&self) -> &str {
    self
  }
}

impl Borrow<str> for ModuleUrl {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<ArcStr> for ModuleUrl {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleUrl {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl fmt::Display for ModuleUrl {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[test]
fn canonical_urls_compare_equal() {
  assert_eq!(ModuleUrl::canonicalize("/main.ts?t=1"), ModuleUrl::canonicalize("/main.ts"));
  assert_ne!(ModuleUrl::canonicalize("/a.css?inline"), ModuleUrl::canonicalize("/a.css?import"));
}
