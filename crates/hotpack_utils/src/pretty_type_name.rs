use std::borrow::Cow;

use regex::Regex;
use std::sync::LazyLock;

static MODULE_MATCHER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\w+::)").unwrap());

/// `hotpack::plugins::CssPlugin` -> `CssPlugin`. Used as the default plugin name.
pub fn pretty_type_name<T: ?Sized>() -> Cow<'static, str> {
  let type_name = std::any::type_name::<T>();
  MODULE_MATCHER_RE.replace_all(type_name, "")
}

#[test]
fn test_pretty_type_name() {
  struct ReactRefresh;
  assert_eq!(pretty_type_name::<ReactRefresh>(), "ReactRefresh");
  assert_eq!(pretty_type_name::<std::sync::Arc<ReactRefresh>>(), "Arc<ReactRefresh>");
}
