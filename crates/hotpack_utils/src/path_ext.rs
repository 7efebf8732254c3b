use std::path::Path;

use sugar_path::SugarPath;

pub const FS_PREFIX: &str = "/@fs/";

pub trait PathExt {
  fn expect_to_str(&self) -> &str;

  fn expect_to_slash(&self) -> String;

  /// The url under which the dev server serves this file.
  ///
  /// Files inside `root` are served root-relative, everything else through the
  /// [FS_PREFIX] escape hatch.
  fn to_module_url(&self, root: &Path) -> String;
}

impl PathExt for Path {
  fn expect_to_str(&self) -> &str {
    self.to_str().unwrap_or_else(|| {
      panic!("Failed to convert {:?} to valid utf8 str", self.display());
    })
  }

  fn expect_to_slash(&self) -> String {
    self
      .to_slash()
      .unwrap_or_else(|| panic!("Failed to convert {:?} to slash str", self.display()))
      .into_owned()
  }

  fn to_module_url(&self, root: &Path) -> String {
    match self.strip_prefix(root) {
      Ok(relative) => format!("/{}", relative.expect_to_slash()),
      Err(_) => {
        let absolute = self.expect_to_slash();
        format!("{FS_PREFIX}{}", absolute.trim_start_matches('/'))
      }
    }
  }
}

#[test]
fn test_to_module_url() {
  let root = Path::new("/project");
  assert_eq!(Path::new("/project/src/main.ts").to_module_url(root), "/src/main.ts");
  assert_eq!(
    Path::new("/elsewhere/lib/index.js").to_module_url(root),
    "/@fs/elsewhere/lib/index.js"
  );
}
