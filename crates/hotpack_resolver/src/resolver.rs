use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use itertools::Itertools;
use oxc_resolver::{ResolveError, ResolveOptions as OxcResolverOptions, Resolver as OxcResolver};

/// Resolves bare specifiers (`vue`, `lodash-es/debounce`) the way a browser
/// build expects: `import`/`browser` conditions and the `browser` field win.
pub struct Resolver {
  cwd: PathBuf,
  inner: OxcResolver,
}

impl Resolver {
  pub fn new(cwd: PathBuf, extra_conditions: &[String]) -> Self {
    let condition_names = ["import", "module", "browser", "default"]
      .into_iter()
      .map(String::from)
      .chain(extra_conditions.iter().cloned())
      .unique()
      .collect::<Vec<_>>();

    let options = OxcResolverOptions {
      condition_names,
      main_fields: vec!["browser".to_string(), "module".to_string(), "main".to_string()],
      alias_fields: vec![vec!["browser".to_string()]],
      extensions: [".mjs", ".js", ".mts", ".ts", ".jsx", ".tsx", ".json"]
        .into_iter()
        .map(String::from)
        .collect(),
      ..Default::default()
    };

    Self { cwd, inner: OxcResolver::new(options) }
  }

  pub fn cwd(&self) -> &PathBuf {
    &self.cwd
  }
}

#[derive(Debug)]
pub struct ResolveReturn {
  pub path: ArcStr,
}

impl Resolver {
  /// `importer` is the file path of the importing module, if any.
  pub fn resolve(
    &self,
    importer: Option<&Path>,
    specifier: &str,
  ) -> Result<ResolveReturn, ResolveError> {
    let dir = importer
      .and_then(|importer| importer.parent())
      .filter(|inner| inner.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    let resolution = self.inner.resolve(dir, specifier)?;
    let path = resolution.full_path().to_string_lossy().into_owned().into();
    Ok(ResolveReturn { path })
  }
}
