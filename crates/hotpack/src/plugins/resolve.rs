use std::{
  borrow::Cow,
  path::{Path, PathBuf},
};

use hotpack_plugin::{
  HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};
use hotpack_utils::{
  path_ext::{PathExt, FS_PREFIX},
  url::{clean_url, is_external_url, split_query},
};
use sugar_path::SugarPath;

use crate::types::{SharedOptions, SharedResolver};

/// Prefix of urls that carry a virtual id, e.g. `/@id/__x00__virtual:env`.
pub const ID_PREFIX: &str = "/@id/";
/// `\0` can not appear in an url.
pub const NULL_BYTE_PLACEHOLDER: &str = "__x00__";

const PROBE_EXTENSIONS: [&str; 6] = [".ts", ".tsx", ".js", ".jsx", ".mjs", ".json"];

/// Resolves urls requested by the browser and specifiers found in modules to
/// absolute file paths. The query of the specifier is kept on the id.
///
/// Absolute paths, either `/@fs/` urls or paths outside the root, only resolve
/// into the allowed directories.
pub struct ResolvePlugin {
  options: SharedOptions,
  resolver: SharedResolver,
}

impl ResolvePlugin {
  pub fn new(options: SharedOptions, resolver: SharedResolver) -> Self {
    Self { options, resolver }
  }

  fn probe_allowed(&self, ctx: &PluginContext, path: &Path) -> Option<PathBuf> {
    let path = path.normalize();
    if !self.options.is_fs_allowed(&path) {
      tracing::debug!("{} is outside the allowed directories", path.display());
      return None;
    }
    Self::probe(ctx, &path)
  }

  fn probe(ctx: &PluginContext, path: &Path) -> Option<PathBuf> {
    let fs = ctx.fs();
    if fs.is_file(path) {
      return Some(path.to_path_buf());
    }
    let path_str = path.to_string_lossy();
    PROBE_EXTENSIONS
      .iter()
      .map(|ext| PathBuf::from(format!("{path_str}{ext}")))
      .chain(PROBE_EXTENSIONS.iter().map(|ext| path.join(format!("index{ext}"))))
      .find(|candidate| fs.is_file(candidate))
  }

  fn resolve_path(&self, ctx: &PluginContext, specifier: &str, importer: Option<&str>) -> Option<PathBuf> {
    if let Some(absolute) = specifier.strip_prefix(FS_PREFIX) {
      return self.probe_allowed(ctx, &Path::new("/").join(absolute));
    }

    if specifier.starts_with('/') {
      let in_root = ctx.root().join(specifier.trim_start_matches('/')).normalize();
      if in_root.starts_with(ctx.root()) {
        if let Some(file) = Self::probe(ctx, &in_root) {
          return Some(file);
        }
      }
      return self.probe_allowed(ctx, Path::new(specifier));
    }

    let importer_file = importer.map(clean_url).map(Path::new).filter(|file| file.is_absolute());

    if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." {
      let base = importer_file.and_then(Path::parent).unwrap_or(ctx.root());
      return Self::probe(ctx, &base.join(specifier).normalize());
    }

    match self.resolver.resolve(importer_file, specifier) {
      Ok(resolved) => Some(PathBuf::from(resolved.path.as_str())),
      Err(err) => {
        tracing::debug!("failed to resolve package {specifier}: {err}");
        None
      }
    }
  }
}

#[async_trait::async_trait]
impl Plugin for ResolvePlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("hotpack:resolve")
  }

  fn hook_usage(&self) -> HookUsage {
    HookUsage::RESOLVE_ID
  }

  async fn resolve_id(&self, ctx: &PluginContext, args: &HookResolveIdArgs<'_>) -> HookResolveIdReturn {
    let specifier = args.specifier;
    if is_external_url(specifier) {
      return Ok(Some(HookResolveIdOutput { id: specifier.into(), external: true }));
    }

    let (path, query) = split_query(specifier);
    if let Some(virtual_id) = path.strip_prefix(ID_PREFIX) {
      let id = virtual_id.replacen(NULL_BYTE_PLACEHOLDER, "\0", 1);
      return Ok(Some(HookResolveIdOutput { id: id.into(), external: false }));
    }

    let Some(file) = self.resolve_path(ctx, path, args.importer) else {
      return Ok(None);
    };
    let file = file.expect_to_slash();
    let id = match query {
      Some(query) => format!("{file}?{query}"),
      None => file,
    };
    Ok(Some(HookResolveIdOutput { id: id.into(), external: false }))
  }
}

/// The url the browser uses for a resolved id.
pub fn id_to_url(id: &str, root: &Path) -> String {
  if let Some(virtual_id) = id.strip_prefix('\0') {
    return format!("{ID_PREFIX}{NULL_BYTE_PLACEHOLDER}{virtual_id}");
  }
  let (path, query) = split_query(id);
  let url = Path::new(path).to_module_url(root);
  match query {
    Some(query) => format!("{url}?{query}"),
    None => url,
  }
}
