use arcstr::ArcStr;
use hotpack_sourcemap::{inline_sourcemap_comment, SourceMap};
use hotpack_utils::xxhash::etag;

use crate::ModuleUrl;

/// The compiled output of a module, shared by every request served from cache.
#[derive(Debug)]
pub struct TransformResult {
  pub code: ArcStr,
  pub map: Option<SourceMap>,
  /// Canonical urls of the modules this output imports.
  pub deps: Vec<ModuleUrl>,
  pub etag: String,
}

impl TransformResult {
  pub fn new(code: impl Into<ArcStr>, map: Option<SourceMap>, deps: Vec<ModuleUrl>) -> Self {
    let code = code.into();
    let etag = etag(&code);
    Self { code, map, deps, etag }
  }

  /// The code served to the browser, with the source map inlined if present.
  pub fn code_with_sourcemap(&self) -> String {
    match &self.map {
      Some(map) => format!("{}{}", self.code, inline_sourcemap_comment(map)),
      None => self.code.to_string(),
    }
  }
}
