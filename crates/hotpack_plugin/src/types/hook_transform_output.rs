use hotpack_sourcemap::SourceMap;

#[derive(Debug, Default)]
pub struct HookTransformOutput {
  pub code: String,
  /// Maps `code` back to the input of this transform. Leaving it out while
  /// changing the code makes the final source map unavailable.
  pub map: Option<SourceMap>,
}
