use hotpack_sourcemap::SourceMap;

#[derive(Debug, Default)]
pub struct HookLoadOutput {
  pub code: String,
  pub map: Option<SourceMap>,
}
