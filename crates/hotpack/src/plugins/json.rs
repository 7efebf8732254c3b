use std::borrow::Cow;

use hotpack_error::BuildError;
use hotpack_plugin::{
  HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin, PluginContext,
};
use hotpack_utils::{code_frame::code_frame, url::is_json_request};

/// `.json` modules become `export default <json>`.
pub struct JsonPlugin;

#[async_trait::async_trait]
impl Plugin for JsonPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("hotpack:json")
  }

  fn hook_usage(&self) -> HookUsage {
    HookUsage::TRANSFORM
  }

  async fn transform(&self, _ctx: &PluginContext, args: &HookTransformArgs<'_>) -> HookTransformReturn {
    if !is_json_request(args.id) {
      return Ok(None);
    }

    if let Err(err) = serde_json::from_str::<serde_json::Value>(args.code) {
      let offset = args
        .code
        .split_inclusive('\n')
        .take(err.line().saturating_sub(1))
        .map(str::len)
        .sum::<usize>()
        + err.column().saturating_sub(1);
      let error = BuildError::parse(args.id, format!("Failed to parse JSON file: {err}"))
        .with_frame(code_frame(args.code, offset));
      return Err(error.into());
    }

    Ok(Some(HookTransformOutput { code: format!("export default {};\n", args.code.trim()), map: None }))
  }
}
