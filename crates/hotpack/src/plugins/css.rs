use std::borrow::Cow;

use hotpack_common::HMR_CLIENT_PATH;
use hotpack_plugin::{
  HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin, PluginContext,
};
use hotpack_utils::url::{has_query_param, is_css_request};

/// Turns stylesheets imported from JS into modules.
///
/// A plain import injects a `<style>` tag through the HMR client and accepts
/// its own updates. `?inline` exports the CSS text instead.
pub struct CssPlugin;

#[async_trait::async_trait]
impl Plugin for CssPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("hotpack:css")
  }

  fn hook_usage(&self) -> HookUsage {
    HookUsage::TRANSFORM
  }

  async fn transform(&self, _ctx: &PluginContext, args: &HookTransformArgs<'_>) -> HookTransformReturn {
    if !is_css_request(args.id) {
      return Ok(None);
    }

    let css = serde_json::to_string(args.code)?;
    if has_query_param(args.id, "inline") {
      return Ok(Some(HookTransformOutput { code: format!("export default {css};\n"), map: None }));
    }

    let style_id = serde_json::to_string(args.id)?;
    let code = format!(
      "import {{ updateStyle, removeStyle }} from \"{HMR_CLIENT_PATH}\";\n\
       const __hotpack_id = {style_id};\n\
       const __hotpack_css = {css};\n\
       updateStyle(__hotpack_id, __hotpack_css);\n\
       import.meta.hot.accept();\n\
       import.meta.hot.prune(() => removeStyle(__hotpack_id));\n\
       export default __hotpack_css;\n"
    );
    Ok(Some(HookTransformOutput { code, map: None }))
  }
}
