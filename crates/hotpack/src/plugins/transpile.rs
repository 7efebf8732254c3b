use std::borrow::Cow;

use hotpack_ecmascript::EcmaCompiler;
use hotpack_plugin::{
  HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage, Plugin, PluginContext,
};

/// Lowers TypeScript and JSX to plain JavaScript so the browser can run it.
pub struct TranspilePlugin;

#[async_trait::async_trait]
impl Plugin for TranspilePlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("hotpack:transpile")
  }

  fn hook_usage(&self) -> HookUsage {
    HookUsage::TRANSFORM
  }

  async fn transform(&self, _ctx: &PluginContext, args: &HookTransformArgs<'_>) -> HookTransformReturn {
    if !EcmaCompiler::needs_transpile(args.id) {
      return Ok(None);
    }
    let id = args.id.to_string();
    let code = args.code.to_string();
    let ret = tokio::task::spawn_blocking(move || EcmaCompiler::transpile(&code, &id)).await??;
    Ok(Some(HookTransformOutput { code: ret.code, map: ret.map }))
  }
}

#[cfg(test)]
mod tests {
  use std::{path::PathBuf, sync::Arc};

  use hotpack_error::{BuildError, BuildErrorKind};
  use hotpack_fs::MemoryFileSystem;

  use super::*;

  fn ctx() -> PluginContext {
    PluginContext::new(PathBuf::from("/project"), Arc::new(MemoryFileSystem::default()))
  }

  #[tokio::test]
  async fn transpiles_typescript_only() {
    let args = HookTransformArgs { id: "/project/src/main.ts", code: "export const a: number = 1;\n" };
    let output = TranspilePlugin.transform(&ctx(), &args).await.unwrap().unwrap();
    assert!(output.code.contains("export const a = 1;"));

    let args = HookTransformArgs { id: "/project/src/main.js", code: "export const a = 1;\n" };
    assert!(TranspilePlugin.transform(&ctx(), &args).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn syntax_errors_keep_their_kind() {
    let args = HookTransformArgs { id: "/project/src/main.ts", code: "const = ;" };
    let err = TranspilePlugin.transform(&ctx(), &args).await.unwrap_err();
    assert_eq!(err.downcast::<BuildError>().unwrap().kind, BuildErrorKind::Parse);
  }
}
