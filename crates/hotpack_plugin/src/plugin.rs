use std::{borrow::Cow, sync::Arc};

use hotpack_common::ModuleUrl;
use hotpack_utils::pretty_type_name::pretty_type_name;

use crate::{
  HookLoadArgs, HookLoadOutput, HookResolveIdArgs, HookResolveIdOutput, HookTransformArgs,
  HookTransformOutput, HookUsage, HotUpdateContext, PluginContext, PluginOrder,
};

pub type HookResolveIdReturn = anyhow::Result<Option<HookResolveIdOutput>>;
pub type HookLoadReturn = anyhow::Result<Option<HookLoadOutput>>;
pub type HookTransformReturn = anyhow::Result<Option<HookTransformOutput>>;
/// `Some` replaces the modules to update, an empty list swallows the change.
pub type HookHotUpdateReturn = anyhow::Result<Option<Vec<ModuleUrl>>>;

#[async_trait::async_trait]
pub trait Plugin: Send + Sync + 'static {
  fn name(&self) -> Cow<'static, str> {
    pretty_type_name::<Self>()
  }

  fn order(&self) -> PluginOrder {
    PluginOrder::Normal
  }

  /// Hooks left out here are never called, even if implemented.
  fn hook_usage(&self) -> HookUsage {
    HookUsage::all()
  }

  async fn resolve_id(
    &self,
    _ctx: &PluginContext,
    _args: &HookResolveIdArgs<'_>,
  ) -> HookResolveIdReturn {
    Ok(None)
  }

  async fn load(&self, _ctx: &PluginContext, _args: &HookLoadArgs<'_>) -> HookLoadReturn {
    Ok(None)
  }

  async fn transform(
    &self,
    _ctx: &PluginContext,
    _args: &HookTransformArgs<'_>,
  ) -> HookTransformReturn {
    Ok(None)
  }

  async fn handle_hot_update(
    &self,
    _ctx: &PluginContext,
    _hot: &HotUpdateContext,
  ) -> HookHotUpdateReturn {
    Ok(None)
  }
}

pub type SharedPlugin = Arc<dyn Plugin>;
