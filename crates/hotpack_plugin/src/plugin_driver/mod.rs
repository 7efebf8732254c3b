mod build_hooks;
mod hot_update_hooks;

use std::sync::Arc;

use hotpack_error::BuildError;

use crate::{HookUsage, PluginContext, SharedPlugin};

pub type SharedPluginDriver = Arc<PluginDriver>;

/// Runs an ordered list of plugins through the build and hot update hooks.
pub struct PluginDriver {
  plugins: Vec<SharedPlugin>,
  ctx: PluginContext,
  order_by_resolve_id: Vec<usize>,
  order_by_load: Vec<usize>,
  order_by_transform: Vec<usize>,
  order_by_handle_hot_update: Vec<usize>,
}

impl PluginDriver {
  /// Plugins are sorted by [crate::PluginOrder]; the sort is stable, so
  /// declaration order is kept inside each group.
  pub fn new_shared(mut plugins: Vec<SharedPlugin>, ctx: PluginContext) -> SharedPluginDriver {
    plugins.sort_by_key(|plugin| plugin.order());

    let order_by = |usage: HookUsage| {
      plugins
        .iter()
        .enumerate()
        .filter(|(_, plugin)| plugin.hook_usage().contains(usage))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>()
    };

    let order_by_resolve_id = order_by(HookUsage::RESOLVE_ID);
    let order_by_load = order_by(HookUsage::LOAD);
    let order_by_transform = order_by(HookUsage::TRANSFORM);
    let order_by_handle_hot_update = order_by(HookUsage::HANDLE_HOT_UPDATE);

    Arc::new(Self {
      plugins,
      ctx,
      order_by_resolve_id,
      order_by_load,
      order_by_transform,
      order_by_handle_hot_update,
    })
  }

  pub fn ctx(&self) -> &PluginContext {
    &self.ctx
  }

  pub fn plugin_names(&self) -> Vec<String> {
    self.plugins.iter().map(|plugin| plugin.name().into_owned()).collect()
  }

  pub fn has_hot_update_hooks(&self) -> bool {
    !self.order_by_handle_hot_update.is_empty()
  }

  fn iter_plugins_by<'a>(&'a self, order: &'a [usize]) -> impl Iterator<Item = &'a SharedPlugin> {
    order.iter().map(|&idx| &self.plugins[idx])
  }
}

/// A plugin may bail with a [BuildError] of its own to keep its kind and
/// frame; anything else becomes a plain plugin error.
fn hook_error(plugin: &SharedPlugin, hook: &str, id: &str, err: anyhow::Error) -> BuildError {
  match err.downcast::<BuildError>() {
    Ok(mut build_error) => {
      build_error.plugin.get_or_insert_with(|| plugin.name().into_owned());
      build_error.hook.get_or_insert_with(|| hook.to_string());
      build_error.id.get_or_insert_with(|| id.to_string());
      build_error
    }
    Err(err) => BuildError::plugin(&plugin.name(), hook, id, &err),
  }
}
