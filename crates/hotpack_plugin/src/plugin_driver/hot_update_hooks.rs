use hotpack_common::ModuleUrl;
use hotpack_error::BuildResult;

use super::hook_error;
use crate::{HotUpdateContext, PluginDriver};

impl PluginDriver {
  /// Runs `handle_hot_update` hooks in order. Returns `None` when every plugin
  /// declined, otherwise the final module list, which may be empty.
  pub async fn handle_hot_update(
    &self,
    hot: &mut HotUpdateContext,
  ) -> BuildResult<Option<Vec<ModuleUrl>>> {
    let mut replaced = false;
    for plugin in self.iter_plugins_by(&self.order_by_handle_hot_update) {
      let modules = plugin
        .handle_hot_update(&self.ctx, hot)
        .await
        .map_err(|err| hook_error(plugin, "handleHotUpdate", &hot.file.to_string_lossy(), err))?;
      if let Some(modules) = modules {
        replaced = true;
        hot.modules = modules;
        if hot.modules.is_empty() {
          break;
        }
      }
    }
    Ok(replaced.then(|| hot.modules.clone()))
  }
}
