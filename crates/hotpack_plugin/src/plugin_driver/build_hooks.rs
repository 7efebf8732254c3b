use hotpack_common::ResolvedId;
use hotpack_error::BuildResult;
use hotpack_sourcemap::collapse_sourcemaps;

use super::hook_error;
use crate::{
  HookLoadArgs, HookLoadOutput, HookResolveIdArgs, HookTransformArgs, HookTransformOutput,
  PluginDriver,
};

impl PluginDriver {
  /// First non-null: the first plugin returning an id wins.
  pub async fn resolve_id(
    &self,
    specifier: &str,
    importer: Option<&str>,
  ) -> BuildResult<Option<ResolvedId>> {
    let args = HookResolveIdArgs { importer, specifier };
    for plugin in self.iter_plugins_by(&self.order_by_resolve_id) {
      let output = plugin
        .resolve_id(&self.ctx, &args)
        .await
        .map_err(|err| hook_error(plugin, "resolveId", importer.unwrap_or(specifier), err))?;
      if let Some(output) = output {
        return Ok(Some(ResolvedId { id: output.id, is_external: output.external }));
      }
    }
    Ok(None)
  }

  /// First non-null: the first plugin returning source wins.
  pub async fn load(&self, id: &str) -> BuildResult<Option<HookLoadOutput>> {
    let args = HookLoadArgs { id };
    for plugin in self.iter_plugins_by(&self.order_by_load) {
      let output = plugin
        .load(&self.ctx, &args)
        .await
        .map_err(|err| hook_error(plugin, "load", id, err))?;
      if output.is_some() {
        return Ok(output);
      }
    }
    Ok(None)
  }

  /// Waterfall: every plugin receives the output of the previous one. The
  /// source maps of all steps are composed into one, as long as no step
  /// changed the code without providing a map.
  pub async fn transform(
    &self,
    id: &str,
    code: String,
    map: Option<hotpack_sourcemap::SourceMap>,
  ) -> BuildResult<HookTransformOutput> {
    let mut code = code;
    let mut chain = map.into_iter().collect::<Vec<_>>();
    let mut chain_broken = false;

    for plugin in self.iter_plugins_by(&self.order_by_transform) {
      let args = HookTransformArgs { id, code: &code };
      let output = plugin
        .transform(&self.ctx, &args)
        .await
        .map_err(|err| hook_error(plugin, "transform", id, err))?;
      let Some(output) = output else {
        continue;
      };

      match output.map {
        Some(map) => chain.push(map),
        None if output.code != code => {
          if !chain_broken && !chain.is_empty() {
            tracing::warn!(
              "[plugin {}] transformed {id} without a source map, its source map is dropped",
              plugin.name()
            );
          }
          chain_broken = true;
        }
        None => {}
      }
      code = output.code;
    }

    let map = if chain_broken { None } else { collapse_sourcemaps(&chain) };
    Ok(HookTransformOutput { code, map })
  }
}
