use futures::future::try_join_all;
use hotpack_common::{HmrPayload, ModuleUrl, ResolvedId, TransformResult, HMR_CLIENT_PATH, VIRTUAL_PREFIX};
use hotpack_ecmascript::{rewrite_imports, ImportAnalyzer, ImportRecord, RewriteReturn};
use hotpack_error::{BuildError, BuildResult};
use hotpack_plugin::HookTransformOutput;
use hotpack_sourcemap::collapse_sourcemaps;
use hotpack_utils::{
  indexmap::FxIndexSet,
  url::{inject_query, is_external_url, is_js_request},
};

use crate::{context::DevContext, plugins::id_to_url, utils::load_source::load_source};

/// resolve -> load -> transform -> analyze imports -> rewrite -> update the graph.
pub async fn compile_module(ctx: &DevContext, url: &ModuleUrl) -> BuildResult<TransformResult> {
  let resolved = match ctx.plugin_driver.resolve_id(url, None).await? {
    Some(resolved) if !resolved.is_external => resolved,
    _ => return Err(BuildError::not_found(url)),
  };
  ctx.graph.update_resolved(url, &resolved);

  let (code, map) = match ctx.plugin_driver.load(&resolved.id).await? {
    Some(loaded) => (loaded.code, loaded.map),
    None => (load_source(ctx.fs.as_ref(), &resolved)?, None),
  };

  let HookTransformOutput { code, map } =
    ctx.plugin_driver.transform(&resolved.id, code, map).await?;

  let id = resolved.id.to_string();
  let (code, analysis) = tokio::task::spawn_blocking(move || {
    ImportAnalyzer::analyze(&code, &id).map(|analysis| (code, analysis))
  })
  .await
  .map_err(anyhow::Error::from)??;

  let imports = try_join_all(
    analysis.imports.iter().map(|record| resolve_import(ctx, record, &resolved, url)),
  )
  .await?;
  let accepted_deps = try_join_all(
    analysis.accepted_deps.iter().map(|record| resolve_import(ctx, record, &resolved, url)),
  )
  .await?;

  let mut rewrites = Vec::with_capacity(imports.len() + accepted_deps.len());
  let mut imported = FxIndexSet::default();
  for (record, dep_url) in analysis.imports.iter().zip(imports) {
    let Some(dep_url) = dep_url else {
      continue;
    };
    let (start, end) = record.inner_span();
    rewrites.push((start, end, served_url(ctx, &dep_url)));
    imported.insert(dep_url);
  }

  // The client matches accepted deps against the canonical urls of updates.
  let mut accepted = FxIndexSet::default();
  for (record, dep_url) in analysis.accepted_deps.iter().zip(accepted_deps) {
    let Some(dep_url) = dep_url else {
      continue;
    };
    let (start, end) = record.inner_span();
    rewrites.push((start, end, dep_url.to_string()));
    accepted.insert(dep_url);
  }

  let header = if analysis.has_hot {
    let url_literal = serde_json::to_string(url.as_str()).map_err(anyhow::Error::from)?;
    Some(format!(
      "import {{ createHotContext as __hotpack__createHotContext }} from \"{HMR_CLIENT_PATH}\";\
       import.meta.hot = __hotpack__createHotContext({url_literal});\n"
    ))
  } else {
    None
  };
  let RewriteReturn { code, map: rewrite_map } =
    rewrite_imports(&code, &resolved.id, header.as_deref(), &rewrites)?;
  // The rewrite map only describes the served code if the transforms kept
  // their maps.
  let map = match (map, rewrite_map) {
    (Some(map), Some(rewrite_map)) => collapse_sourcemaps(&[map, rewrite_map]),
    (map, _) => map,
  };

  let no_longer_imported =
    ctx.graph.update_module_info(url, &imported, &accepted, analysis.is_self_accepting);
  if !no_longer_imported.is_empty() {
    let pruned = ctx.graph.prune_unreachable();
    if !pruned.is_empty() {
      tracing::info!("pruned {} module(s) no longer imported by {url}", pruned.len());
      ctx.broadcast(&HmrPayload::Prune { paths: pruned.iter().map(ToString::to_string).collect() });
    }
  }

  Ok(TransformResult::new(code, map, imported.into_iter().collect()))
}

/// Resolves one specifier found in `importer` to the canonical url of the
/// imported module. External imports and the HMR client stay as they are.
async fn resolve_import(
  ctx: &DevContext,
  record: &ImportRecord,
  importer: &ResolvedId,
  importer_url: &ModuleUrl,
) -> BuildResult<Option<ModuleUrl>> {
  let specifier = record.specifier.as_str();
  if is_external_url(specifier) || specifier.starts_with(VIRTUAL_PREFIX) {
    return Ok(None);
  }

  let Some(resolved) = ctx.plugin_driver.resolve_id(specifier, Some(importer.id.as_str())).await? else {
    return Err(BuildError::unresolved_import(specifier, importer_url));
  };
  if resolved.is_external {
    return Ok(None);
  }

  let dep_url = ModuleUrl::canonicalize(&id_to_url(&resolved.id, &ctx.options.root));
  ctx.graph.update_resolved(&dep_url, &resolved);
  Ok(Some(dep_url))
}

/// The url written into the importing module. Non-JS modules are marked with
/// `?import` so the server compiles them, and modules touched by HMR carry
/// their timestamp so the browser refetches them.
fn served_url(ctx: &DevContext, dep_url: &ModuleUrl) -> String {
  let mut served = dep_url.to_string();
  if !is_js_request(&served) {
    served = inject_query(&served, "import");
  }
  let last_hmr_timestamp =
    ctx.graph.get_module_by_url(dep_url).map_or(0, |module| module.last_hmr_timestamp);
  if last_hmr_timestamp > 0 {
    served = inject_query(&served, &format!("t={last_hmr_timestamp}"));
  }
  served
}
