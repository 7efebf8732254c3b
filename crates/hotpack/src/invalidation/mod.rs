mod debouncer;

use std::sync::Arc;

use hotpack_common::{FsEvent, FsEventKind, HmrPayload, ModuleUrl};
use hotpack_plugin::HotUpdateContext;
use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::{context::SharedDevContext, hmr::update_payload, module_graph::InvalidationResult};

use debouncer::Debouncer;

pub type SharedInvalidationBridge = Arc<InvalidationBridge>;

/// Turns file system events into graph invalidations and HMR messages.
///
/// Nothing is recompiled here. Invalidated modules are compiled again when
/// the browser asks for them.
pub struct InvalidationBridge {
  ctx: SharedDevContext,
  debouncer: Debouncer,
}

impl InvalidationBridge {
  pub fn new_shared(ctx: SharedDevContext) -> SharedInvalidationBridge {
    Arc::new(Self { ctx, debouncer: Debouncer::default() })
  }

  /// Records `event` and schedules its change cycle after the debounce
  /// window. Returns immediately.
  pub fn on_fs_event(self: &Arc<Self>, event: FsEvent) {
    let generation = self.debouncer.record(&event.path);
    let bridge = Arc::clone(self);
    tokio::spawn(async move {
      tokio::time::sleep(bridge.ctx.options.debounce).await;
      if bridge.debouncer.take_if_latest(&event.path, generation) {
        bridge.handle_file_change(&event).await;
      }
    });
  }

  /// Runs one change cycle for `event` right away and returns the message
  /// broadcast for it, if any.
  pub async fn handle_file_change(&self, event: &FsEvent) -> Option<HmrPayload> {
    let graph = &self.ctx.graph;
    let timestamp = self.ctx.clock.now();
    let file = event.path.display();

    if self.ctx.options.is_config_file(&event.path) {
      tracing::info!("{file} changed, reloading the page");
      graph.invalidate_all(timestamp);
      return Some(self.send(HmrPayload::full_reload()));
    }

    let modules = graph.get_modules_by_file(&event.path);
    if event.kind == FsEventKind::Add && modules.is_empty() {
      return self.recover_errored_modules(timestamp);
    }
    if modules.is_empty() {
      tracing::debug!("{file} is not part of the module graph");
      return None;
    }

    let mut modules = modules.into_iter().collect::<Vec<_>>();
    if self.ctx.plugin_driver.has_hot_update_hooks() {
      let mut hot = HotUpdateContext::new(
        event.path.clone(),
        event.kind,
        timestamp,
        modules,
        Arc::clone(&self.ctx.fs),
      );
      let outcome = self.ctx.plugin_driver.handle_hot_update(&mut hot).await;
      modules = match outcome {
        Ok(Some(modules)) if modules.is_empty() => {
          tracing::debug!("{file} was handled by a plugin");
          return None;
        }
        Ok(Some(modules)) => modules,
        Ok(None) => hot.modules,
        Err(err) => {
          tracing::error!("handleHotUpdate failed for {file}: {err}");
          return Some(self.send(HmrPayload::Error { err: err.to_error_payload() }));
        }
      };
    }

    let result = self.invalidate(&modules, timestamp);
    let payload = update_payload(&result, timestamp)?;
    match &payload {
      HmrPayload::Update { updates } => {
        tracing::info!("hmr update {}", updates.iter().map(|update| &update.path).join(", "));
      }
      _ => tracing::info!("page reload {file}"),
    }
    Some(self.send(payload))
  }

  fn invalidate(&self, modules: &[ModuleUrl], timestamp: u64) -> InvalidationResult {
    let mut seen = FxHashSet::default();
    let mut result = InvalidationResult::default();
    for url in modules {
      result.merge(self.ctx.graph.invalidate_module(url, &mut seen, timestamp, true));
    }
    result
  }

  /// A new file may fix imports that failed to resolve before. Their modules
  /// are invalidated and the page reloads to request them again.
  fn recover_errored_modules(&self, timestamp: u64) -> Option<HmrPayload> {
    let errored = self.ctx.graph.errored_modules();
    if errored.is_empty() {
      return None;
    }
    let mut seen = FxHashSet::default();
    for url in &errored {
      self.ctx.graph.invalidate_module(url, &mut seen, timestamp, false);
    }
    tracing::info!("retrying {} module(s) that failed before, reloading the page", errored.len());
    Some(self.send(HmrPayload::full_reload()))
  }

  fn send(&self, payload: HmrPayload) -> HmrPayload {
    self.ctx.broadcast(&payload);
    payload
  }
}
