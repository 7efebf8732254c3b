mod compile_module;

use std::sync::{
  atomic::{AtomicU64, Ordering},
  Arc,
};

use dashmap::{mapref::entry::Entry, DashMap};
use futures::{
  future::{BoxFuture, Shared},
  FutureExt,
};
use hotpack_common::{HmrPayload, ModuleUrl, TransformResult};
use hotpack_error::{BuildError, BuildResult};

use crate::context::SharedDevContext;

type CompileFuture = Shared<BoxFuture<'static, BuildResult<Arc<TransformResult>>>>;

struct InFlight {
  /// The module version the compile started from.
  version: u64,
  request_id: u64,
  future: CompileFuture,
}

type InFlightMap = Arc<DashMap<ModuleUrl, InFlight>>;

pub type SharedTransformRequestHandler = Arc<TransformRequestHandler>;

/// Compiles modules on demand and serves them from the graph's cache.
///
/// Concurrent requests for the same url share one compile. A compile that
/// started before the module was invalidated is not joined by newer requests
/// and its result is never committed.
pub struct TransformRequestHandler {
  ctx: SharedDevContext,
  in_flight: InFlightMap,
  next_request_id: AtomicU64,
}

impl TransformRequestHandler {
  pub fn new_shared(ctx: SharedDevContext) -> SharedTransformRequestHandler {
    Arc::new(Self { ctx, in_flight: InFlightMap::default(), next_request_id: AtomicU64::new(1) })
  }

  pub async fn transform_request(&self, raw_url: &str) -> BuildResult<Arc<TransformResult>> {
    let url = self.ctx.graph.resolve_url(raw_url);
    if let Some(result) = self.ctx.graph.cached_result(&url) {
      tracing::debug!("[cache hit] {url}");
      return Ok(result);
    }

    let node = self.ctx.graph.ensure_entry_from_url(&url);
    if node.importers.is_empty() {
      self.ctx.graph.mark_entry(&url);
    }
    self.join_or_start(url, node.version).await
  }

  /// Number of compiles currently running.
  pub fn in_flight_count(&self) -> usize {
    self.in_flight.len()
  }

  fn join_or_start(&self, url: ModuleUrl, version: u64) -> CompileFuture {
    match self.in_flight.entry(url.clone()) {
      Entry::Occupied(entry) if entry.get().version >= version => {
        tracing::debug!("[join] {url}");
        entry.get().future.clone()
      }
      entry => {
        // The previous compile may have committed after the cache check.
        if let Some(result) = self.ctx.graph.cached_result(&url) {
          return futures::future::ready(Ok(result)).boxed().shared();
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        // The entry guard is held until the new compile is registered, so the
        // task can not remove its entry before it exists.
        let handle = tokio::spawn(compile(
          Arc::clone(&self.ctx),
          Arc::clone(&self.in_flight),
          url,
          version,
          request_id,
        ));
        let future = async move {
          match handle.await {
            Ok(result) => result,
            Err(err) => Err(BuildError::from(anyhow::Error::from(err))),
          }
        }
        .boxed()
        .shared();

        let in_flight = InFlight { version, request_id, future: future.clone() };
        match entry {
          Entry::Occupied(mut entry) => {
            entry.insert(in_flight);
          }
          Entry::Vacant(entry) => {
            entry.insert(in_flight);
          }
        }
        future
      }
    }
  }
}

async fn compile(
  ctx: SharedDevContext,
  in_flight: InFlightMap,
  url: ModuleUrl,
  version: u64,
  request_id: u64,
) -> BuildResult<Arc<TransformResult>> {
  ctx.graph.begin_compile(&url, version);
  tracing::debug!("[compile] {url} (version {version})");

  let result = compile_module::compile_module(&ctx, &url).await.map(Arc::new);
  match &result {
    Ok(result) => {
      if !ctx.graph.commit_transform_result(&url, version, Arc::clone(result)) {
        tracing::debug!("[stale] {url} was invalidated while compiling, result discarded");
      }
    }
    Err(err) => {
      ctx.graph.mark_errored(&url, version);
      if !err.is_not_found() {
        tracing::error!("failed to compile {url}: {err}");
        ctx.broadcast(&HmrPayload::Error { err: err.to_error_payload() });
      }
    }
  }

  in_flight.remove_if(&url, |_, entry| entry.request_id == request_id);
  result
}
