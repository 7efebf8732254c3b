mod html;
mod routes;
mod watcher;

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use hotpack_common::{DevOptions, HMR_CLIENT_PATH, HMR_WS_PATH};
use hotpack_fs::{OsFileSystem, SharedFileSystem};
use hotpack_plugin::SharedPlugin;
use tower_http::trace::TraceLayer;

pub use self::{html::inject_client_script, routes::is_module_request, watcher::to_fs_events};
use crate::{
  context::{DevContext, SharedDevContext},
  hmr::SharedHmrServer,
  invalidation::{InvalidationBridge, SharedInvalidationBridge},
  module_graph::SharedModuleGraph,
  transform_request::{SharedTransformRequestHandler, TransformRequestHandler},
  types::SharedOptions,
  utils::normalize_options::normalize_options,
};

#[derive(Clone)]
struct AppState {
  ctx: SharedDevContext,
  transform_handler: SharedTransformRequestHandler,
}

/// Wires HTTP requests to the transform handler and file events to the
/// invalidation bridge.
pub struct DevServer {
  ctx: SharedDevContext,
  transform_handler: SharedTransformRequestHandler,
  bridge: SharedInvalidationBridge,
}

impl DevServer {
  pub fn new(options: DevOptions, plugins: Vec<SharedPlugin>) -> Self {
    Self::with_fs(options, plugins, Arc::new(OsFileSystem))
  }

  pub fn with_fs(options: DevOptions, plugins: Vec<SharedPlugin>, fs: SharedFileSystem) -> Self {
    let options = Arc::new(normalize_options(options));
    let ctx = DevContext::new_shared(options, plugins, fs);
    Self {
      transform_handler: TransformRequestHandler::new_shared(Arc::clone(&ctx)),
      bridge: InvalidationBridge::new_shared(Arc::clone(&ctx)),
      ctx,
    }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.ctx.options
  }

  pub fn ctx(&self) -> &SharedDevContext {
    &self.ctx
  }

  pub fn graph(&self) -> &SharedModuleGraph {
    &self.ctx.graph
  }

  pub fn hmr(&self) -> &SharedHmrServer {
    &self.ctx.hmr
  }

  pub fn transform_handler(&self) -> &SharedTransformRequestHandler {
    &self.transform_handler
  }

  pub fn bridge(&self) -> &SharedInvalidationBridge {
    &self.bridge
  }

  pub fn router(&self) -> Router {
    let state =
      AppState { ctx: Arc::clone(&self.ctx), transform_handler: Arc::clone(&self.transform_handler) };
    Router::new()
      .route(HMR_WS_PATH, get(routes::hmr_socket))
      .route(HMR_CLIENT_PATH, get(routes::hmr_client))
      .fallback(routes::serve_request)
      .layer(TraceLayer::new_for_http())
      .with_state(state)
  }

  /// Serves until the process is stopped.
  pub async fn listen(self) -> anyhow::Result<()> {
    let addr = self.ctx.options.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
      .await
      .with_context(|| format!("Failed to listen on {addr}"))?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let _watcher = watcher::watch(&self.ctx.options, tx)
      .with_context(|| format!("Failed to watch {}", self.ctx.options.root.display()))?;
    let bridge = Arc::clone(&self.bridge);
    tokio::spawn(async move {
      while let Some(event) = rx.recv().await {
        bridge.on_fs_event(event);
      }
    });

    tracing::info!("dev server running at http://{addr}");
    tracing::info!("serving {}", self.ctx.options.root.display());
    axum::serve(listener, self.router()).await.context("Dev server stopped unexpectedly")?;
    Ok(())
  }
}
