use std::sync::Arc;

use hotpack_common::HmrPayload;
use hotpack_fs::SharedFileSystem;
use hotpack_plugin::{PluginContext, PluginDriver, SharedPlugin, SharedPluginDriver};
use hotpack_resolver::Resolver;

use crate::{
  hmr::{HmrServer, SharedHmrServer},
  module_graph::{ModuleGraph, SharedModuleGraph},
  plugins::builtin_plugins,
  types::{SharedOptions, SharedResolver},
  utils::timestamp::HmrClock,
};

pub type SharedDevContext = Arc<DevContext>;

/// Everything one dev server instance owns. Request handlers and watcher
/// callbacks receive it explicitly, so several servers can live side by side.
pub struct DevContext {
  pub options: SharedOptions,
  pub fs: SharedFileSystem,
  pub resolver: SharedResolver,
  pub graph: SharedModuleGraph,
  pub plugin_driver: SharedPluginDriver,
  pub hmr: SharedHmrServer,
  pub clock: HmrClock,
}

impl DevContext {
  pub fn new_shared(
    options: SharedOptions,
    user_plugins: Vec<SharedPlugin>,
    fs: SharedFileSystem,
  ) -> SharedDevContext {
    let resolver: SharedResolver = Resolver::new(options.root.clone(), &options.conditions).into();

    let mut plugins = builtin_plugins(&options, Arc::clone(&resolver));
    plugins.extend(user_plugins);
    let plugin_driver =
      PluginDriver::new_shared(plugins, PluginContext::new(options.root.clone(), Arc::clone(&fs)));

    Arc::new(Self {
      hmr: HmrServer::new_shared(options.client_buffer),
      graph: ModuleGraph::new_shared(),
      clock: HmrClock::default(),
      options,
      fs,
      resolver,
      plugin_driver,
    })
  }

  pub fn broadcast(&self, payload: &HmrPayload) {
    let delivered = self.hmr.broadcast(payload);
    tracing::debug!("hmr message delivered to {delivered} client(s)");
  }
}
