mod context;
mod dev_server;
mod hmr;
mod invalidation;
mod module_graph;
pub mod plugins;
mod transform_request;
mod types;
mod utils;

pub use crate::{
  context::{DevContext, SharedDevContext},
  dev_server::{inject_client_script, is_module_request, to_fs_events, DevServer},
  hmr::{update_payload, ClientId, HmrServer, SharedHmrServer},
  invalidation::{InvalidationBridge, SharedInvalidationBridge},
  module_graph::{HmrBoundary, InvalidationResult, ModuleGraph, SharedModuleGraph},
  transform_request::{SharedTransformRequestHandler, TransformRequestHandler},
  types::{SharedOptions, SharedResolver},
  utils::{normalize_options::normalize_options, timestamp::HmrClock},
};
pub use hotpack_common::*;
pub use hotpack_error::{BuildError, BuildErrorKind, BuildResult};
pub use hotpack_plugin::*;
