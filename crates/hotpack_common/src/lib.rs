mod constants;
mod dev_options;
mod hmr;
mod module;
mod types;

pub use crate::{
  constants::{HMR_CLIENT_PATH, HMR_WS_PATH, VIRTUAL_PREFIX},
  dev_options::{normalized_dev_options::NormalizedDevOptions, DevOptions},
  hmr::{
    client_message::ClientMessage,
    payload::{HmrPayload, Update, UpdateKind},
  },
  module::{module_info::ModuleInfo, module_node::ModuleNode, module_state::ModuleState},
  types::{
    fs_event::{FsEvent, FsEventKind},
    module_url::ModuleUrl,
    resolved_id::ResolvedId,
    transform_result::TransformResult,
  },
};
