mod hot_update_context;
mod plugin;
mod plugin_context;
mod plugin_driver;
mod types;

pub use crate::{
  hot_update_context::HotUpdateContext,
  plugin::{
    HookHotUpdateReturn, HookLoadReturn, HookResolveIdReturn, HookTransformReturn, Plugin,
    SharedPlugin,
  },
  plugin_context::PluginContext,
  plugin_driver::{PluginDriver, SharedPluginDriver},
  types::{
    hook_load_args::HookLoadArgs,
    hook_load_output::HookLoadOutput,
    hook_resolve_id_args::HookResolveIdArgs,
    hook_resolve_id_output::HookResolveIdOutput,
    hook_transform_args::HookTransformArgs,
    hook_transform_output::HookTransformOutput,
    hook_usage::HookUsage,
    plugin_order::PluginOrder,
  },
};
