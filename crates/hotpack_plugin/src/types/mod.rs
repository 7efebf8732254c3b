pub mod hook_load_args;
pub mod hook_load_output;
pub mod hook_resolve_id_args;
pub mod hook_resolve_id_output;
pub mod hook_transform_args;
pub mod hook_transform_output;
pub mod hook_usage;
pub mod plugin_order;
