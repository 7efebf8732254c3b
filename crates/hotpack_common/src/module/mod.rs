pub mod module_info;
pub mod module_node;
pub mod module_state;
