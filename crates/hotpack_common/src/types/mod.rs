pub mod fs_event;
pub mod module_url;
pub mod resolved_id;
pub mod transform_result;
