pub mod code_frame;
pub mod indexmap;
pub mod path_ext;
pub mod pretty_type_name;
pub mod url;
pub mod xxhash;

pub use base64_simd;
