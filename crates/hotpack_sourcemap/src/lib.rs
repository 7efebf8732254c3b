mod collapse;

pub use crate::collapse::collapse_sourcemaps;
pub use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use hotpack_utils::base64_simd;

/// `//# sourceMappingURL=data:...` comment carrying `map` inline.
pub fn inline_sourcemap_comment(map: &SourceMap) -> String {
  let encoded = base64_simd::STANDARD.encode_to_string(map.to_json_string().as_bytes());
  format!("\n//# sourceMappingURL=data:application/json;base64,{encoded}")
}
