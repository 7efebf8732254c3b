mod css;
mod json;
mod resolve;
mod transpile;

use std::sync::Arc;

use hotpack_plugin::SharedPlugin;

pub use css::CssPlugin;
pub use json::JsonPlugin;
pub use resolve::{id_to_url, ResolvePlugin, ID_PREFIX, NULL_BYTE_PLACEHOLDER};
pub use transpile::TranspilePlugin;

use crate::types::{SharedOptions, SharedResolver};

/// The plugins every dev server runs. They have the default order, so user
/// `pre` plugins run before them and user `normal` plugins after.
pub fn builtin_plugins(options: &SharedOptions, resolver: SharedResolver) -> Vec<SharedPlugin> {
  vec![
    Arc::new(ResolvePlugin::new(Arc::clone(options), resolver)),
    Arc::new(TranspilePlugin),
    Arc::new(JsonPlugin),
    Arc::new(CssPlugin),
  ]
}
