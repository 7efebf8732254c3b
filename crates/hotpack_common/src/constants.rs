/// The url the HMR client script is served from.
pub const HMR_CLIENT_PATH: &str = "/@hotpack/client";

/// The WebSocket endpoint HMR clients connect to.
pub const HMR_WS_PATH: &str = "/__hmr";

/// Urls under this prefix belong to the dev server itself and never enter the module graph.
pub const VIRTUAL_PREFIX: &str = "/@hotpack/";
