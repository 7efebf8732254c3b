use serde::Serialize;

/// ```text
/// Fresh -> Stale -> Compiling -> Fresh
///                             -> Errored -> Compiling
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleState {
  /// The cached transform result, if any, matches the files on disk.
  Fresh,
  /// Invalidated. The next request recompiles.
  #[default]
  Stale,
  Compiling,
  /// The last compile failed. Nothing is cached; the next request retries.
  Errored,
}
