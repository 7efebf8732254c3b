pub mod normalized_dev_options;

use std::path::PathBuf;

use serde::Deserialize;

/// Raw dev server options, as written in a JSON config file or assembled from
/// command line flags. Every field is optional; `normalize_options` fills in
/// the defaults.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevOptions {
  pub root: Option<PathBuf>,
  pub host: Option<String>,
  pub port: Option<u16>,
  /// Window in which repeated events for the same file collapse into one.
  pub debounce_ms: Option<u64>,
  /// Outbound messages queued per HMR client before it is dropped.
  pub client_buffer: Option<usize>,
  pub ping_interval_ms: Option<u64>,
  pub config_file: Option<PathBuf>,
  /// Extra `exports` conditions for bare specifiers.
  pub conditions: Option<Vec<String>>,
  /// Directories outside `root` whose files may be served through `/@fs/`.
  pub fs_allow: Option<Vec<PathBuf>>,
}

impl DevOptions {
  /// Fills every unset field of `self` from `other`.
  pub fn merge(self, other: DevOptions) -> DevOptions {
    DevOptions {
      root: self.root.or(other.root),
      host: self.host.or(other.host),
      port: self.port.or(other.port),
      debounce_ms: self.debounce_ms.or(other.debounce_ms),
      client_buffer: self.client_buffer.or(other.client_buffer),
      ping_interval_ms: self.ping_interval_ms.or(other.ping_interval_ms),
      config_file: self.config_file.or(other.config_file),
      conditions: self.conditions.or(other.conditions),
      fs_allow: self.fs_allow.or(other.fs_allow),
    }
  }
}

#[test]
fn deserialize_camel_case() {
  let options: DevOptions =
    serde_json::from_str(r#"{ "port": 3000, "debounceMs": 10, "conditions": ["development"], "fsAllow": ["../shared"] }"#)
      .unwrap();
  assert_eq!(options.port, Some(3000));
  assert_eq!(options.debounce_ms, Some(10));
  assert_eq!(options.conditions, Some(vec!["development".to_string()]));
  assert_eq!(options.fs_allow, Some(vec![PathBuf::from("../shared")]));
  assert!(serde_json::from_str::<DevOptions>(r#"{ "unknown": 1 }"#).is_err());
}

#[test]
fn merge_prefers_self() {
  let cli = DevOptions { port: Some(8080), ..Default::default() };
  let file = DevOptions { port: Some(3000), host: Some("0.0.0.0".into()), ..Default::default() };
  let merged = cli.merge(file);
  assert_eq!(merged.port, Some(8080));
  assert_eq!(merged.host.as_deref(), Some("0.0.0.0"));
}
