use hotpack_error::ErrorPayload;
use serde::Serialize;

/// A message pushed from the dev server to every connected HMR client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HmrPayload {
  Connected,
  /// All updates caused by one file change, applied by the client as a batch.
  Update {
    updates: Vec<Update>,
  },
  FullReload {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
  },
  Prune {
    paths: Vec<String>,
  },
  Error {
    err: ErrorPayload,
  },
  Pong,
}

impl HmrPayload {
  pub fn full_reload() -> Self {
    Self::FullReload { path: None }
  }

  pub fn to_json_string(&self) -> String {
    // Every field is a plain string, number or list of those.
    serde_json::to_string(self).unwrap_or_else(|_| String::from("{\"type\":\"full-reload\"}"))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateKind {
  Update,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
  #[serde(rename = "type")]
  pub kind: UpdateKind,
  /// The boundary module the client re-imports.
  pub path: String,
  /// The module whose `accept` handler receives the new exports.
  pub accepted_path: String,
  pub timestamp: u64,
}

impl Update {
  pub fn new(path: impl Into<String>, accepted_path: impl Into<String>, timestamp: u64) -> Self {
    Self { kind: UpdateKind::Update, path: path.into(), accepted_path: accepted_path.into(), timestamp }
  }
}

#[test]
fn payload_wire_format() {
  let update = HmrPayload::Update { updates: vec![Update::new("/util.ts", "/util.ts", 42)] };
  assert_eq!(
    update.to_json_string(),
    r#"{"type":"update","updates":[{"type":"update","path":"/util.ts","acceptedPath":"/util.ts","timestamp":42}]}"#
  );
  assert_eq!(HmrPayload::full_reload().to_json_string(), r#"{"type":"full-reload"}"#);
  assert_eq!(HmrPayload::Connected.to_json_string(), r#"{"type":"connected"}"#);
  assert_eq!(
    HmrPayload::Prune { paths: vec!["/a.ts".to_string()] }.to_json_string(),
    r#"{"type":"prune","paths":["/a.ts"]}"#
  );
}
