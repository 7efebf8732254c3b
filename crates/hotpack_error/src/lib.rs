use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildErrorKind {
  /// No plugin could resolve an import specifier.
  UnresolvedImport,
  /// The module exists but its source could not be read.
  LoadFailed,
  /// Nothing exists behind the requested id.
  NotFound,
  Parse,
  /// A plugin hook returned an error.
  Plugin,
  Internal,
}

/// A diagnostic produced while compiling a single module.
///
/// Errors never stick to a module: the graph keeps no copy of them, so the next
/// request for the same url runs the whole pipeline again.
#[derive(Debug, Clone, thiserror::Error, Serialize)]
#[error("{message}")]
pub struct BuildError {
  pub kind: BuildErrorKind,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plugin: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hook: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub importer: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub specifier: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub frame: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stack: Option<String>,
}

impl BuildError {
  pub fn new(kind: BuildErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
      id: None,
      plugin: None,
      hook: None,
      importer: None,
      specifier: None,
      frame: None,
      stack: None,
    }
  }

  pub fn unresolved_import(specifier: &str, importer: &str) -> Self {
    let mut err = Self::new(
      BuildErrorKind::UnresolvedImport,
      format!("Failed to resolve import \"{specifier}\" from \"{importer}\". Does the file exist?"),
    );
    err.importer = Some(importer.to_string());
    err.specifier = Some(specifier.to_string());
    err
  }

  pub fn not_found(id: &str) -> Self {
    Self::new(BuildErrorKind::NotFound, format!("Could not find module {id}")).with_id(id)
  }

  pub fn load_failed(id: &str, cause: impl Display) -> Self {
    Self::new(BuildErrorKind::LoadFailed, format!("Could not load {id} - {cause}.")).with_id(id)
  }

  pub fn parse(id: &str, message: impl Into<String>) -> Self {
    Self::new(BuildErrorKind::Parse, message).with_id(id)
  }

  pub fn internal(id: &str, message: impl Into<String>) -> Self {
    Self::new(BuildErrorKind::Internal, message).with_id(id)
  }

  /// Wraps an error raised inside a plugin hook.
  pub fn plugin(plugin: &str, hook: &str, id: &str, cause: &anyhow::Error) -> Self {
    let mut err = Self::new(BuildErrorKind::Plugin, format!("[plugin {plugin}] {cause}"));
    err.id = Some(id.to_string());
    err.plugin = Some(plugin.to_string());
    err.hook = Some(hook.to_string());
    err.stack = Some(format!("{cause:?}"));
    err
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }

  pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
    self.frame = Some(frame.into());
    self
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self.kind, BuildErrorKind::NotFound)
  }

  /// The JSON body returned to the browser when a module fails to compile.
  pub fn to_json_body(&self) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert("message".into(), self.message.clone().into());
    for (key, value) in [
      ("importer", &self.importer),
      ("specifier", &self.specifier),
      ("id", &self.id),
      ("plugin", &self.plugin),
      ("frame", &self.frame),
      ("stack", &self.stack),
    ] {
      if let Some(value) = value {
        body.insert(key.into(), value.clone().into());
      }
    }
    body.into()
  }

  /// The `err` object of an HMR `error` message.
  pub fn to_error_payload(&self) -> ErrorPayload {
    ErrorPayload {
      message: self.message.clone(),
      stack: self.stack.clone().unwrap_or_default(),
      id: self.id.clone(),
      frame: self.frame.clone(),
      plugin: self.plugin.clone(),
    }
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    let mut err = Self::new(BuildErrorKind::Internal, error.to_string());
    err.stack = Some(format!("{error:?}"));
    err
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
  pub message: String,
  pub stack: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub frame: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub plugin: Option<String>,
}

pub type BuildResult<T> = Result<T, BuildError>;

#[test]
fn unresolved_import_body() {
  let err = BuildError::unresolved_import("./missing", "/src/main.ts");
  let body = err.to_json_body();
  assert_eq!(body["importer"], "/src/main.ts");
  assert_eq!(body["specifier"], "./missing");
  assert!(body["message"].as_str().unwrap().contains("./missing"));
  assert!(body.get("plugin").is_none());
}

#[test]
fn plugin_error_keeps_origin() {
  let err = BuildError::plugin("vue", "transform", "/App.vue", &anyhow::anyhow!("boom"));
  assert_eq!(err.kind, BuildErrorKind::Plugin);
  assert_eq!(err.to_string(), "[plugin vue] boom");
  let payload = err.to_error_payload();
  assert_eq!(payload.id.as_deref(), Some("/App.vue"));
  assert_eq!(payload.plugin.as_deref(), Some("vue"));
}
