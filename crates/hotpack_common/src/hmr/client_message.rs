use serde::Deserialize;

/// A message sent by an HMR client over the WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
  Hello,
  Ping,
}

impl ClientMessage {
  /// `None` for anything that is not a known message.
  pub fn parse(text: &str) -> Option<Self> {
    serde_json::from_str(text).ok()
  }
}

#[test]
fn parses_known_messages() {
  assert_eq!(ClientMessage::parse(r#"{"type":"ping"}"#), Some(ClientMessage::Ping));
  assert_eq!(ClientMessage::parse(r#"{"type":"hello","extra":1}"#), Some(ClientMessage::Hello));
  assert_eq!(ClientMessage::parse(r#"{"type":"custom"}"#), None);
  assert_eq!(ClientMessage::parse("not json"), None);
}
