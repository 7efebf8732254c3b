use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use hotpack_common::{ClientMessage, HmrPayload};

use super::SharedHmrServer;

/// Pumps HMR messages to one browser until either side goes away.
pub async fn serve_socket(socket: WebSocket, hmr: SharedHmrServer, ping_interval: Duration) {
  let (client_id, mut outbound) = hmr.connect();
  let (mut sender, mut receiver) = socket.split();

  let mut ping = tokio::time::interval(ping_interval);
  // The first tick completes immediately.
  ping.tick().await;

  loop {
    tokio::select! {
      message = outbound.recv() => {
        let Some(message) = message else {
          break;
        };
        if sender.send(Message::Text(message.to_string())).await.is_err() {
          break;
        }
      }
      incoming = receiver.next() => match incoming {
        Some(Ok(Message::Text(text))) => match ClientMessage::parse(&text) {
          Some(ClientMessage::Ping) => {
            let pong = HmrPayload::Pong.to_json_string();
            if sender.send(Message::Text(pong)).await.is_err() {
              break;
            }
          }
          Some(ClientMessage::Hello) | None => {}
        },
        Some(Ok(Message::Close(_)) | Err(_)) | None => break,
        Some(Ok(_)) => {}
      },
      _ = ping.tick() => {
        if sender.send(Message::Ping(Vec::new())).await.is_err() {
          tracing::debug!(client = client_id, "hmr client missed a ping");
          break;
        }
      }
    }
  }

  hmr.disconnect(client_id);
}
