mod ws;

use std::sync::{
  atomic::{AtomicU64, Ordering},
  Arc,
};

use dashmap::DashMap;
use hotpack_common::{HmrPayload, Update};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::module_graph::InvalidationResult;

pub use ws::serve_socket;

pub type ClientId = u64;
pub type SharedHmrServer = Arc<HmrServer>;

/// Keeps one bounded outbound queue per connected client. Nothing is
/// replayed to clients that connect later.
pub struct HmrServer {
  clients: DashMap<ClientId, mpsc::Sender<Arc<str>>>,
  next_client_id: AtomicU64,
  client_buffer: usize,
}

impl HmrServer {
  pub fn new_shared(client_buffer: usize) -> SharedHmrServer {
    Arc::new(Self {
      clients: DashMap::default(),
      next_client_id: AtomicU64::new(1),
      client_buffer: client_buffer.max(1),
    })
  }

  /// Registers a client. Its queue starts with a `connected` message.
  pub fn connect(&self) -> (ClientId, mpsc::Receiver<Arc<str>>) {
    let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
    let (tx, rx) = mpsc::channel(self.client_buffer);
    let _ = tx.try_send(HmrPayload::Connected.to_json_string().into());
    self.clients.insert(id, tx);
    tracing::info!(client = id, "hmr client connected");
    (id, rx)
  }

  pub fn disconnect(&self, id: ClientId) {
    if self.clients.remove(&id).is_some() {
      tracing::info!(client = id, "hmr client disconnected");
    }
  }

  pub fn client_count(&self) -> usize {
    self.clients.len()
  }

  /// Serializes `payload` once and queues it for every client without
  /// waiting. A client whose queue is full or closed is dropped. Returns the
  /// number of clients the message was queued for.
  pub fn broadcast(&self, payload: &HmrPayload) -> usize {
    let message: Arc<str> = payload.to_json_string().into();
    let mut delivered = 0;
    let mut dropped = Vec::new();

    for client in &self.clients {
      match client.value().try_send(Arc::clone(&message)) {
        Ok(()) => delivered += 1,
        Err(TrySendError::Full(_)) => {
          tracing::warn!(client = client.key(), "hmr client is not keeping up, dropping it");
          dropped.push(*client.key());
        }
        Err(TrySendError::Closed(_)) => dropped.push(*client.key()),
      }
    }

    for id in dropped {
      self.disconnect(id);
    }
    delivered
  }
}

/// Turns the outcome of one change cycle into the single message sent for
/// it, or `None` if nothing was invalidated.
pub fn update_payload(result: &InvalidationResult, timestamp: u64) -> Option<HmrPayload> {
  if result.needs_full_reload() {
    return Some(HmrPayload::full_reload());
  }
  if result.boundaries.is_empty() {
    return None;
  }
  let updates = result
    .boundaries
    .iter()
    .map(|boundary| {
      Update::new(boundary.boundary.as_str(), boundary.accepted_via.as_str(), timestamp)
    })
    .collect();
  Some(HmrPayload::Update { updates })
}

#[cfg(test)]
mod tests {
  use hotpack_common::ModuleUrl;

  use super::*;
  use crate::module_graph::HmrBoundary;

  #[tokio::test]
  async fn broadcast_reaches_every_client_once() {
    let hmr = HmrServer::new_shared(8);
    let (_, mut first) = hmr.connect();
    let (_, mut second) = hmr.connect();
    assert_eq!(&*first.recv().await.unwrap(), r#"{"type":"connected"}"#);
    assert_eq!(&*second.recv().await.unwrap(), r#"{"type":"connected"}"#);

    assert_eq!(hmr.broadcast(&HmrPayload::full_reload()), 2);
    assert_eq!(&*first.recv().await.unwrap(), r#"{"type":"full-reload"}"#);
    assert_eq!(&*second.recv().await.unwrap(), r#"{"type":"full-reload"}"#);
    assert!(first.try_recv().is_err());
  }

  #[tokio::test]
  async fn slow_and_closed_clients_are_dropped() {
    let hmr = HmrServer::new_shared(1);
    // The `connected` message already fills the queue.
    let (_, _slow) = hmr.connect();
    let (_, closed) = hmr.connect();
    drop(closed);
    assert_eq!(hmr.client_count(), 2);

    assert_eq!(hmr.broadcast(&HmrPayload::full_reload()), 0);
    assert_eq!(hmr.client_count(), 0);
  }

  #[test]
  fn one_message_for_all_boundaries() {
    let mut result = InvalidationResult::default();
    for url in ["/a.ts", "/b.ts", "/c.ts"] {
      result.invalidated.push(ModuleUrl::from(url));
      result.boundaries.insert(HmrBoundary { boundary: url.into(), accepted_via: url.into() });
    }
    let Some(HmrPayload::Update { updates }) = update_payload(&result, 7) else {
      panic!("expected an update payload");
    };
    assert_eq!(updates.len(), 3);
    assert!(updates.iter().all(|update| update.timestamp == 7));

    result.has_dead_end = true;
    assert_eq!(update_payload(&result, 7), Some(HmrPayload::full_reload()));
    assert_eq!(update_payload(&InvalidationResult::default(), 7), None);
  }
}
