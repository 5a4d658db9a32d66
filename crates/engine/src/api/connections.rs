//! Connection management for WebSocket clients.
//!
//! Every connected client watches the same pet, so broadcasts go to all of
//! them.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use whiskers_shared::ServerMessage;

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    /// Map of connection_id -> sender channel
    connections: RwLock<HashMap<Uuid, mpsc::Sender<ServerMessage>>>,
}

impl ConnectionManager {
    /// Create a new connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection, queueing `greeting()` as its first message.
    ///
    /// The greeting is built under the write lock, so no broadcast can slip
    /// in between it and the registration.
    pub async fn register<F>(
        &self,
        connection_id: Uuid,
        sender: mpsc::Sender<ServerMessage>,
        greeting: F,
    ) where
        F: FnOnce() -> ServerMessage,
    {
        let mut connections = self.connections.write().await;
        if let Err(e) = sender.try_send(greeting()) {
            tracing::warn!(
                connection_id = %connection_id,
                error = %e,
                "Failed to queue greeting"
            );
        }
        connections.insert(connection_id, sender);
        tracing::debug!(
            connection_id = %connection_id,
            total = connections.len(),
            "Connection registered"
        );
    }

    /// Unregister a connection.
    pub async fn unregister(&self, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        if connections.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    /// Number of live connections.
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Broadcast a message to every connection.
    ///
    /// Fire-and-forget: a full or closed channel is logged and skipped.
    pub async fn broadcast(&self, message: ServerMessage) {
        let connections = self.connections.read().await;
        tracing::debug!(
            event = message.event_name(),
            recipients = connections.len(),
            "Broadcasting"
        );
        for (connection_id, sender) in connections.iter() {
            if let Err(e) = sender.try_send(message.clone()) {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to broadcast message"
                );
            }
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello() -> ServerMessage {
        ServerMessage::error("HELLO", "greeting")
    }

    #[tokio::test]
    async fn test_greeting_is_the_first_message() {
        let manager = ConnectionManager::new();
        let (tx, mut rx) = mpsc::channel(4);

        manager.register(Uuid::new_v4(), tx, hello).await;
        manager.broadcast(ServerMessage::Pong).await;

        assert_eq!(rx.recv().await, Some(hello()));
        assert_eq!(rx.recv().await, Some(ServerMessage::Pong));
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        let manager = ConnectionManager::new();
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::channel(4);

        manager.register(id, tx, hello).await;
        assert_eq!(manager.count().await, 1);
        assert_eq!(rx.recv().await, Some(hello()));

        manager.unregister(id).await;
        assert_eq!(manager.count().await, 0);

        manager.broadcast(ServerMessage::Pong).await;
        // The manager held the only sender, so the channel is now closed.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_everyone() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), tx_a, hello).await;
        manager.register(Uuid::new_v4(), tx_b, hello).await;

        manager.broadcast(ServerMessage::Pong).await;

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.recv().await, Some(hello()));
            assert_eq!(rx.recv().await, Some(ServerMessage::Pong));
        }
    }

    #[tokio::test]
    async fn test_broadcast_skips_full_and_closed_channels() {
        let manager = ConnectionManager::new();
        let (full_tx, _full_rx) = mpsc::channel(1);
        let (closed_tx, closed_rx) = mpsc::channel(1);
        drop(closed_rx);
        let (ok_tx, mut ok_rx) = mpsc::channel(2);

        // The greeting fills the one-slot channel.
        manager.register(Uuid::new_v4(), full_tx, hello).await;
        manager.register(Uuid::new_v4(), closed_tx, hello).await;
        manager.register(Uuid::new_v4(), ok_tx, hello).await;

        manager.broadcast(ServerMessage::Pong).await;
        assert_eq!(ok_rx.recv().await, Some(hello()));
        assert_eq!(ok_rx.recv().await, Some(ServerMessage::Pong));
        assert_eq!(manager.count().await, 3);
    }
}
