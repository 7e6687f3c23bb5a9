use session::SessionId;
use tokio::sync::mpsc;

use crate::protocol::ClientMessage;

/// Events from connection tasks to the game task. Frames are parsed at the
/// socket edge, so the game task only ever sees well-formed messages.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// A WebSocket connection finished its upgrade.
    Connected { session_id: SessionId },
    /// A parsed inbound frame.
    Inbound {
        session_id: SessionId,
        message: ClientMessage,
    },
    /// The connection closed or failed.
    Disconnected { session_id: SessionId },
}

/// Sender from connection tasks to the game task.
pub type GatewayTx = mpsc::UnboundedSender<GatewayEvent>;
/// Receiver in the game task for gateway events.
pub type GatewayRx = mpsc::UnboundedReceiver<GatewayEvent>;

/// Fan-out commands from the game task to the output router. Frames arrive
/// already serialized, so a broadcast serializes once for all recipients.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// One frame to one session.
    Unicast {
        session_id: SessionId,
        frame: String,
    },
    /// One frame to every registered session except `exclude`.
    Broadcast {
        frame: String,
        exclude: Option<SessionId>,
    },
}

pub type OutboundTx = mpsc::UnboundedSender<Outbound>;
pub type OutboundRx = mpsc::UnboundedReceiver<Outbound>;

/// Per-session write channel (output router -> session writer task).
pub type SessionWriteTx = mpsc::UnboundedSender<String>;
pub type SessionWriteRx = mpsc::UnboundedReceiver<String>;

/// Registration message for the output router.
#[derive(Debug)]
pub struct RegisterSession {
    pub session_id: SessionId,
    pub write_tx: SessionWriteTx,
}

pub type RegisterTx = mpsc::UnboundedSender<RegisterSession>;
pub type RegisterRx = mpsc::UnboundedReceiver<RegisterSession>;

pub type UnregisterTx = mpsc::UnboundedSender<SessionId>;
pub type UnregisterRx = mpsc::UnboundedReceiver<SessionId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn gateway_channel_roundtrip() {
        let (tx, mut rx) = mpsc::unbounded_channel::<GatewayEvent>();

        tx.send(GatewayEvent::Connected {
            session_id: SessionId(1),
        })
        .unwrap();

        tx.send(GatewayEvent::Inbound {
            session_id: SessionId(1),
            message: ClientMessage::Join {
                name: Some("alice".to_string()),
            },
        })
        .unwrap();

        tx.send(GatewayEvent::Disconnected {
            session_id: SessionId(1),
        })
        .unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            GatewayEvent::Connected { .. }
        ));
        match rx.recv().await.unwrap() {
            GatewayEvent::Inbound {
                session_id,
                message: ClientMessage::Join { name },
            } => {
                assert_eq!(session_id, SessionId(1));
                assert_eq!(name.as_deref(), Some("alice"));
            }
            other => panic!("expected join, got {:?}", other),
        }
        assert!(matches!(
            rx.recv().await.unwrap(),
            GatewayEvent::Disconnected { .. }
        ));
    }

    #[tokio::test]
    async fn outbound_channel_roundtrip() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();

        tx.send(Outbound::Unicast {
            session_id: SessionId(42),
            frame: "{\"type\":\"init\"}".to_string(),
        })
        .unwrap();
        tx.send(Outbound::Broadcast {
            frame: "{\"type\":\"gameUpdate\"}".to_string(),
            exclude: Some(SessionId(42)),
        })
        .unwrap();

        match rx.recv().await.unwrap() {
            Outbound::Unicast { session_id, frame } => {
                assert_eq!(session_id, SessionId(42));
                assert!(frame.contains("init"));
            }
            other => panic!("expected unicast, got {:?}", other),
        }
        match rx.recv().await.unwrap() {
            Outbound::Broadcast { exclude, .. } => {
                assert_eq!(exclude, Some(SessionId(42)));
            }
            other => panic!("expected broadcast, got {:?}", other),
        }
    }
}
