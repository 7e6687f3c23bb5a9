use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use session::SessionId;
use tower_http::services::{ServeDir, ServeFile};

use crate::channels::{GatewayEvent, GatewayTx, RegisterSession, RegisterTx, SessionWriteRx, UnregisterTx};
use crate::protocol::ClientMessage;

/// Shared state for the axum WebSocket handler.
#[derive(Clone)]
struct AppState {
    next_session_id: Arc<AtomicU64>,
    active_sessions: Arc<AtomicUsize>,
    max_sessions: usize,
    gateway_tx: GatewayTx,
    register_tx: RegisterTx,
    unregister_tx: UnregisterTx,
}

/// Run the web server with WebSocket upgrade and optional static file serving.
///
/// If `static_dir` is Some, serves files from that directory (SPA fallback to
/// index.html). The `/ws` route always handles WebSocket upgrades.
pub async fn run_web_server(
    addr: String,
    gateway_tx: GatewayTx,
    register_tx: RegisterTx,
    unregister_tx: UnregisterTx,
    static_dir: Option<PathBuf>,
    max_sessions: usize,
) -> Result<(), std::io::Error> {
    run_web_server_inner(
        addr,
        gateway_tx,
        register_tx,
        unregister_tx,
        static_dir,
        max_sessions,
        None,
    )
    .await
}

/// Run the web server with optional shutdown receiver.
pub async fn run_web_server_with_shutdown(
    addr: String,
    gateway_tx: GatewayTx,
    register_tx: RegisterTx,
    unregister_tx: UnregisterTx,
    static_dir: Option<PathBuf>,
    max_sessions: usize,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    run_web_server_inner(
        addr,
        gateway_tx,
        register_tx,
        unregister_tx,
        static_dir,
        max_sessions,
        Some(shutdown_rx),
    )
    .await
}

async fn run_web_server_inner(
    addr: String,
    gateway_tx: GatewayTx,
    register_tx: RegisterTx,
    unregister_tx: UnregisterTx,
    static_dir: Option<PathBuf>,
    max_sessions: usize,
    shutdown_rx: Option<tokio::sync::watch::Receiver<bool>>,
) -> Result<(), std::io::Error> {
    let state = AppState {
        next_session_id: Arc::new(AtomicU64::new(1)),
        active_sessions: Arc::new(AtomicUsize::new(0)),
        max_sessions,
        gateway_tx,
        register_tx,
        unregister_tx,
    };

    let mut app = Router::new()
        .route("/ws", get(ws_upgrade_handler))
        .with_state(state);

    if let Some(dir) = static_dir {
        let index_path = dir.join("index.html");
        let serve_dir = ServeDir::new(&dir).not_found_service(ServeFile::new(index_path));
        app = app.fallback_service(serve_dir);
        tracing::info!(dir = %dir.display(), "Serving static files");
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on {}", addr);

    if let Some(mut rx) = shutdown_rx {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*rx.borrow() {
                    if rx.changed().await.is_err() {
                        return;
                    }
                }
                tracing::info!("Web server shutting down gracefully");
            })
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    } else {
        axum::serve(listener, app)
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

async fn ws_upgrade_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    if state.active_sessions.load(Ordering::Relaxed) >= state.max_sessions {
        tracing::warn!(
            max_sessions = state.max_sessions,
            "Rejecting WebSocket upgrade: server full"
        );
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
        .into_response()
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let session_id = SessionId(state.next_session_id.fetch_add(1, Ordering::Relaxed));
    // Counted once the upgrade completes; a burst of in-flight upgrades can
    // briefly overshoot the cap.
    state.active_sessions.fetch_add(1, Ordering::Relaxed);
    tracing::info!(?session_id, "New WebSocket connection");

    let (mut ws_writer, mut ws_reader) = socket.split();

    // Create per-session write channel
    let (write_tx, mut write_rx): (_, SessionWriteRx) = tokio::sync::mpsc::unbounded_channel();

    // Register with output router
    let _ = state.register_tx.send(RegisterSession {
        session_id,
        write_tx,
    });

    // Notify the game task of the new connection
    let _ = state
        .gateway_tx
        .send(GatewayEvent::Connected { session_id });

    // Writer task: forward router frames as WS text frames
    let writer_handle = tokio::spawn(async move {
        while let Some(text) = write_rx.recv().await {
            if ws_writer.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader loop: parse WS frames and feed the gateway
    while let Some(result) = ws_reader.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(message) = parse_client_frame(session_id, &text) {
                    let _ = state.gateway_tx.send(GatewayEvent::Inbound {
                        session_id,
                        message,
                    });
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_)) => {
                // axum handles pong automatically
            }
            Ok(_) => {} // Ignore binary, pong, etc.
            Err(e) => {
                tracing::debug!(?session_id, "WebSocket read error: {}", e);
                break;
            }
        }
    }

    // Notify the game task of the disconnection
    let _ = state
        .gateway_tx
        .send(GatewayEvent::Disconnected { session_id });
    let _ = state.unregister_tx.send(session_id);

    writer_handle.abort();
    state.active_sessions.fetch_sub(1, Ordering::Relaxed);
    tracing::info!(?session_id, "WebSocket session ended");
}

/// Parse a WebSocket text frame into a ClientMessage. Malformed frames are
/// logged and dropped; the connection stays open.
pub(crate) fn parse_client_frame(session_id: SessionId, text: &str) -> Option<ClientMessage> {
    match serde_json::from_str(text) {
        Ok(msg) => Some(msg),
        Err(e) => {
            tracing::warn!(?session_id, "Invalid client frame: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_is_clone() {
        // AppState must be Clone for axum State extractor
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn parse_valid_frame() {
        let msg = parse_client_frame(SessionId(1), r#"{"type":"join","data":{"name":"alice"}}"#);
        assert_eq!(
            msg,
            Some(ClientMessage::Join {
                name: Some("alice".to_string())
            })
        );
    }

    #[test]
    fn parse_malformed_frame_returns_none() {
        assert!(parse_client_frame(SessionId(1), "{not json").is_none());
        assert!(parse_client_frame(SessionId(1), r#"{"type":"warp","data":{}}"#).is_none());
        assert!(parse_client_frame(SessionId(1), "").is_none());
    }
}
