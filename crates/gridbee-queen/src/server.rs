//! Axum WebSocket ingress and the dashboard HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::session::{HiveEvent, HiveStatus, Outbound, SessionId};

/// Handle the HTTP layer uses to reach the coordinator loop.
#[derive(Clone)]
pub struct AppState {
    events: mpsc::UnboundedSender<HiveEvent>,
    next_session: Arc<AtomicU64>,
}

impl AppState {
    /// Wrap the coordinator loop's event channel.
    pub fn new(events: mpsc::UnboundedSender<HiveEvent>) -> Self {
        Self {
            events,
            next_session: Arc::new(AtomicU64::new(1)),
        }
    }

    fn issue_session_id(&self) -> SessionId {
        SessionId(self.next_session.fetch_add(1, Ordering::Relaxed))
    }
}

/// Router for the hive WebSocket port. Bees and observers connect at the
/// root path (`ws://host:41234`).
pub fn hive_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router for the dashboard port: static frontend plus a status probe.
pub fn dashboard_router(state: AppState, dashboard_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .fallback_service(ServeDir::new(dashboard_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler(State(state): State<AppState>) -> Json<HiveStatus> {
    let (reply, response) = oneshot::channel();
    let _ = state.events.send(HiveEvent::Status { reply });
    match response.await {
        Ok(status) => Json(status),
        Err(_) => Json(HiveStatus::unavailable()),
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, peer, state))
}

/// Drive one WebSocket session.
///
/// Registers the session with the coordinator loop, pumps queued outbound
/// messages onto the socket from a writer task, forwards inbound text
/// frames as events, and emits the close event when the transport goes
/// away. All protocol decisions happen on the loop; this task is a pump.
async fn handle_socket(socket: WebSocket, peer: SocketAddr, state: AppState) {
    let session = state.issue_session_id();
    let (outbound, mut queued) = Outbound::new();
    if state
        .events
        .send(HiveEvent::Opened {
            session,
            peer,
            outbound,
        })
        .is_err()
    {
        // Coordinator loop is gone; nothing to register with
        return;
    }
    debug!("Socket {} connected from {}", session, peer);

    let (mut sink, mut stream) = socket.split();

    // Writer half: drain the loop's queue onto the socket. When the queue
    // closes the coordinator has dropped this session (a grid-full
    // rejection, for one), so close the transport.
    tokio::spawn(async move {
        while let Some(message) = queued.recv().await {
            let Ok(json) = serde_json::to_string(&message) else {
                continue;
            };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // Reader half: forward text frames until close or error.
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let event = HiveEvent::Frame {
                    session,
                    text: text.to_string(),
                };
                if state.events.send(event).is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            // Ping/pong are answered by the protocol layer; binary frames
            // are not part of the vocabulary
            Ok(_) => {}
        }
    }

    let _ = state.events.send(HiveEvent::Closed { session });
    debug!("Socket {} disconnected", session);
}
