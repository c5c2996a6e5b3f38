//! Session identity and the channel plumbing between socket tasks and the
//! coordinator loop.
//!
//! Every inbound connection is issued a stable [`SessionId`] before any
//! protocol exchange. The id, not the transport handle, is what the
//! coordinator keys its lookups on, so disconnect cleanup never depends on
//! the reference identity of a socket.

use std::net::SocketAddr;

use gridbee_protocol::QueenMessage;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

/// Stable identifier issued to every inbound connection at accept time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Write half of a session.
///
/// Messages queued here are drained onto the socket by the session's writer
/// task. When the coordinator drops its handle the queue closes, the writer
/// finishes, and the transport is closed; that is how a rejected bee is
/// turned away without an ACK.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<QueenMessage>,
}

impl Outbound {
    /// Create a write half and the queue its writer task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<QueenMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Whether the peer socket is still writable.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue a message. Silently skipped if the session has closed; sends
    /// are never retried or buffered past the session's lifetime.
    pub fn send(&self, message: QueenMessage) {
        let _ = self.tx.send(message);
    }
}

/// What a session has been classified as by its first meaningful message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    /// A registered bee, by identity.
    Bee(String),
    /// A passive dashboard client.
    Observer,
}

/// Events fed into the coordinator loop by session tasks and the HTTP API.
#[derive(Debug)]
pub enum HiveEvent {
    /// A socket connected and is ready for outbound traffic.
    Opened {
        session: SessionId,
        peer: SocketAddr,
        outbound: Outbound,
    },
    /// A text frame arrived. Raw: parsing happens on the loop so that the
    /// drop-and-log arm lives next to the routing.
    Frame { session: SessionId, text: String },
    /// The transport closed or errored.
    Closed { session: SessionId },
    /// Status probe from the dashboard API.
    Status { reply: oneshot::Sender<HiveStatus> },
}

/// Counters surfaced by `GET /api/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveStatus {
    pub status: &'static str,
    pub bee_count: usize,
    pub prince_count: usize,
    pub observer_count: usize,
}

impl HiveStatus {
    /// Placeholder response when the coordinator loop is unreachable.
    pub fn unavailable() -> Self {
        Self {
            status: "unavailable",
            bee_count: 0,
            prince_count: 0,
            observer_count: 0,
        }
    }
}
