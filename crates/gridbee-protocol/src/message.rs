//! WebSocket message types.

use gridbee_fitness::{Metrics, Role};
use gridbee_topology::{Direction, Grid, GridCoord};
use serde::{Deserialize, Serialize};

/// Messages a connected client sends to the queen.
///
/// A session is classified by its first meaningful message: `HANDSHAKE`
/// makes it a bee, `OBSERVER` makes it a passive dashboard client.
/// `JOB_SUBMISSION` is accepted from any session, classified or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BeeMessage {
    /// Join request carrying the bee's identity, initial metrics, and the
    /// port it accepts direct peer connections on.
    #[serde(rename = "HANDSHAKE", rename_all = "camelCase")]
    Handshake {
        bee_id: String,
        #[serde(default)]
        metrics: Metrics,
        #[serde(default)]
        p2p_port: u16,
    },

    /// Periodic metrics refresh. Updates the stored PMI, never the role.
    #[serde(rename = "HEARTBEAT", rename_all = "camelCase")]
    Heartbeat {
        bee_id: String,
        #[serde(default)]
        metrics: Metrics,
    },

    /// A job to shard across the promoted set. The payload is an opaque
    /// encoded string; `fileSize` is the submitter's declared size.
    #[serde(rename = "JOB_SUBMISSION", rename_all = "camelCase")]
    JobSubmission {
        job_name: String,
        #[serde(default)]
        file_size: f64,
        data: String,
    },

    /// Subscribe the session as a passive state observer.
    #[serde(rename = "OBSERVER")]
    Observer,

    /// Graceful shutdown notice from a bee. Cleanup happens on the close
    /// event that follows.
    #[serde(rename = "GOODBYE", rename_all = "camelCase")]
    Goodbye { bee_id: String },
}

/// Direct-connect endpoint a bee can dial for peer-to-peer links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub ip: String,
    pub port: u16,
}

/// Per-bee entry in a `HIVE_STATE` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeeSummary {
    pub id: String,
    pub coords: GridCoord,
    pub role: Role,
    pub pmi: f64,
    pub p2p_port: u16,
}

/// Authoritative grid-plus-count snapshot carried by heartbeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiveState {
    pub grid: Grid,
    pub bee_count: usize,
}

/// Admission acknowledgment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckStatus {
    Accepted,
}

/// Job acknowledgment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Received,
}

/// Messages the queen sends to bees and observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueenMessage {
    /// Successful admission: assigned coordinates and the sticky role.
    #[serde(rename = "ACK")]
    Ack {
        status: AckStatus,
        coordinates: GridCoord,
        role: Role,
    },

    /// An occupied adjacent slot became reachable; carries the neighbor's
    /// direct-connect endpoint.
    #[serde(rename = "NEIGHBOR_UPDATE", rename_all = "camelCase")]
    NeighborUpdate {
        direction: Direction,
        connection_info: ConnectionInfo,
    },

    /// Periodic authoritative-state push to promoted bees. The shape
    /// mirrors a consensus append so bee-side consumption logic matches a
    /// real follower's, but the term never advances and there is no
    /// election: the queen is the single fixed authority.
    #[serde(rename = "APPEND_ENTRIES", rename_all = "camelCase")]
    AppendEntries {
        term: u64,
        leader_id: String,
        hive_state: HiveState,
    },

    /// One contiguous block of a submitted job, paired with its index.
    #[serde(rename = "BLOCK_ASSIGNMENT", rename_all = "camelCase")]
    BlockAssignment {
        job_id: String,
        block_id: usize,
        total_blocks: usize,
        data: String,
    },

    /// Submission acknowledgment, sent once dispatch attempts complete.
    /// Does not reflect delivery to recipients.
    #[serde(rename = "JOB_ACK", rename_all = "camelCase")]
    JobAck { job_id: String, status: JobStatus },

    /// Full snapshot for observers.
    #[serde(rename = "HIVE_STATE", rename_all = "camelCase")]
    HiveState {
        grid: Grid,
        bee_count: usize,
        bees: Vec<BeeSummary>,
    },

    /// Lightweight removal notice so a dashboard can animate the exact
    /// cell that emptied.
    #[serde(rename = "NODE_REMOVED")]
    NodeRemoved { id: String, coords: GridCoord },
}
