//! HiveMind: the coordinator's single source of truth.
//!
//! One aggregate owns the grid, the bee registry, the promoted set, the
//! observer list, and the write half of every live session. It is mutated
//! exclusively by the coordinator event loop, one event at a time, so every
//! operation here is atomic with respect to every other and no locking is
//! needed anywhere.
//!
//! # Control flow
//!
//! A bee connects and handshakes; its metrics collapse to a PMI; the grid
//! hands out the first free slot in row-major order (or the session is
//! closed if the grid is full); the role is derived once and stays sticky;
//! occupied cardinal neighbors exchange direct-connect endpoints; observers
//! get a fresh snapshot. Heartbeats refresh scores only. Disconnects
//! release the slot, drop promoted-set membership, and notify observers
//! which cell emptied.
//!
//! # Topology
//!
//! Sessions form a star around the queen. The neighbor exchange layers an
//! eventually-consistent local mesh of peer endpoints on top of it; the
//! queen does not participate in or verify those peer links.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use gridbee_fitness::{pmi, role_for, Metrics, Role};
use gridbee_protocol::{
    AckStatus, BeeMessage, BeeSummary, ConnectionInfo, HiveState, JobStatus, QueenMessage,
};
use gridbee_topology::{neighbors_of, Grid, GridCoord, GridFull};
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::session::{HiveEvent, HiveStatus, Outbound, SessionId, SessionKind};
use crate::sharding;

/// Term carried by every heartbeat. The queen is the single fixed
/// authority; nothing exists to advance it.
pub const HEARTBEAT_TERM: u64 = 1;

/// Leader identity carried by heartbeats.
pub const LEADER_ID: &str = "QUEEN";

/// A registered bee.
#[derive(Debug, Clone)]
pub struct Bee {
    /// Session the bee joined on; the disconnect lookup key.
    pub session: SessionId,
    /// Grid placement, fixed for the bee's lifetime.
    pub coords: GridCoord,
    /// Latest PMI. Refreshed by heartbeats.
    pub pmi: f64,
    /// Role derived at admission. Sticky: never recomputed.
    pub role: Role,
    /// Transport-observed address, paired with `p2p_port` for peer links.
    pub ip: IpAddr,
    /// Port the bee accepts direct peer connections on.
    pub p2p_port: u16,
    /// Latest reported metrics.
    pub metrics: Metrics,
}

struct Session {
    outbound: Outbound,
    ip: IpAddr,
}

/// The coordinator state aggregate.
pub struct HiveMind {
    grid: Grid,
    bees: HashMap<String, Bee>,
    /// PRINCE bee ids in admission order: the heartbeat fan-out list and
    /// the job dispatch order.
    princes: Vec<String>,
    observers: HashSet<SessionId>,
    /// Classification of each live session.
    kinds: HashMap<SessionId, SessionKind>,
    /// Write half of each live session.
    sessions: HashMap<SessionId, Session>,
    term: u64,
}

impl HiveMind {
    /// Create an empty hive.
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            bees: HashMap::new(),
            princes: Vec::new(),
            observers: HashSet::new(),
            kinds: HashMap::new(),
            sessions: HashMap::new(),
            term: HEARTBEAT_TERM,
        }
    }

    /// Apply one event from the connection layer.
    pub fn apply(&mut self, event: HiveEvent) {
        match event {
            HiveEvent::Opened {
                session,
                peer,
                outbound,
            } => {
                debug!("Session {} opened from {}", session, peer);
                self.sessions.insert(
                    session,
                    Session {
                        outbound,
                        ip: peer.ip(),
                    },
                );
            }
            HiveEvent::Frame { session, text } => self.route(session, &text),
            HiveEvent::Closed { session } => self.disconnect(session),
            HiveEvent::Status { reply } => {
                let _ = reply.send(self.status());
            }
        }
    }

    /// Push the APPEND_ENTRIES heartbeat to every prince.
    pub fn heartbeat_tick(&self) {
        if self.princes.is_empty() {
            return;
        }
        let message = QueenMessage::AppendEntries {
            term: self.term,
            leader_id: LEADER_ID.to_string(),
            hive_state: HiveState {
                grid: self.grid.clone(),
                bee_count: self.bees.len(),
            },
        };
        for bee_id in &self.princes {
            if let Some(bee) = self.bees.get(bee_id) {
                self.send_to(bee.session, message.clone());
            }
        }
    }

    /// Current counters for the status endpoint.
    pub fn status(&self) -> HiveStatus {
        HiveStatus {
            status: "ok",
            bee_count: self.bees.len(),
            prince_count: self.princes.len(),
            observer_count: self.observers.len(),
        }
    }

    /// The slot table.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Look up a registered bee.
    pub fn bee(&self, bee_id: &str) -> Option<&Bee> {
        self.bees.get(bee_id)
    }

    /// Number of registered bees.
    pub fn bee_count(&self) -> usize {
        self.bees.len()
    }

    /// Promoted bee ids, in admission order.
    pub fn princes(&self) -> &[String] {
        &self.princes
    }

    /// Number of subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Route one inbound frame.
    ///
    /// Unparseable payloads, including unknown message types, are logged
    /// and dropped; the session stays open.
    fn route(&mut self, session: SessionId, text: &str) {
        let message = match serde_json::from_str::<BeeMessage>(text) {
            Ok(message) => message,
            Err(err) => {
                warn!("Malformed message on session {}: {}", session, err);
                return;
            }
        };

        match message {
            BeeMessage::Handshake {
                bee_id,
                metrics,
                p2p_port,
            } => self.admit(session, bee_id, metrics, p2p_port),
            BeeMessage::Heartbeat { bee_id, metrics } => self.update_score(&bee_id, metrics),
            BeeMessage::JobSubmission {
                job_name,
                file_size,
                data,
            } => self.dispatch_job(session, &job_name, file_size, &data),
            BeeMessage::Observer => self.subscribe_observer(session),
            BeeMessage::Goodbye { bee_id } => {
                info!("Bee {} said goodbye; awaiting close", bee_id);
            }
        }
    }

    /// Admit a bee: score, reserve a slot, derive the sticky role, exchange
    /// neighbor endpoints, refresh observers.
    ///
    /// A full grid closes the session without an ACK; the bee treats the
    /// unsolicited close as rejection.
    fn admit(&mut self, session: SessionId, bee_id: String, metrics: Metrics, p2p_port: u16) {
        if self.kinds.contains_key(&session) {
            warn!("Handshake on already-classified session {} dropped", session);
            return;
        }
        if self.bees.contains_key(&bee_id) {
            warn!("Handshake with duplicate bee id {} dropped", bee_id);
            return;
        }
        let Some(ip) = self.sessions.get(&session).map(|s| s.ip) else {
            return;
        };

        let score = pmi(&metrics);
        let coords = match self.grid.reserve(bee_id.clone()) {
            Ok(coords) => coords,
            Err(GridFull) => {
                warn!("Grid full! Rejecting bee {}", bee_id);
                self.close_session(session);
                return;
            }
        };

        let role = role_for(score);
        self.bees.insert(
            bee_id.clone(),
            Bee {
                session,
                coords,
                pmi: score,
                role,
                ip,
                p2p_port,
                metrics,
            },
        );
        self.kinds.insert(session, SessionKind::Bee(bee_id.clone()));
        if role.is_promoted() {
            self.princes.push(bee_id.clone());
            info!("New prince designated: {}", bee_id);
        }
        info!(
            "Bee {} joined the hive at {} with PMI {:.2} ({})",
            bee_id, coords, score, role
        );

        self.send_to(
            session,
            QueenMessage::Ack {
                status: AckStatus::Accepted,
                coordinates: coords,
                role,
            },
        );
        self.notify_neighbors(&bee_id);
        self.broadcast_state();
    }

    /// Exchange direct-connect endpoints between a freshly placed bee and
    /// its occupied cardinal neighbors. Both sides learn about each other;
    /// absent neighbors produce no message.
    fn notify_neighbors(&self, bee_id: &str) {
        let Some(bee) = self.bees.get(bee_id) else {
            return;
        };
        let endpoint = ConnectionInfo {
            ip: bee.ip.to_string(),
            port: bee.p2p_port,
        };

        for (direction, coord) in neighbors_of(bee.coords) {
            let Some(neighbor_id) = self.grid.occupant(coord) else {
                continue;
            };
            let Some(neighbor) = self.bees.get(neighbor_id) else {
                continue;
            };

            // The new bee learns where its neighbor listens...
            self.send_to(
                bee.session,
                QueenMessage::NeighborUpdate {
                    direction,
                    connection_info: ConnectionInfo {
                        ip: neighbor.ip.to_string(),
                        port: neighbor.p2p_port,
                    },
                },
            );
            // ...and the neighbor learns the new bee, seen from its side.
            self.send_to(
                neighbor.session,
                QueenMessage::NeighborUpdate {
                    direction: direction.opposite(),
                    connection_info: endpoint.clone(),
                },
            );
        }
    }

    /// Refresh a bee's PMI from a heartbeat.
    ///
    /// Unknown bee ids are dropped silently: heartbeats from stale or
    /// never-registered senders are not an error. The role is never
    /// recomputed here.
    fn update_score(&mut self, bee_id: &str, metrics: Metrics) {
        let Some(bee) = self.bees.get_mut(bee_id) else {
            debug!("Heartbeat from unknown bee {} ignored", bee_id);
            return;
        };
        bee.pmi = pmi(&metrics);
        bee.metrics = metrics;
    }

    /// Shard a submitted job across the promoted set and acknowledge the
    /// submitter.
    ///
    /// One block per prince, in admission order, block index paired with
    /// iteration index. Princes whose sessions have closed silently receive
    /// nothing. The acknowledgment does not wait for delivery.
    fn dispatch_job(&self, submitter: SessionId, job_name: &str, file_size: f64, data: &str) {
        let job_id = new_job_id();
        info!(
            "Job \"{}\" received ({:.2} MB), id {}",
            job_name,
            file_size / (1024.0 * 1024.0),
            job_id
        );

        let num_blocks = self.princes.len().max(1);
        let blocks = sharding::divide(data, num_blocks);
        debug!("Dividing job {} into {} blocks", job_id, num_blocks);

        for (index, bee_id) in self.princes.iter().enumerate() {
            let Some(bee) = self.bees.get(bee_id) else {
                continue;
            };
            self.send_to(
                bee.session,
                QueenMessage::BlockAssignment {
                    job_id: job_id.clone(),
                    block_id: index,
                    total_blocks: num_blocks,
                    data: blocks[index].clone(),
                },
            );
            debug!("Assigned block {} of job {} to {}", index, job_id, bee_id);
        }

        self.send_to(
            submitter,
            QueenMessage::JobAck {
                job_id,
                status: JobStatus::Received,
            },
        );
    }

    /// Register an observer and push it the current state.
    fn subscribe_observer(&mut self, session: SessionId) {
        if self.kinds.contains_key(&session) {
            debug!("Observer request on classified session {} dropped", session);
            return;
        }
        self.kinds.insert(session, SessionKind::Observer);
        self.observers.insert(session);
        info!("Observer {} subscribed", session);
        self.broadcast_state();
    }

    /// Transport close or error: prune whatever the session was.
    fn disconnect(&mut self, session: SessionId) {
        self.sessions.remove(&session);
        match self.kinds.remove(&session) {
            Some(SessionKind::Observer) => {
                self.observers.remove(&session);
                debug!("Observer {} left", session);
            }
            Some(SessionKind::Bee(bee_id)) => self.remove_bee(&bee_id),
            None => debug!("Unclassified session {} closed", session),
        }
    }

    /// Delete a bee from the registry and promoted set, release its slot,
    /// and tell observers which cell emptied.
    fn remove_bee(&mut self, bee_id: &str) {
        let Some(bee) = self.bees.remove(bee_id) else {
            return;
        };
        self.princes.retain(|id| id != bee_id);
        self.grid.release(bee.coords);
        info!("Pruning: bee {} at {} disconnected", bee_id, bee.coords);

        let notice = QueenMessage::NodeRemoved {
            id: bee_id.to_string(),
            coords: bee.coords,
        };
        for &observer in &self.observers {
            self.send_to(observer, notice.clone());
        }
    }

    /// Drop a session's write half, which closes the socket without any
    /// further protocol exchange.
    fn close_session(&mut self, session: SessionId) {
        self.sessions.remove(&session);
        self.kinds.remove(&session);
    }

    /// Build the full observer snapshot.
    fn snapshot(&self) -> QueenMessage {
        let bees = self
            .bees
            .iter()
            .map(|(id, bee)| BeeSummary {
                id: id.clone(),
                coords: bee.coords,
                role: bee.role,
                pmi: bee.pmi,
                p2p_port: bee.p2p_port,
            })
            .collect();
        QueenMessage::HiveState {
            grid: self.grid.clone(),
            bee_count: self.bees.len(),
            bees,
        }
    }

    /// Push the full snapshot to every open observer session.
    fn broadcast_state(&self) {
        let snapshot = self.snapshot();
        for &observer in &self.observers {
            self.send_to(observer, snapshot.clone());
        }
    }

    /// Queue a message on a session if it is still open. Closed sessions
    /// are skipped; the disconnect handler prunes them later.
    fn send_to(&self, session: SessionId, message: QueenMessage) {
        if let Some(s) = self.sessions.get(&session) {
            if s.outbound.is_open() {
                s.outbound.send(message);
            }
        }
    }
}

impl Default for HiveMind {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a fresh job identifier.
fn new_job_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
