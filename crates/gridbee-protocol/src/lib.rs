//! Gridbee Wire Protocol
//!
//! The closed set of JSON messages exchanged over the hive's persistent
//! WebSocket connections, plus the UDP discovery beacon payload.
//!
//! Every message is an object tagged by a `type` field. Representing the
//! vocabulary as tagged enums keeps message handling an exhaustible match:
//! anything that fails to parse, including an unknown `type`, lands in a
//! single drop-and-log arm instead of being probed field by field.
//!
//! # Directions
//!
//! - Bee/submitter → queen: [`BeeMessage`]
//! - Queen → bee or observer: [`QueenMessage`]
//! - Queen → broadcast UDP: [`DiscoveryMessage`]

mod discovery;
mod message;

pub use discovery::DiscoveryMessage;
pub use message::{
    AckStatus, BeeMessage, BeeSummary, ConnectionInfo, HiveState, JobStatus, QueenMessage,
};
