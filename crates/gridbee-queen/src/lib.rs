//! Gridbee Queen - Hive Coordinator
//!
//! The single authority for a small fleet of compute bees: admits them onto
//! a bounded 10×10 grid, classifies them by PMI, wires up a local neighbor
//! mesh, pushes periodic state to promoted bees, shards submitted jobs
//! across the promoted set, and streams snapshots to dashboard observers.
//!
//! # Architecture
//!
//! - **Hive**: the [`HiveMind`] aggregate, owned by one event loop
//! - **Session**: stable session ids and the socket/loop channel plumbing
//! - **Server**: axum WebSocket ingress and the dashboard HTTP server
//! - **Sharding**: contiguous payload division
//! - **Beacon**: UDP presence broadcast for discovery
//!
//! # Example
//!
//! ```no_run
//! use gridbee_queen::{QueenConfig, QueenNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = QueenConfig::default();
//!     let node = QueenNode::new(config);
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod beacon;
pub mod error;
pub mod hive;
pub mod node;
pub mod server;
pub mod session;
pub mod sharding;

pub use error::{Error, Result};
pub use hive::{Bee, HiveMind, HEARTBEAT_TERM, LEADER_ID};
pub use node::{QueenConfig, QueenNode, HEARTBEAT_INTERVAL};
pub use session::{HiveEvent, HiveStatus, Outbound, SessionId, SessionKind};
