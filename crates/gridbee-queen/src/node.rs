//! Queen Node - the coordinator entry point.
//!
//! Architecture:
//! - Single daemon process; all hive state lives in one [`HiveMind`]
//!   owned by one event loop task
//! - WebSocket ingress for bees, observers, and job submitters
//! - Dashboard HTTP server for the visualization frontend
//! - UDP presence beacon for zero-config discovery

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::beacon::{detect_local_ip, DiscoveryBeacon};
use crate::error::Result;
use crate::hive::HiveMind;
use crate::server::{dashboard_router, hive_router, AppState};

/// Interval between APPEND_ENTRIES heartbeats to princes.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a queen node.
#[derive(Debug, Clone)]
pub struct QueenConfig {
    /// WebSocket listen port for bees and observers. Also the port the
    /// beacon broadcasts to.
    pub hive_port: u16,

    /// Dashboard HTTP listen port.
    pub dashboard_port: u16,

    /// Directory the dashboard frontend is served from.
    pub dashboard_dir: PathBuf,

    /// Period of the UDP presence beacon.
    pub beacon_interval: Duration,

    /// Address advertised in the beacon; autodetected when unset.
    pub advertise_ip: Option<IpAddr>,
}

impl Default for QueenConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl QueenConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let hive_port = std::env::var("HIVE_PORT")
            .unwrap_or_else(|_| "41234".to_string())
            .parse()
            .expect("Invalid HIVE_PORT");

        let dashboard_port = std::env::var("HIVE_DASHBOARD_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .expect("Invalid HIVE_DASHBOARD_PORT");

        let dashboard_dir = std::env::var("HIVE_DASHBOARD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public"));

        let beacon_interval = std::env::var("HIVE_BEACON_INTERVAL_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map(Duration::from_millis)
            .expect("Invalid HIVE_BEACON_INTERVAL_MS");

        let advertise_ip = std::env::var("HIVE_ADVERTISE_IP")
            .ok()
            .map(|value| value.parse().expect("Invalid HIVE_ADVERTISE_IP"));

        Self {
            hive_port,
            dashboard_port,
            dashboard_dir,
            beacon_interval,
            advertise_ip,
        }
    }
}

/// A queen node instance.
pub struct QueenNode {
    config: QueenConfig,
}

impl QueenNode {
    /// Create a new queen node.
    pub fn new(config: QueenConfig) -> Self {
        Self { config }
    }

    /// Run the coordinator: WebSocket ingress, dashboard server, discovery
    /// beacon, and the event loop that owns all hive state.
    pub async fn run(self) -> Result<()> {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let state = AppState::new(events_tx.clone());

        info!("Queen node starting");
        info!("  Hive:      ws://0.0.0.0:{}", self.config.hive_port);
        info!("  Dashboard: http://0.0.0.0:{}", self.config.dashboard_port);
        info!("  Frontend:  {:?}", self.config.dashboard_dir);

        // WebSocket ingress for bees, observers, and submitters
        let hive_addr = SocketAddr::from(([0, 0, 0, 0], self.config.hive_port));
        let hive_listener = tokio::net::TcpListener::bind(hive_addr).await?;
        let hive_app =
            hive_router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            if let Err(err) = axum::serve(hive_listener, hive_app).await {
                error!("Hive server error: {}", err);
            }
        });

        // Dashboard static frontend + status API
        let dashboard_addr = SocketAddr::from(([0, 0, 0, 0], self.config.dashboard_port));
        let dashboard_listener = tokio::net::TcpListener::bind(dashboard_addr).await?;
        let dashboard_app = dashboard_router(state, self.config.dashboard_dir.clone());
        tokio::spawn(async move {
            if let Err(err) = axum::serve(dashboard_listener, dashboard_app).await {
                error!("Dashboard server error: {}", err);
            }
        });

        // UDP presence beacon
        let advertise_ip = self.config.advertise_ip.unwrap_or_else(detect_local_ip);
        let beacon = DiscoveryBeacon::new(
            advertise_ip,
            self.config.hive_port,
            self.config.beacon_interval,
        );
        tokio::spawn(async move {
            if let Err(err) = beacon.run().await {
                error!("Beacon error: {}", err);
            }
        });

        // The coordinator loop: sole owner of hive state. Session tasks
        // and the status endpoint reach it through the event channel; the
        // heartbeat timer is interleaved on the same loop, so no operation
        // here ever races another.
        drop(events_tx);
        let mut hive = HiveMind::new();
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        loop {
            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(event) => hive.apply(event),
                    // Every sender is gone: the servers are down
                    None => break,
                },
                _ = heartbeat.tick() => hive.heartbeat_tick(),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_wire_constants() {
        // Scoped to the known variables; the test environment does not set them
        let config = QueenConfig::from_env();
        assert_eq!(config.hive_port, 41234);
        assert_eq!(config.dashboard_port, 3000);
        assert_eq!(config.beacon_interval, Duration::from_millis(2000));
        assert_eq!(config.advertise_ip, None);
    }
}
