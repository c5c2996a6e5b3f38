//! UDP presence beacon.
//!
//! Broadcasts the queen's reachable address on the hive port so bees can
//! discover the coordinator without configuration. Produce-only: the queen
//! never listens for beacons, and the rest of the coordinator does not
//! consume them either.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gridbee_protocol::DiscoveryMessage;
use tokio::net::UdpSocket;
use tracing::{info, warn};

use crate::error::Result;

/// Broadcasts the queen's presence on a fixed period.
pub struct DiscoveryBeacon {
    advertise_ip: IpAddr,
    hive_port: u16,
    interval: Duration,
}

impl DiscoveryBeacon {
    /// Create a beacon advertising the given address and hive port.
    pub fn new(advertise_ip: IpAddr, hive_port: u16, interval: Duration) -> Self {
        Self {
            advertise_ip,
            hive_port,
            interval,
        }
    }

    /// Broadcast loop. Send failures are logged and the loop keeps going;
    /// a missed beacon only delays discovery.
    pub async fn run(self) -> Result<()> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_broadcast(true)?;
        let target = SocketAddr::from((Ipv4Addr::BROADCAST, self.hive_port));

        info!("UDP beacon active on port {}", self.hive_port);

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            let payload = DiscoveryMessage::Beacon {
                queen_ip: self.advertise_ip.to_string(),
                hive_port: self.hive_port,
                hive_version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: unix_millis(),
            };
            match serde_json::to_string(&payload) {
                Ok(json) => {
                    if let Err(err) = socket.send_to(json.as_bytes(), target).await {
                        warn!("Beacon send failed: {}", err);
                    }
                }
                Err(err) => warn!("Beacon encode failed: {}", err),
            }
        }
    }
}

/// Milliseconds since the epoch, for beacon timestamps.
fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Best-effort detection of the local address peers would reach us on.
///
/// Opens a UDP socket toward a public address and reads the local address
/// the OS picked for the route; no packets are sent. Falls back to
/// loopback when the host has no route.
pub fn detect_local_ip() -> IpAddr {
    let fallback = IpAddr::V4(Ipv4Addr::LOCALHOST);
    let Ok(socket) = std::net::UdpSocket::bind("0.0.0.0:0") else {
        return fallback;
    };
    if socket.connect("8.8.8.8:80").is_err() {
        return fallback;
    }
    socket.local_addr().map(|addr| addr.ip()).unwrap_or(fallback)
}
