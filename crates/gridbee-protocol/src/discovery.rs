//! Discovery beacon payload.

use serde::{Deserialize, Serialize};

/// Connectionless presence announcement, broadcast over UDP so bees can
/// find the queen without configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DiscoveryMessage {
    #[serde(rename = "BEACON", rename_all = "camelCase")]
    Beacon {
        queen_ip: String,
        hive_port: u16,
        hive_version: String,
        /// Milliseconds since the epoch.
        timestamp: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn beacon_wire_shape() {
        let beacon = DiscoveryMessage::Beacon {
            queen_ip: "192.168.1.10".into(),
            hive_port: 41234,
            hive_version: "0.1.0-alpha".into(),
            timestamp: 1700000000000,
        };
        let value = serde_json::to_value(&beacon).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "BEACON",
                "queenIp": "192.168.1.10",
                "hivePort": 41234,
                "hiveVersion": "0.1.0-alpha",
                "timestamp": 1700000000000u64
            })
        );
    }

    #[test]
    fn beacon_round_trips() {
        let raw = r#"{"type":"BEACON","queenIp":"10.0.0.5","hivePort":41234,"hiveVersion":"0.1.0-alpha","timestamp":1}"#;
        let parsed: DiscoveryMessage = serde_json::from_str(raw).unwrap();
        let DiscoveryMessage::Beacon { queen_ip, .. } = parsed;
        assert_eq!(queen_ip, "10.0.0.5");
    }
}
