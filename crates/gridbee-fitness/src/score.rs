//! The PMI formula and the metrics record it consumes.

use serde::{Deserialize, Deserializer, Serialize};

/// Weight of the VRAM component.
pub const VRAM_WEIGHT: f64 = 0.7;

/// Weight of the idle-CPU component.
pub const CPU_WEIGHT: f64 = 0.3;

/// Penalty multiplier for network jitter.
pub const JITTER_PENALTY: f64 = 0.5;

/// VRAM megabytes are scaled down before weighting.
pub const VRAM_SCALE: f64 = 0.01;

/// Resource metrics reported by a bee in handshakes and heartbeats.
///
/// Field names match the wire (`vramFree`, `ramFree`, `cpuIdle`, `jitter`).
/// Absent fields default to zero, and a malformed numeric value is coerced
/// to zero rather than rejecting the whole message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metrics {
    /// Free VRAM in megabytes.
    #[serde(deserialize_with = "lenient_f64")]
    pub vram_free: f64,
    /// Free system RAM in megabytes. Reported but not scored.
    #[serde(deserialize_with = "lenient_f64")]
    pub ram_free: f64,
    /// Idle CPU percentage (0-100).
    #[serde(deserialize_with = "lenient_f64")]
    pub cpu_idle: f64,
    /// Network jitter in milliseconds.
    #[serde(deserialize_with = "lenient_f64")]
    pub jitter: f64,
}

/// Compute the performance metric index for a set of reported metrics.
///
/// `pmi = 0.7 * (vramFree * 0.01) + 0.3 * cpuIdle - 0.5 * jitter`
///
/// Pure and reproducible byte-for-byte; no side effects, no failure modes.
pub fn pmi(metrics: &Metrics) -> f64 {
    VRAM_WEIGHT * (metrics.vram_free * VRAM_SCALE) + CPU_WEIGHT * metrics.cpu_idle
        - JITTER_PENALTY * metrics.jitter
}

/// Accept any JSON value in a numeric slot, coercing non-numbers to zero.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(0.0))
}
