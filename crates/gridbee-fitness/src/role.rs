//! Role classification.

use serde::{Deserialize, Serialize};

/// PMI above which a joining bee is promoted.
pub const PROMOTION_THRESHOLD: f64 = 20.0;

/// Role assigned to a bee at admission.
///
/// Serialized as the wire strings `WORKER`, `PRINCE`, `LEAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Ordinary compute node.
    Worker,
    /// Promoted node: receives heartbeats and job blocks.
    Prince,
    /// A prince acting as the recipient of a dispatched block. Wire
    /// vocabulary only; the coordinator never records this role.
    Lead,
}

impl Role {
    /// Whether this role belongs to the promoted set.
    pub fn is_promoted(self) -> bool {
        matches!(self, Role::Prince)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Worker => "WORKER",
            Role::Prince => "PRINCE",
            Role::Lead => "LEAD",
        };
        f.write_str(name)
    }
}

/// Derive the admission role for a PMI.
///
/// Strictly greater than the threshold is required: a PMI of exactly 20
/// stays WORKER.
pub fn role_for(pmi: f64) -> Role {
    if pmi > PROMOTION_THRESHOLD {
        Role::Prince
    } else {
        Role::Worker
    }
}
