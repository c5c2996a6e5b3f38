//! PMI Scoring and Role Classification
//!
//! Every bee that joins the hive reports resource metrics, which collapse to
//! a single scalar: the performance metric index (PMI). The PMI decides the
//! bee's role once, at admission.
//!
//! # Determinism
//!
//! Role assignment must be reproducible across coordinator restarts and
//! implementations, so scoring is a pure function with fixed weights and no
//! environment input. Scoring the same metrics twice yields the same PMI
//! and, applied independently, the same role.
//!
//! # Stickiness
//!
//! The role is derived from the PMI at admission and never re-evaluated.
//! Later heartbeats refresh the stored score, but a WORKER whose metrics
//! drift above the threshold stays a WORKER.

mod role;
mod score;

pub use role::{role_for, Role, PROMOTION_THRESHOLD};
pub use score::{pmi, Metrics, CPU_WEIGHT, JITTER_PENALTY, VRAM_SCALE, VRAM_WEIGHT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_and_classification_compose() {
        let strong = Metrics {
            vram_free: 8000.0,
            ram_free: 16000.0,
            cpu_idle: 90.0,
            jitter: 0.0,
        };
        // 0.7 * 80 + 0.3 * 90 = 83
        assert_eq!(role_for(pmi(&strong)), Role::Prince);

        let weak = Metrics {
            vram_free: 100.0,
            ram_free: 512.0,
            cpu_idle: 10.0,
            jitter: 5.0,
        };
        // 0.7 * 1 + 0.3 * 10 - 0.5 * 5 = 1.2
        assert_eq!(role_for(pmi(&weak)), Role::Worker);
    }
}
