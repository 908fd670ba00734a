//! Migration phase deriver
//!
//! Classifies live migration progress from a handful of cluster facts and
//! attaches the remediation checklist for that phase. Pure classification;
//! nothing here acts on the cluster.

pub mod checklist;
pub mod checks;
pub mod phase;

pub use checklist::checklist;
pub use checks::{checks, overall, CheckStatus, ValidationCheck, COVERAGE_THRESHOLD_PERCENT};
pub use phase::{derive_phase, ClusterFacts, MigrationPhase};

use ingshift_model::Target;
use serde::Serialize;

/// Phase, checklist and graded checks for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Target being migrated to
    pub target: Target,
    /// Derived phase
    pub phase: MigrationPhase,
    /// Human readable phase description
    pub phase_description: String,
    /// Next steps
    pub checklist: Vec<String>,
    /// Individual checks
    pub checks: Vec<ValidationCheck>,
    /// Worst check grade
    pub overall: CheckStatus,
}

/// Derive the phase for `facts` and assemble the full report
#[must_use]
pub fn derive_validation_phase(facts: &ClusterFacts, target: Target) -> ValidationReport {
    let phase = facts.phase();
    let checks = checks(facts, target);
    let overall = overall(&checks);
    tracing::debug!("Derived phase {} for {} with overall {}", phase, target, overall);
    ValidationReport {
        target,
        phase,
        phase_description: phase.description().to_string(),
        checklist: checklist(phase, target, facts),
        checks,
        overall,
    }
}
