//! Migration phases and the facts they are derived from

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Where a live migration stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationPhase {
    /// Legacy controller carries all traffic; target not ready
    Pre,
    /// Both controllers run side by side
    Parallel,
    /// Target controller alone
    Post,
}

impl MigrationPhase {
    /// Every phase
    pub const ALL: [MigrationPhase; 3] = [Self::Pre, Self::Parallel, Self::Post];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Parallel => "parallel",
            Self::Post => "post",
        }
    }

    /// One-sentence description of the phase
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pre => "NGINX is handling all traffic. The target controller is not ready yet.",
            Self::Parallel => {
                "NGINX and the target controller are both running. Traffic can move over without downtime."
            }
            Self::Post => "The target controller is active and NGINX has been removed.",
        }
    }
}

impl Display for MigrationPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed cluster state, gathered by a scanner outside this crate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterFacts {
    /// Ingress objects in scope
    pub ingress_count: usize,
    /// ingress-nginx controller detected
    pub legacy_present: bool,
    /// Namespace of the ingress-nginx controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_namespace: Option<String>,
    /// Target controller has a running pod
    pub target_ready: bool,
    /// Namespace of the target controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,
    /// Image tag of the target controller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
    /// Target API group registered
    pub target_crds_installed: bool,
    /// Traefik Middleware objects found
    pub middleware_count: usize,
    /// HTTPRoute objects found
    pub httproute_count: usize,
    /// Ingresses already carrying the Traefik middleware annotation
    pub ingresses_updated: usize,
}

impl ClusterFacts {
    /// Facts with only the two controller flags set
    #[must_use]
    pub fn controllers(legacy_present: bool, target_ready: bool) -> Self {
        Self {
            legacy_present,
            target_ready,
            ..Self::default()
        }
    }

    /// Phase implied by these facts
    #[inline]
    #[must_use]
    pub fn phase(&self) -> MigrationPhase {
        derive_phase(self.legacy_present, self.target_ready)
    }
}

/// Phase from the two controller facts
#[must_use]
pub const fn derive_phase(legacy_present: bool, target_ready: bool) -> MigrationPhase {
    match (legacy_present, target_ready) {
        (_, false) => MigrationPhase::Pre,
        (true, true) => MigrationPhase::Parallel,
        (false, true) => MigrationPhase::Post,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_table() {
        assert_eq!(derive_phase(false, false), MigrationPhase::Pre);
        assert_eq!(derive_phase(true, false), MigrationPhase::Pre);
        assert_eq!(derive_phase(true, true), MigrationPhase::Parallel);
        assert_eq!(derive_phase(false, true), MigrationPhase::Post);
    }

    #[test]
    fn facts_deserialize_with_defaults() {
        let facts: ClusterFacts = serde_json::from_str(r#"{"legacyPresent": true, "ingressCount": 4}"#).unwrap();
        assert_eq!(facts.ingress_count, 4);
        assert!(!facts.target_ready);
        assert_eq!(facts.phase(), MigrationPhase::Pre);
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MigrationPhase::Parallel).unwrap(), "\"parallel\"");
    }
}
