//! Compatibility report types

use ingshift_model::{CompatibilityStatus, OverallStatus, Target};
use serde::Serialize;

/// How one annotation on one route translates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMapping {
    /// Short annotation key
    pub key: String,
    /// Annotation value as found on the route
    pub value: String,
    /// Verdict
    pub status: CompatibilityStatus,
    /// Target construct; empty when there is none
    pub target_construct: String,
    /// Short explanation
    pub note: String,
}

/// Compatibility of one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCompatibilityReport {
    /// Route namespace
    pub namespace: String,
    /// Route name
    pub name: String,
    /// Mappings, unsupported first, then partial, then supported
    pub mappings: Vec<AnnotationMapping>,
    /// Aggregate status
    pub overall_status: OverallStatus,
}

impl RouteCompatibilityReport {
    /// Mappings that need attention
    pub fn attention(&self) -> impl Iterator<Item = &AnnotationMapping> {
        self.mappings.iter().filter(|m| m.status.needs_attention())
    }

    /// Mapping for `key`, if the route carries it
    #[must_use]
    pub fn mapping(&self, key: &str) -> Option<&AnnotationMapping> {
        self.mappings.iter().find(|m| m.key == key)
    }
}

/// Aggregate counts across a fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    /// Routes analyzed
    pub total: usize,
    /// Routes with status ready
    pub fully_compatible: usize,
    /// Routes with status workaround
    pub needs_workaround: usize,
    /// Routes with status breaking
    pub has_unsupported: usize,
}

impl FleetSummary {
    pub(crate) fn record(&mut self, status: OverallStatus) {
        self.total += 1;
        match status {
            OverallStatus::Ready => self.fully_compatible += 1,
            OverallStatus::Workaround => self.needs_workaround += 1,
            OverallStatus::Breaking => self.has_unsupported += 1,
        }
    }
}

/// Compatibility of every route against one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCompatibilityReport {
    /// Target analyzed against
    pub target: Target,
    /// Per-route reports in input order
    pub routes: Vec<RouteCompatibilityReport>,
    /// Aggregate counts
    pub summary: FleetSummary,
}

impl FleetCompatibilityReport {
    /// Report for `namespace/name`
    #[must_use]
    pub fn route(&self, namespace: &str, name: &str) -> Option<&RouteCompatibilityReport> {
        self.routes
            .iter()
            .find(|r| r.namespace == namespace && r.name == name)
    }
}
