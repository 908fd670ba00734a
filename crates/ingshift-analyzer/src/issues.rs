//! Per-route issue summaries
//!
//! Joins each partial or unsupported mapping with its remediation guide so a
//! reader gets what the annotation did, how to replace it, and which
//! generated file to look at.

use ingshift_knowledge::{category_for_construct, KnowledgeBase};
use ingshift_model::{ArtifactCategory, CompatibilityStatus, OverallStatus, Target};
use serde::Serialize;

use crate::report::{FleetCompatibilityReport, RouteCompatibilityReport};

/// One annotation that needs attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationIssue {
    /// Short annotation key
    pub key: String,
    /// Value on the route
    pub value: String,
    /// Partial or unsupported
    pub status: CompatibilityStatus,
    /// Target construct label
    pub target_construct: String,
    /// Generated file category holding the replacement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_category: Option<ArtifactCategory>,
    /// Table note
    pub note: String,
    /// What the annotation does; the note when no guide exists
    pub what: String,
    /// How to replace it; the note when no guide exists
    pub fix: String,
    /// Example manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Upstream docs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_link: Option<String>,
    /// Impact if left unmigrated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
    /// Upstream tracking issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<String>,
}

/// Issues of one route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIssueSummary {
    /// Route namespace
    pub namespace: String,
    /// Route name
    pub name: String,
    /// Aggregate status
    pub overall_status: OverallStatus,
    /// Annotations needing attention, in report order
    pub issues: Vec<AnnotationIssue>,
}

/// Enrich a route report's partial and unsupported mappings with guides
#[must_use]
pub fn issues(report: &RouteCompatibilityReport, target: Target) -> RouteIssueSummary {
    let kb = KnowledgeBase::global();
    let issues = report
        .attention()
        .map(|m| {
            let guide = kb.guide(target, &m.key);
            let owned = |s: Option<&'static str>| s.map(str::to_string);
            AnnotationIssue {
                key: m.key.clone(),
                value: m.value.clone(),
                status: m.status,
                target_construct: m.target_construct.clone(),
                file_category: category_for_construct(&m.target_construct),
                note: m.note.clone(),
                what: guide.map_or_else(|| m.note.clone(), |g| g.what.to_string()),
                fix: guide.map_or_else(|| m.note.clone(), |g| g.fix.to_string()),
                example: owned(guide.and_then(|g| g.example)),
                docs_link: owned(guide.and_then(|g| g.docs_link)),
                consequence: owned(guide.and_then(|g| g.consequence)),
                issue_url: owned(guide.and_then(|g| g.issue_url)),
            }
        })
        .collect();

    RouteIssueSummary {
        namespace: report.namespace.clone(),
        name: report.name.clone(),
        overall_status: report.overall_status,
        issues,
    }
}

/// Issue summaries for every route of a fleet report
#[must_use]
pub fn fleet_issues(report: &FleetCompatibilityReport) -> Vec<RouteIssueSummary> {
    report
        .routes
        .iter()
        .map(|r| issues(r, report.target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use ingshift_model::Route;

    #[test]
    fn guide_text_joined() {
        let route = Route::new("shop", "checkout").with_nginx("limit-rps", "50");
        let summary = issues(&classify(&route, Target::GatewayApi), Target::GatewayApi);
        assert_eq!(summary.issues.len(), 1);
        let issue = &summary.issues[0];
        assert_eq!(issue.file_category, Some(ArtifactCategory::Policy));
        assert!(issue.fix.contains("BackendTrafficPolicy"));
        assert!(issue.docs_link.is_some());
    }

    #[test]
    fn note_fallback_without_guide() {
        let route = Route::new("shop", "checkout").with_nginx("cors-max-age", "600");
        let summary = issues(&classify(&route, Target::GatewayApi), Target::GatewayApi);
        let issue = &summary.issues[0];
        assert_eq!(issue.what, issue.note);
        assert_eq!(issue.fix, issue.note);
        assert_eq!(issue.example, None);
    }

    #[test]
    fn supported_mappings_excluded() {
        let route = Route::new("shop", "checkout").with_nginx("ssl-redirect", "true");
        let summary = issues(&classify(&route, Target::Traefik), Target::Traefik);
        assert!(summary.issues.is_empty());
        assert_eq!(summary.overall_status, OverallStatus::Ready);
    }

    #[test]
    fn unsupported_carries_issue_url() {
        let route = Route::new("a", "b").with_nginx("session-cookie-change-on-failure", "true");
        let summary = issues(&classify(&route, Target::Traefik), Target::Traefik);
        assert_eq!(
            summary.issues[0].issue_url.as_deref(),
            Some("https://github.com/traefik/traefik/issues/1299")
        );
        assert_eq!(summary.issues[0].file_category, None);
    }
}
