//! Knowledge base record types

use ingshift_model::{ArtifactCategory, CompatibilityStatus};
use serde::Serialize;

/// Note attached to annotations that no table knows about
pub const UNKNOWN_NOTE: &str = "Unknown annotation, manual review required";

/// Verdict for one (target, annotation) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityEntry {
    /// How well the annotation carries over
    pub status: CompatibilityStatus,
    /// Target construct implementing it; empty when there is none
    pub target_construct: &'static str,
    /// Short explanation
    pub note: &'static str,
}

impl CompatibilityEntry {
    pub(crate) const fn new(
        status: CompatibilityStatus,
        target_construct: &'static str,
        note: &'static str,
    ) -> Self {
        Self {
            status,
            target_construct,
            note,
        }
    }

    /// Sentinel returned for annotations missing from a table
    #[inline]
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(CompatibilityStatus::Unsupported, "", UNKNOWN_NOTE)
    }

    /// Whether this is the unknown-annotation sentinel
    #[inline]
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.target_construct.is_empty() && self.note == UNKNOWN_NOTE
    }

    /// Artifact category that implements the construct, if any
    #[must_use]
    pub fn artifact_category(&self) -> Option<ArtifactCategory> {
        category_for_construct(self.target_construct)
    }
}

/// Map a target construct label to the generated artifact category holding it
#[must_use]
pub fn category_for_construct(label: &str) -> Option<ArtifactCategory> {
    let label = label.to_ascii_lowercase();
    let has = |needle: &str| label.contains(needle);

    if has("middleware") || has("serverstransport") {
        Some(ArtifactCategory::Middleware)
    } else if has("httproute")
        || has("urlrewrite")
        || has("requestredirect")
        || has("grpcroute")
        || has("tlsroute")
    {
        Some(ArtifactCategory::HttpRoute)
    } else if has("policy") {
        Some(ArtifactCategory::Policy)
    } else if has("gateway") {
        Some(ArtifactCategory::Gateway)
    } else if has("service") || has("sticky") || has("router") || has("ingress") {
        Some(ArtifactCategory::Ingress)
    } else {
        None
    }
}

/// Actionable remediation for a partial or unsupported annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationGuide {
    /// What the annotation does
    pub what: &'static str,
    /// Steps to reproduce it on the target
    pub fix: &'static str,
    /// Example manifest or command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
    /// Upstream documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_link: Option<&'static str>,
    /// What breaks if the annotation is not migrated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consequence: Option<&'static str>,
    /// Upstream tracking issue for missing features
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<&'static str>,
}

impl AnnotationGuide {
    pub(crate) const fn new(what: &'static str, fix: &'static str) -> Self {
        Self {
            what,
            fix,
            example: None,
            docs_link: None,
            consequence: None,
            issue_url: None,
        }
    }

    pub(crate) const fn example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    pub(crate) const fn docs(mut self, link: &'static str) -> Self {
        self.docs_link = Some(link);
        self
    }

    pub(crate) const fn consequence(mut self, consequence: &'static str) -> Self {
        self.consequence = Some(consequence);
        self
    }

    pub(crate) const fn issue(mut self, url: &'static str) -> Self {
        self.issue_url = Some(url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_categories() {
        let cases = [
            ("Middleware (RateLimit)", Some(ArtifactCategory::Middleware)),
            ("ServersTransport CRD", Some(ArtifactCategory::Middleware)),
            ("HTTPRoute (timeouts)", Some(ArtifactCategory::HttpRoute)),
            ("GRPCRoute", Some(ArtifactCategory::HttpRoute)),
            ("BackendTrafficPolicy (RateLimit)", Some(ArtifactCategory::Policy)),
            ("Gateway TLS config", Some(ArtifactCategory::Gateway)),
            ("Service sticky annotation", Some(ArtifactCategory::Ingress)),
            ("Native", None),
            ("", None),
        ];
        for (label, expected) in cases {
            assert_eq!(category_for_construct(label), expected, "{label}");
        }
    }

    #[test]
    fn unknown_sentinel() {
        let entry = CompatibilityEntry::unknown();
        assert!(entry.is_unknown());
        assert_eq!(entry.status, CompatibilityStatus::Unsupported);
        assert_eq!(entry.artifact_category(), None);
    }
}
