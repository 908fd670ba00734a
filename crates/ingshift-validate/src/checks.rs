//! Readiness checks
//!
//! Each check looks at one fact and grades it pass, warn or fail. The
//! overall grade is the worst individual grade.

use std::fmt::{self, Display, Formatter};

use ingshift_model::Target;
use serde::Serialize;

use crate::phase::ClusterFacts;

/// HTTPRoute to Ingress ratio below which coverage is a warning
pub const COVERAGE_THRESHOLD_PERCENT: usize = 80;

/// Grade of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Nothing to do
    #[default]
    Pass,
    /// Expected mid-migration or needs a follow-up
    Warn,
    /// Blocks the migration
    Fail,
}

impl CheckStatus {
    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

impl Display for CheckStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graded fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationCheck {
    /// Short title
    pub name: String,
    /// Grade
    pub status: CheckStatus,
    /// Explanation and remedy
    pub message: String,
}

impl ValidationCheck {
    fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }

    fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, message)
    }

    fn warn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, message)
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, message)
    }
}

/// Worst grade among `checks`; pass when empty
#[must_use]
pub fn overall(checks: &[ValidationCheck]) -> CheckStatus {
    checks.iter().map(|c| c.status).max().unwrap_or_default()
}

/// Grade every fact relevant to `target`
#[must_use]
pub fn checks(facts: &ClusterFacts, target: Target) -> Vec<ValidationCheck> {
    let mut checks = Vec::new();

    if facts.ingress_count > 0 {
        checks.push(ValidationCheck::pass(
            format!("Ingress resources detected ({} total)", facts.ingress_count),
            format!("{} Ingress objects found", facts.ingress_count),
        ));
    } else {
        checks.push(ValidationCheck::warn(
            "Ingress resources",
            "No Ingress resources found. Scan the cluster first.",
        ));
    }

    if facts.legacy_present {
        let location = facts
            .legacy_namespace
            .as_deref()
            .map(|ns| format!(" in '{ns}'"))
            .unwrap_or_default();
        checks.push(ValidationCheck::warn(
            "Ingress NGINX running",
            format!("Ingress NGINX running{location}. It still handles production traffic, which is expected during a parallel migration."),
        ));
    } else {
        checks.push(ValidationCheck::pass(
            "Ingress NGINX",
            "Ingress NGINX not detected. Either not installed or already removed.",
        ));
    }

    match target {
        Target::Traefik => traefik_checks(facts, &mut checks),
        Target::GatewayApi => gateway_checks(facts, &mut checks),
    }
    checks
}

fn controller_check(facts: &ClusterFacts, target: Target, install_hint: &str) -> ValidationCheck {
    let name = target.controller_name();
    if facts.target_ready {
        let version = facts.target_version.as_deref().unwrap_or("unknown version");
        let namespace = facts.target_namespace.as_deref().unwrap_or("an unknown namespace");
        ValidationCheck::pass(
            format!("{name} running ({version})"),
            format!("{name} {version} is running in {namespace}"),
        )
    } else {
        ValidationCheck::fail(name, format!("{name} not detected. Install: {install_hint}"))
    }
}

fn traefik_checks(facts: &ClusterFacts, checks: &mut Vec<ValidationCheck>) {
    checks.push(controller_check(
        facts,
        Target::Traefik,
        "helm install traefik traefik/traefik -n traefik --create-namespace",
    ));

    checks.push(if facts.target_crds_installed {
        ValidationCheck::pass(
            "Traefik CRDs installed",
            "traefik.io API group present; Middleware CRDs available",
        )
    } else {
        ValidationCheck::fail(
            "Traefik CRDs",
            "Traefik CRDs not found. The Traefik Helm chart registers them.",
        )
    });

    if facts.middleware_count > 0 {
        checks.push(ValidationCheck::pass(
            format!("Traefik Middlewares applied ({} found)", facts.middleware_count),
            format!("{} Middleware objects present", facts.middleware_count),
        ));
    } else if facts.target_crds_installed {
        checks.push(ValidationCheck::warn(
            "Traefik Middlewares",
            "No Middleware objects found. Apply the generated 02-middlewares/ files.",
        ));
    }

    let total = facts.ingress_count;
    let updated = facts.ingresses_updated.min(total);
    if total > 0 {
        let name = format!("Ingresses updated for Traefik ({updated}/{total})");
        checks.push(if updated == total {
            ValidationCheck::pass(name, "Every Ingress carries the router.middlewares annotation.")
        } else if updated > 0 {
            ValidationCheck::warn(
                name,
                format!("{updated} of {total} Ingresses updated. Apply the remaining files from 03-ingresses/."),
            )
        } else {
            ValidationCheck::warn(
                name,
                "No Ingress carries Traefik annotations yet. Apply the files from 03-ingresses/.",
            )
        });
    }
}

fn gateway_checks(facts: &ClusterFacts, checks: &mut Vec<ValidationCheck>) {
    checks.push(controller_check(
        facts,
        Target::GatewayApi,
        "helm install eg oci://docker.io/envoyproxy/gateway-helm -n envoy-gateway-system --create-namespace",
    ));

    checks.push(if facts.target_crds_installed {
        ValidationCheck::pass(
            "Gateway API CRDs installed",
            "gateway.networking.k8s.io API group present; HTTPRoute, Gateway and ReferenceGrant available",
        )
    } else {
        ValidationCheck::fail(
            "Gateway API CRDs",
            "Gateway API CRDs not found. Run 01-install-gateway-api-crds/install.sh.",
        )
    });

    if facts.httproute_count > 0 {
        checks.push(ValidationCheck::pass(
            format!("HTTPRoutes applied ({} found)", facts.httproute_count),
            format!("{} HTTPRoute objects present", facts.httproute_count),
        ));
    } else if facts.target_crds_installed {
        checks.push(ValidationCheck::warn(
            "HTTPRoutes",
            "No HTTPRoute objects found. Apply the generated 04-httproutes/ files.",
        ));
    }

    if facts.ingress_count > 0 && facts.httproute_count > 0 {
        let coverage = facts.httproute_count * 100 / facts.ingress_count;
        let message = format!(
            "{} HTTPRoutes cover {} Ingresses ({coverage}% coverage)",
            facts.httproute_count, facts.ingress_count
        );
        checks.push(if coverage < COVERAGE_THRESHOLD_PERCENT {
            ValidationCheck::warn(
                "HTTPRoute coverage",
                format!("{message}; some Ingresses may not have an HTTPRoute yet"),
            )
        } else {
            ValidationCheck::pass("HTTPRoute coverage", message)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_name<'a>(checks: &'a [ValidationCheck], prefix: &str) -> &'a ValidationCheck {
        checks.iter().find(|c| c.name.starts_with(prefix)).unwrap()
    }

    #[test]
    fn overall_is_worst() {
        let checks = vec![
            ValidationCheck::pass("a", ""),
            ValidationCheck::warn("b", ""),
            ValidationCheck::pass("c", ""),
        ];
        assert_eq!(overall(&checks), CheckStatus::Warn);
        assert_eq!(overall(&[]), CheckStatus::Pass);
    }

    #[test]
    fn missing_controller_fails() {
        let checks = checks(&ClusterFacts::default(), Target::GatewayApi);
        assert_eq!(by_name(&checks, "Envoy Gateway").status, CheckStatus::Fail);
        assert_eq!(by_name(&checks, "Gateway API CRDs").status, CheckStatus::Fail);
        assert_eq!(overall(&checks), CheckStatus::Fail);
    }

    #[test]
    fn coverage_threshold() {
        let facts = ClusterFacts {
            ingress_count: 10,
            httproute_count: 7,
            target_ready: true,
            target_crds_installed: true,
            ..ClusterFacts::default()
        };
        let low = checks(&facts, Target::GatewayApi);
        assert_eq!(by_name(&low, "HTTPRoute coverage").status, CheckStatus::Warn);

        let full = checks(
            &ClusterFacts {
                httproute_count: 8,
                ..facts
            },
            Target::GatewayApi,
        );
        assert_eq!(by_name(&full, "HTTPRoute coverage").status, CheckStatus::Pass);
        assert_eq!(overall(&full), CheckStatus::Pass);
    }

    #[test]
    fn traefik_ingress_progress() {
        let facts = ClusterFacts {
            ingress_count: 4,
            ingresses_updated: 1,
            target_ready: true,
            target_crds_installed: true,
            middleware_count: 3,
            target_version: Some("v3.2.0".into()),
            ..ClusterFacts::default()
        };
        let checks = checks(&facts, Target::Traefik);
        let progress = by_name(&checks, "Ingresses updated");
        assert_eq!(progress.name, "Ingresses updated for Traefik (1/4)");
        assert_eq!(progress.status, CheckStatus::Warn);
        assert_eq!(by_name(&checks, "Traefik running").name, "Traefik running (v3.2.0)");
    }

    #[test]
    fn no_middleware_check_without_crds() {
        let checks = checks(&ClusterFacts::default(), Target::Traefik);
        assert!(checks.iter().all(|c| !c.name.starts_with("Traefik Middlewares")));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CheckStatus::Warn).unwrap(), "\"warn\"");
    }
}
