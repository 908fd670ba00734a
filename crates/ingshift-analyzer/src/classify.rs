//! Route and fleet classification

use ingshift_knowledge::KnowledgeBase;
use ingshift_model::{OverallStatus, Route, Target};

use crate::report::{AnnotationMapping, FleetCompatibilityReport, FleetSummary, RouteCompatibilityReport};

/// Classify one route's legacy annotations against `target`
#[must_use]
pub fn classify(route: &Route, target: Target) -> RouteCompatibilityReport {
    classify_with(KnowledgeBase::global(), route, target)
}

/// Classify against an explicit knowledge base
#[must_use]
pub fn classify_with(kb: &KnowledgeBase, route: &Route, target: Target) -> RouteCompatibilityReport {
    let mut mappings: Vec<AnnotationMapping> = route
        .nginx_annotations
        .iter()
        .map(|(key, value)| {
            let entry = kb.lookup(target, key);
            AnnotationMapping {
                key: key.clone(),
                value: value.clone(),
                status: entry.status,
                target_construct: entry.target_construct.to_string(),
                note: entry.note.to_string(),
            }
        })
        .collect();
    mappings.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.key.cmp(&b.key))
    });

    let overall_status = OverallStatus::from_statuses(mappings.iter().map(|m| m.status));
    tracing::debug!(
        "Classified {} for {}: {} annotations, {}",
        route.qualified_name(),
        target,
        mappings.len(),
        overall_status
    );

    RouteCompatibilityReport {
        namespace: route.namespace.clone(),
        name: route.name.clone(),
        mappings,
        overall_status,
    }
}

/// Classify every route and accumulate counts
#[must_use]
pub fn classify_fleet(routes: &[Route], target: Target) -> FleetCompatibilityReport {
    let kb = KnowledgeBase::global();
    let mut summary = FleetSummary::default();
    let reports: Vec<_> = routes
        .iter()
        .map(|route| {
            let report = classify_with(kb, route, target);
            summary.record(report.overall_status);
            report
        })
        .collect();

    tracing::info!(
        "Analyzed {} routes for {}: {} ready, {} workaround, {} breaking",
        summary.total,
        target,
        summary.fully_compatible,
        summary.needs_workaround,
        summary.has_unsupported
    );

    FleetCompatibilityReport {
        target,
        routes: reports,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingshift_model::CompatibilityStatus;

    #[test]
    fn empty_route_is_ready() {
        let report = classify(&Route::new("default", "web"), Target::Traefik);
        assert!(report.mappings.is_empty());
        assert_eq!(report.overall_status, OverallStatus::Ready);
    }

    #[test]
    fn non_prefixed_annotations_ignored() {
        let route = Route::new("default", "web")
            .with_annotation("kubernetes.io/ingress.class", "nginx")
            .with_annotation("cert-manager.io/cluster-issuer", "letsencrypt");
        let report = classify(&route, Target::GatewayApi);
        assert!(report.mappings.is_empty());
    }

    #[test]
    fn mappings_ordered_by_severity_then_key() {
        let route = Route::new("default", "web")
            .with_nginx("ssl-redirect", "true")
            .with_nginx("auth-type", "basic")
            .with_nginx("configuration-snippet", "more_set_headers x;")
            .with_nginx("auth-secret", "creds")
            .with_nginx("affinity", "cookie");
        let report = classify(&route, Target::Traefik);
        let keys: Vec<_> = report.mappings.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(
            keys,
            ["configuration-snippet", "auth-secret", "auth-type", "affinity", "ssl-redirect"]
        );
        assert_eq!(report.overall_status, OverallStatus::Breaking);
        assert_eq!(report.attention().count(), 3);
    }

    #[test]
    fn unknown_annotation_is_unsupported() {
        let route = Route::new("default", "web").with_nginx("x-forwarded-prefix", "/api");
        let report = classify(&route, Target::Traefik);
        let mapping = report.mapping("x-forwarded-prefix").unwrap();
        assert_eq!(mapping.status, CompatibilityStatus::Unsupported);
        assert!(mapping.note.contains("manual review"));
        assert_eq!(mapping.value, "/api");
    }

    #[test]
    fn fleet_summary_counts() {
        let routes = vec![
            Route::new("a", "ready"),
            Route::new("a", "partial").with_nginx("limit-rps", "5"),
            Route::new("a", "broken").with_nginx("server-snippet", "x"),
        ];
        let fleet = classify_fleet(&routes, Target::GatewayApi);
        assert_eq!(
            fleet.summary,
            FleetSummary {
                total: 3,
                fully_compatible: 1,
                needs_workaround: 1,
                has_unsupported: 1,
            }
        );
        assert_eq!(fleet.route("a", "partial").unwrap().overall_status, OverallStatus::Workaround);
    }
}
