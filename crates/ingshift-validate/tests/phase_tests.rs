use ingshift_model::Target;
use ingshift_validate::{derive_validation_phase, CheckStatus, ClusterFacts, MigrationPhase};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn every_controller_combination() {
    let table = [
        (false, false, MigrationPhase::Pre),
        (true, false, MigrationPhase::Pre),
        (true, true, MigrationPhase::Parallel),
        (false, true, MigrationPhase::Post),
    ];
    for target in Target::ALL {
        for (legacy, ready, expected) in table {
            let report = derive_validation_phase(&ClusterFacts::controllers(legacy, ready), target);
            assert_eq!(report.phase, expected, "{target} legacy={legacy} ready={ready}");
            assert_eq!(report.phase_description, expected.description());
            assert!(!report.checklist.is_empty());
        }
    }
}

#[test]
fn report_serializes_camel_case() {
    let report = derive_validation_phase(&ClusterFacts::controllers(true, true), Target::GatewayApi);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["target"], "gateway-api");
    assert_eq!(json["phase"], "parallel");
    assert!(json["phaseDescription"].is_string());
    assert!(json["checklist"].is_array());
    assert_eq!(json["overall"], "fail");
}

#[test]
fn finished_gateway_migration_passes() {
    let facts = ClusterFacts {
        ingress_count: 5,
        target_ready: true,
        target_namespace: Some("envoy-gateway-system".into()),
        target_version: Some("v1.2.0".into()),
        target_crds_installed: true,
        httproute_count: 5,
        ..ClusterFacts::default()
    };
    let report = derive_validation_phase(&facts, Target::GatewayApi);
    assert_eq!(report.phase, MigrationPhase::Post);
    assert_eq!(report.overall, CheckStatus::Pass);
    assert!(report.checks.iter().all(|c| c.status == CheckStatus::Pass));
}

#[test]
fn parallel_traefik_warns_about_nginx() {
    let facts = ClusterFacts {
        ingress_count: 3,
        ingresses_updated: 3,
        legacy_present: true,
        legacy_namespace: Some("ingress-nginx".into()),
        target_ready: true,
        target_crds_installed: true,
        middleware_count: 2,
        ..ClusterFacts::default()
    };
    let report = derive_validation_phase(&facts, Target::Traefik);
    assert_eq!(report.phase, MigrationPhase::Parallel);
    assert_eq!(report.overall, CheckStatus::Warn);
    let nginx = report.checks.iter().find(|c| c.name == "Ingress NGINX running").unwrap();
    assert!(nginx.message.contains("'ingress-nginx'"));
}

fn arb_facts() -> impl Strategy<Value = ClusterFacts> {
    (
        0usize..20,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0usize..20,
        0usize..20,
        0usize..20,
    )
        .prop_map(|(ingresses, legacy, ready, crds, middlewares, routes, updated)| ClusterFacts {
            ingress_count: ingresses,
            legacy_present: legacy,
            target_ready: ready,
            target_crds_installed: crds,
            middleware_count: middlewares,
            httproute_count: routes,
            ingresses_updated: updated,
            ..ClusterFacts::default()
        })
}

proptest! {
    #[test]
    fn prop_overall_is_worst_check(facts in arb_facts(), gateway in any::<bool>()) {
        let target = if gateway { Target::GatewayApi } else { Target::Traefik };
        let report = derive_validation_phase(&facts, target);
        let worst = report.checks.iter().map(|c| c.status).max().unwrap();
        prop_assert_eq!(report.overall, worst);
        if !facts.target_ready {
            prop_assert_eq!(report.overall, CheckStatus::Fail);
        }
    }

    #[test]
    fn prop_phase_ignores_auxiliary_facts(facts in arb_facts()) {
        let bare = ClusterFacts::controllers(facts.legacy_present, facts.target_ready);
        prop_assert_eq!(
            derive_validation_phase(&facts, Target::Traefik).phase,
            derive_validation_phase(&bare, Target::Traefik).phase
        );
    }
}
