use ingshift_analyzer::{classify, classify_fleet};
use ingshift_knowledge::KnowledgeBase;
use ingshift_model::{CompatibilityStatus, OverallStatus, Route, Target};
use ingshift_test_utils::{arb_route, fleet, shop_checkout, snippet_route};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn every_table_entry_classifies_as_listed() {
    let kb = KnowledgeBase::global();
    for target in Target::ALL {
        for (key, entry) in kb.entries(target) {
            let route = Route::new("default", "sample").with_nginx(key, "x");
            let report = classify(&route, target);
            assert_eq!(report.mappings.len(), 1, "{target}/{key}");
            let mapping = &report.mappings[0];
            assert_eq!(mapping.key, key);
            assert_eq!(mapping.status, entry.status, "{target}/{key}");
            assert_eq!(mapping.target_construct, entry.target_construct);
        }
    }
}

#[test]
fn shop_checkout_needs_workaround_on_gateway_api() {
    let report = classify(&shop_checkout(), Target::GatewayApi);
    assert_eq!(report.overall_status, OverallStatus::Workaround);
    assert_eq!(report.mappings[0].key, "limit-rps");
    assert_eq!(report.mappings[0].status, CompatibilityStatus::Partial);
}

#[test]
fn shop_checkout_ready_on_traefik() {
    let report = classify(&shop_checkout(), Target::Traefik);
    assert_eq!(report.overall_status, OverallStatus::Ready);
}

#[test]
fn configuration_snippet_breaks_both_targets() {
    for target in Target::ALL {
        let report = classify(&snippet_route(), target);
        assert_eq!(report.overall_status, OverallStatus::Breaking);
        let mapping = report.mapping("configuration-snippet").unwrap();
        assert_eq!(mapping.status, CompatibilityStatus::Unsupported);
    }
}

#[test]
fn fleet_keeps_input_order() {
    let routes = fleet();
    let report = classify_fleet(&routes, Target::Traefik);
    let names: Vec<_> = report.routes.iter().map(|r| r.name.as_str()).collect();
    let expected: Vec<_> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, expected);
}

#[test]
fn fleet_report_serializes_camel_case() {
    let report = classify_fleet(&fleet(), Target::GatewayApi);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["target"], "gateway-api");
    assert!(json["summary"]["fullyCompatible"].is_number());
    assert!(json["routes"][0]["overallStatus"].is_string());
}

proptest! {
    #[test]
    fn prop_unsupported_always_breaking(route in arb_route(), target in prop_oneof![Just(Target::Traefik), Just(Target::GatewayApi)]) {
        let route = route.with_nginx("server-snippet", "return 403;");
        prop_assert_eq!(classify(&route, target).overall_status, OverallStatus::Breaking);
    }

    #[test]
    fn prop_mappings_sorted(route in arb_route(), target in prop_oneof![Just(Target::Traefik), Just(Target::GatewayApi)]) {
        let report = classify(&route, target);
        for pair in report.mappings.windows(2) {
            let a = (pair[0].status.rank(), pair[0].key.as_str());
            let b = (pair[1].status.rank(), pair[1].key.as_str());
            prop_assert!(a < b);
        }
    }

    #[test]
    fn prop_insertion_order_irrelevant(
        pairs in Just(vec![
            ("limit-rps", "10"),
            ("auth-type", "basic"),
            ("ssl-redirect", "true"),
            ("canary", "true"),
            ("x-unknown", "1"),
        ]).prop_shuffle(),
    ) {
        let shuffled = pairs
            .iter()
            .fold(Route::new("a", "b"), |r, (k, v)| r.with_nginx(k, v));
        let sorted = {
            let mut pairs = pairs.clone();
            pairs.sort_unstable();
            pairs.iter().fold(Route::new("a", "b"), |r, (k, v)| r.with_nginx(k, v))
        };
        prop_assert_eq!(classify(&shuffled, Target::Traefik), classify(&sorted, Target::Traefik));
    }

    #[test]
    fn prop_fleet_counts_sum_to_total(routes in proptest::collection::vec(arb_route(), 0..12)) {
        let report = classify_fleet(&routes, Target::GatewayApi);
        let s = report.summary;
        prop_assert_eq!(s.total, routes.len());
        prop_assert_eq!(s.fully_compatible + s.needs_workaround + s.has_unsupported, s.total);
    }
}
