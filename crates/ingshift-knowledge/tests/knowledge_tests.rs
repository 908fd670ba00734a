use ingshift_knowledge::{category_for_construct, describe, guide, lookup, KnowledgeBase};
use ingshift_model::{ArtifactCategory, CompatibilityStatus, Target};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn guides_only_on_non_supported() {
    let kb = KnowledgeBase::global();
    for target in Target::ALL {
        for (key, entry) in kb.entries(target) {
            if entry.status == CompatibilityStatus::Supported {
                assert!(kb.guide(target, key).is_none(), "{target}/{key}");
            }
        }
    }
}

#[test]
fn status_counts_cover_table() {
    let kb = KnowledgeBase::global();
    for target in Target::ALL {
        let total: usize = [CompatibilityStatus::Supported, CompatibilityStatus::Partial, CompatibilityStatus::Unsupported]
            .into_iter()
            .map(|s| kb.count(target, s))
            .sum();
        assert_eq!(total, kb.entries(target).len());
    }
}

#[test]
fn entries_are_sorted() {
    let entries = KnowledgeBase::global().entries(Target::GatewayApi);
    let keys: Vec<_> = entries.iter().map(|(k, _)| *k).collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[test]
fn catalog_keys_unique_and_described() {
    let catalog = KnowledgeBase::global().catalog();
    let mut seen = HashSet::new();
    for def in catalog {
        assert!(seen.insert(def.key), "duplicate {}", def.key);
        assert!(!def.description.is_empty());
        assert_eq!(describe(def.key), Some(def));
    }
}

#[test]
fn timeout_verdicts_per_target() {
    let read = lookup(Target::GatewayApi, "proxy-read-timeout");
    assert_eq!(read.artifact_category(), Some(ArtifactCategory::HttpRoute));
    let connect = lookup(Target::GatewayApi, "proxy-connect-timeout");
    assert!(connect.note.contains("Not emitted"));
    let traefik = lookup(Target::Traefik, "proxy-read-timeout");
    assert_eq!(traefik.artifact_category(), Some(ArtifactCategory::Middleware));
}

#[test]
fn construct_labels_map_to_categories() {
    assert_eq!(category_for_construct("Middleware (RateLimit)"), Some(ArtifactCategory::Middleware));
    assert_eq!(category_for_construct("HTTPRoute (URLRewrite)"), Some(ArtifactCategory::HttpRoute));
    assert_eq!(
        category_for_construct("BackendTrafficPolicy (RateLimit)"),
        Some(ArtifactCategory::Policy)
    );
    assert_eq!(category_for_construct("Gateway listener"), Some(ArtifactCategory::Gateway));
    assert_eq!(category_for_construct(""), None);
}

#[test]
fn guide_json_is_camel_case() {
    let guide = guide(Target::GatewayApi, "limit-rps").unwrap();
    let json = serde_json::to_value(guide).unwrap();
    assert!(json["what"].is_string());
    assert!(json["fix"].is_string());
}

proptest! {
    #[test]
    fn unlisted_keys_get_the_sentinel(key in "x-[a-z]{1,12}") {
        for target in Target::ALL {
            let entry = lookup(target, &key);
            prop_assert!(entry.is_unknown());
            prop_assert_eq!(entry.status, CompatibilityStatus::Unsupported);
            prop_assert!(guide(target, &key).is_none());
        }
    }
}
