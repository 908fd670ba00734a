//! Process-wide knowledge base
//!
//! Provides [`KnowledgeBase`], an immutable index over the compatibility
//! tables, remediation guides and annotation catalog. It is built once on
//! first use and shared by reference afterwards.

use std::collections::HashMap;

use ingshift_model::{CompatibilityStatus, Target};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::catalog::{AnnotationDef, CATALOG};
use crate::entry::{AnnotationGuide, CompatibilityEntry};
use crate::{guides, tables};

static GLOBAL: Lazy<KnowledgeBase> = Lazy::new(KnowledgeBase::with_defaults);

const UNKNOWN: CompatibilityEntry = CompatibilityEntry::unknown();

#[derive(Debug, Default)]
struct TargetIndex {
    entries: HashMap<&'static str, CompatibilityEntry>,
    guides: HashMap<&'static str, AnnotationGuide>,
}

impl TargetIndex {
    fn build(target: Target) -> Self {
        Self {
            entries: tables::entries(target).iter().copied().collect(),
            guides: guides::guides(target).iter().copied().collect(),
        }
    }
}

/// Problem found by [`KnowledgeBase::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum KnowledgeIssue {
    /// A key appears twice in one table
    DuplicateEntry {
        /// Target table
        target: Target,
        /// Annotation key
        key: &'static str,
    },
    /// A guide exists for an annotation the table does not list
    OrphanGuide {
        /// Target table
        target: Target,
        /// Annotation key
        key: &'static str,
    },
    /// A guide is attached to a supported annotation
    GuideOnSupported {
        /// Target table
        target: Target,
        /// Annotation key
        key: &'static str,
    },
    /// An entry has an empty note
    BlankNote {
        /// Target table
        target: Target,
        /// Annotation key
        key: &'static str,
    },
    /// A table key is missing from the catalog
    Uncatalogued {
        /// Target table
        target: Target,
        /// Annotation key
        key: &'static str,
    },
}

/// Immutable annotation knowledge for every target
#[derive(Debug)]
pub struct KnowledgeBase {
    traefik: TargetIndex,
    gateway: TargetIndex,
    catalog: HashMap<&'static str, AnnotationDef>,
}

impl KnowledgeBase {
    /// Build an index over the built-in tables
    #[must_use]
    pub fn with_defaults() -> Self {
        let kb = Self {
            traefik: TargetIndex::build(Target::Traefik),
            gateway: TargetIndex::build(Target::GatewayApi),
            catalog: CATALOG.iter().map(|def| (def.key, *def)).collect(),
        };
        tracing::debug!(
            "Knowledge base loaded: {} traefik entries, {} gateway-api entries, {} catalogued annotations",
            kb.traefik.entries.len(),
            kb.gateway.entries.len(),
            kb.catalog.len()
        );
        kb
    }

    /// Shared instance
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    fn index(&self, target: Target) -> &TargetIndex {
        match target {
            Target::Traefik => &self.traefik,
            Target::GatewayApi => &self.gateway,
        }
    }

    /// Verdict for `key`, or the unknown sentinel
    #[inline]
    #[must_use]
    pub fn lookup(&self, target: Target, key: &str) -> &CompatibilityEntry {
        self.get(target, key).unwrap_or(&UNKNOWN)
    }

    /// Verdict for `key` if the table lists it
    #[inline]
    #[must_use]
    pub fn get(&self, target: Target, key: &str) -> Option<&CompatibilityEntry> {
        self.index(target).entries.get(key)
    }

    /// Remediation guide for `key`
    #[inline]
    #[must_use]
    pub fn guide(&self, target: Target, key: &str) -> Option<&AnnotationGuide> {
        self.index(target).guides.get(key)
    }

    /// Catalog definition for `key`
    #[inline]
    #[must_use]
    pub fn describe(&self, key: &str) -> Option<&AnnotationDef> {
        self.catalog.get(key)
    }

    /// All table entries for a target, sorted by key
    #[must_use]
    pub fn entries(&self, target: Target) -> Vec<(&'static str, &CompatibilityEntry)> {
        let mut entries: Vec<_> = self
            .index(target)
            .entries
            .iter()
            .map(|(k, v)| (*k, v))
            .collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }

    /// Catalog in declaration order
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'static [AnnotationDef] {
        CATALOG
    }

    /// Number of entries with `status` for a target
    #[must_use]
    pub fn count(&self, target: Target, status: CompatibilityStatus) -> usize {
        self.index(target)
            .entries
            .values()
            .filter(|e| e.status == status)
            .count()
    }

    /// Check the tables for internal consistency
    #[must_use]
    pub fn validate(&self) -> Vec<KnowledgeIssue> {
        let mut issues = Vec::new();
        for target in Target::ALL {
            let raw = tables::entries(target);
            let index = self.index(target);
            if raw.len() != index.entries.len() {
                let mut seen = std::collections::HashSet::new();
                for &(key, _) in raw {
                    if !seen.insert(key) {
                        issues.push(KnowledgeIssue::DuplicateEntry { target, key });
                    }
                }
            }
            for (key, entry) in self.entries(target) {
                if entry.note.trim().is_empty() {
                    issues.push(KnowledgeIssue::BlankNote { target, key });
                }
                if !self.catalog.contains_key(key) {
                    issues.push(KnowledgeIssue::Uncatalogued { target, key });
                }
            }
            let mut guided: Vec<_> = index.guides.keys().copied().collect();
            guided.sort_unstable();
            for key in guided {
                match index.entries.get(key) {
                    None => issues.push(KnowledgeIssue::OrphanGuide { target, key }),
                    Some(entry) if entry.status == CompatibilityStatus::Supported => {
                        issues.push(KnowledgeIssue::GuideOnSupported { target, key });
                    }
                    Some(_) => {}
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn global_is_shared() {
        assert!(std::ptr::eq(KnowledgeBase::global(), KnowledgeBase::global()));
    }

    #[test]
    fn builtin_tables_are_consistent() {
        assert_eq!(KnowledgeBase::global().validate(), Vec::new());
    }

    #[test]
    fn lookup_known_and_unknown() {
        let kb = KnowledgeBase::global();
        let entry = kb.lookup(Target::Traefik, "limit-rps");
        assert_eq!(entry.status, CompatibilityStatus::Supported);
        assert_eq!(entry.target_construct, "Middleware (RateLimit)");

        let missing = kb.lookup(Target::GatewayApi, "x-made-up");
        assert!(missing.is_unknown());
        assert!(kb.get(Target::GatewayApi, "x-made-up").is_none());
    }

    #[test]
    fn snippets_unsupported_everywhere() {
        let kb = KnowledgeBase::global();
        for target in Target::ALL {
            for key in ["configuration-snippet", "server-snippet"] {
                assert_eq!(kb.lookup(target, key).status, CompatibilityStatus::Unsupported);
                assert!(kb.guide(target, key).is_some());
            }
        }
    }

    #[test]
    fn tables_are_independent() {
        let kb = KnowledgeBase::global();
        assert_eq!(kb.lookup(Target::Traefik, "auth-type").status, CompatibilityStatus::Partial);
        assert_eq!(kb.lookup(Target::GatewayApi, "auth-type").status, CompatibilityStatus::Unsupported);
        assert_eq!(kb.lookup(Target::Traefik, "custom-headers").status, CompatibilityStatus::Partial);
        assert_eq!(kb.lookup(Target::GatewayApi, "custom-headers").status, CompatibilityStatus::Supported);
    }

    #[test]
    fn issue_urls_only_on_unsupported() {
        let kb = KnowledgeBase::global();
        for target in Target::ALL {
            for (key, entry) in kb.entries(target) {
                if kb.guide(target, key).and_then(|g| g.issue_url).is_some() {
                    assert_eq!(entry.status, CompatibilityStatus::Unsupported, "{target}/{key}");
                }
            }
        }
    }

    #[test]
    fn entries_sorted() {
        let entries = KnowledgeBase::global().entries(Target::GatewayApi);
        assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn counts_partition_table() {
        let kb = KnowledgeBase::global();
        for target in Target::ALL {
            let total = kb.count(target, CompatibilityStatus::Supported)
                + kb.count(target, CompatibilityStatus::Partial)
                + kb.count(target, CompatibilityStatus::Unsupported);
            assert_eq!(total, kb.entries(target).len());
        }
    }
}
