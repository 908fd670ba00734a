//! Annotation compatibility knowledge base
//!
//! Two independent tables map each recognized ingress-nginx annotation to a
//! verdict for Traefik and for Gateway API. A guide registry carries
//! remediation text for every partial or unsupported verdict, and a catalog
//! describes each known annotation.
//!
//! # Example
//!
//! ```
//! use ingshift_knowledge::{lookup, guide};
//! use ingshift_model::{CompatibilityStatus, Target};
//!
//! let entry = lookup(Target::GatewayApi, "limit-rps");
//! assert_eq!(entry.status, CompatibilityStatus::Partial);
//! assert!(guide(Target::GatewayApi, "limit-rps").is_some());
//! ```

pub mod catalog;
pub mod entry;
mod guides;
pub mod registry;
mod tables;

pub use catalog::{AnnotationCategory, AnnotationDef};
pub use entry::{category_for_construct, AnnotationGuide, CompatibilityEntry, UNKNOWN_NOTE};
pub use registry::{KnowledgeBase, KnowledgeIssue};

use ingshift_model::Target;

/// Verdict for `key` from the shared knowledge base
#[inline]
#[must_use]
pub fn lookup(target: Target, key: &str) -> &'static CompatibilityEntry {
    KnowledgeBase::global().lookup(target, key)
}

/// Remediation guide for `key` from the shared knowledge base
#[inline]
#[must_use]
pub fn guide(target: Target, key: &str) -> Option<&'static AnnotationGuide> {
    KnowledgeBase::global().guide(target, key)
}

/// Catalog definition for `key`
#[inline]
#[must_use]
pub fn describe(key: &str) -> Option<&'static AnnotationDef> {
    KnowledgeBase::global().describe(key)
}
