//! Compatibility classifier
//!
//! Applies the knowledge base to the legacy annotations of each route and
//! folds the verdicts into per-route and per-fleet reports.

pub mod classify;
pub mod issues;
pub mod report;

pub use classify::{classify, classify_fleet, classify_with};
pub use issues::{fleet_issues, issues, AnnotationIssue, RouteIssueSummary};
pub use report::{AnnotationMapping, FleetCompatibilityReport, FleetSummary, RouteCompatibilityReport};
