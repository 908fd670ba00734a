//! ingshift entry points
//!
//! Pure, synchronous operations over fully materialized route lists:
//!
//! - [`analyze`]: fleet compatibility report for a target
//! - [`synthesize`]: ordered migration artifacts, led by the migration report
//! - [`derive_validation_phase`]: phase, checklist and checks from cluster facts
//! - [`explain`]: everything the knowledge base holds about one annotation
//!
//! # Example
//!
//! ```
//! use ingshift_core::{parse_target, parse_routes, synthesize, SynthConfig};
//!
//! let routes = parse_routes(r#"[{"namespace": "default", "name": "web"}]"#).unwrap();
//! let target = parse_target("traefik").unwrap();
//! let artifacts = synthesize(&routes, target, &SynthConfig::default()).unwrap();
//! assert_eq!(artifacts[0].relative_path, "00-migration-report.md");
//! ```

pub mod error;
pub mod input;
pub mod report;

pub use error::{MigrationError, Result};
pub use input::{load_routes, parse_routes};
pub use report::{migration_report, REPORT_PATH};

pub use ingshift_analyzer::{FleetCompatibilityReport, RouteIssueSummary};
pub use ingshift_model::{GeneratedArtifact, Route, Target};
pub use ingshift_synth::SynthConfig;
pub use ingshift_validate::{ClusterFacts, MigrationPhase, ValidationReport};

use ingshift_knowledge::{AnnotationDef, AnnotationGuide, CompatibilityEntry};
use serde::Serialize;

/// Parse a target name, rejecting anything but `traefik` and `gateway-api`
pub fn parse_target(name: &str) -> Result<Target> {
    Ok(name.parse::<Target>()?)
}

/// Classify every route against `target`
#[must_use]
pub fn analyze(routes: &[Route], target: Target) -> FleetCompatibilityReport {
    let report = ingshift_analyzer::classify_fleet(routes, target);
    tracing::info!(
        "Analyzed {} routes for {}: {} ready, {} workaround, {} breaking",
        report.summary.total,
        target,
        report.summary.fully_compatible,
        report.summary.needs_workaround,
        report.summary.has_unsupported
    );
    report
}

/// Issue summaries with remediation guides for a fleet report
#[must_use]
pub fn issues(report: &FleetCompatibilityReport) -> Vec<RouteIssueSummary> {
    ingshift_analyzer::fleet_issues(report)
}

/// Generate every artifact for `routes`, with the migration report first
pub fn synthesize(routes: &[Route], target: Target, config: &SynthConfig) -> Result<Vec<GeneratedArtifact>> {
    config.validate()?;
    let fleet = analyze(routes, target);
    let generated = ingshift_synth::synthesizer_for(target, config.clone()).synthesize(routes)?;
    let report = migration_report(&fleet, &issues(&fleet), &generated);

    let mut artifacts = Vec::with_capacity(generated.len() + 1);
    artifacts.push(report);
    artifacts.extend(generated);
    tracing::info!("Synthesized {} artifacts for {}", artifacts.len(), target);
    Ok(artifacts)
}

/// Phase, checklist and checks for the observed cluster state
#[must_use]
pub fn derive_validation_phase(facts: &ClusterFacts, target: Target) -> ValidationReport {
    ingshift_validate::derive_validation_phase(facts, target)
}

/// Knowledge about one annotation for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    /// Short annotation key
    pub key: String,
    /// Target the verdict applies to
    pub target: Target,
    /// Verdict; the unknown sentinel for unrecognized keys
    pub entry: CompatibilityEntry,
    /// Catalog definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<AnnotationDef>,
    /// Remediation guide for partial and unsupported verdicts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide: Option<AnnotationGuide>,
}

/// Look up `key`, with or without the `nginx.ingress.kubernetes.io/` prefix
#[must_use]
pub fn explain(key: &str, target: Target) -> Explanation {
    let key = key
        .trim()
        .strip_prefix(ingshift_model::NGINX_PREFIX)
        .unwrap_or(key.trim());
    Explanation {
        key: key.to_string(),
        target,
        entry: *ingshift_knowledge::lookup(target, key),
        definition: ingshift_knowledge::describe(key).copied(),
        guide: ingshift_knowledge::guide(target, key).copied(),
    }
}
