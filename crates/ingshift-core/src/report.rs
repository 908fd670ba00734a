//! `00-migration-report.md`
//!
//! Summary counts, a per-route status table, details for every annotation
//! needing attention and an index of the generated files with digests.

use std::fmt::Write as _;

use ingshift_analyzer::{FleetCompatibilityReport, RouteIssueSummary};
use ingshift_model::{ArtifactCategory, GeneratedArtifact};

/// Report file name, first in apply order
pub const REPORT_PATH: &str = "00-migration-report.md";

/// Render the migration report as a guide artifact
#[must_use]
pub fn migration_report(
    fleet: &FleetCompatibilityReport,
    issues: &[RouteIssueSummary],
    artifacts: &[GeneratedArtifact],
) -> GeneratedArtifact {
    let mut out = String::new();
    let target = fleet.target;
    let summary = fleet.summary;

    let _ = writeln!(out, "# Migration report: ingress-nginx to {}\n", target.controller_name());
    let _ = writeln!(out, "Target: `{target}`\n");
    out.push_str("## Summary\n\n");
    out.push_str("| Routes | Ready | Workaround | Breaking |\n");
    out.push_str("|---|---|---|---|\n");
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} |\n",
        summary.total, summary.fully_compatible, summary.needs_workaround, summary.has_unsupported
    );

    if !fleet.routes.is_empty() {
        out.push_str("## Routes\n\n");
        out.push_str("| Route | Status | Annotations |\n");
        out.push_str("|---|---|---|\n");
        for route in &fleet.routes {
            let _ = writeln!(
                out,
                "| {}/{} | {} | {} |",
                route.namespace,
                route.name,
                route.overall_status,
                route.mappings.len()
            );
        }
        out.push('\n');
    }

    let attention: Vec<_> = issues.iter().filter(|s| !s.issues.is_empty()).collect();
    if !attention.is_empty() {
        out.push_str("## Annotations needing attention\n");
        for summary in attention {
            let _ = writeln!(
                out,
                "\n### {}/{} ({})\n",
                summary.namespace, summary.name, summary.overall_status
            );
            for issue in &summary.issues {
                let _ = writeln!(out, "- **{}** `{}`: {}", issue.key, issue.status, issue.what);
                let _ = writeln!(out, "  - Fix: {}", issue.fix);
                if let Some(category) = issue.file_category {
                    let _ = writeln!(out, "  - See the {category} files");
                }
                if let Some(consequence) = &issue.consequence {
                    let _ = writeln!(out, "  - If left: {consequence}");
                }
                if let Some(link) = &issue.docs_link {
                    let _ = writeln!(out, "  - Docs: {link}");
                }
            }
        }
        out.push('\n');
    }

    out.push_str("## Generated files\n\n");
    out.push_str("| File | Category | Blake3 |\n");
    out.push_str("|---|---|---|\n");
    for artifact in artifacts {
        let _ = writeln!(
            out,
            "| `{}` | {} | `{}` |",
            artifact.relative_path,
            artifact.category,
            artifact.digest().short()
        );
    }
    out.push_str("\nApply the files in directory order. Lines starting with `# NOTE:` mark\n");
    out.push_str("values that were approximated or need a manual follow-up.\n");

    GeneratedArtifact::new(
        REPORT_PATH,
        ArtifactCategory::Guide,
        "Migration summary and annotation analysis",
        out,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingshift_analyzer::{classify_fleet, fleet_issues};
    use ingshift_model::{Route, Target};

    #[test]
    fn lists_counts_issues_and_digests() {
        let routes = vec![
            Route::new("shop", "checkout").with_nginx("limit-rps", "50"),
            Route::new("shop", "web"),
        ];
        let fleet = classify_fleet(&routes, Target::GatewayApi);
        let issues = fleet_issues(&fleet);
        let artifact = GeneratedArtifact::new("06-verify.sh", ArtifactCategory::Verify, "verify", "echo\n");
        let report = migration_report(&fleet, &issues, std::slice::from_ref(&artifact));

        assert_eq!(report.relative_path, REPORT_PATH);
        assert_eq!(report.category, ArtifactCategory::Guide);
        assert!(report.content.contains("| 2 | 1 | 1 | 0 |"));
        assert!(report.content.contains("| shop/checkout | workaround | 1 |"));
        assert!(report.content.contains("### shop/checkout (workaround)"));
        assert!(report.content.contains("- **limit-rps** `partial`"));
        assert!(report
            .content
            .contains(&format!("| `06-verify.sh` | verify | `{}` |", artifact.digest().short())));
    }
}
