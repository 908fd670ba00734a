//! Output directory writer and terminal rendering

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ingshift_core::{Explanation, FleetCompatibilityReport, ValidationReport};
use ingshift_model::{CompatibilityStatus, GeneratedArtifact};

/// Write every artifact below `root`, creating directories as needed
pub fn write_artifacts(root: &Path, artifacts: &[GeneratedArtifact]) -> Result<()> {
    for artifact in artifacts {
        let path = root.join(&artifact.relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, &artifact.content).with_context(|| format!("writing {}", path.display()))?;
        if artifact.is_script() {
            make_executable(&path)?;
        }
        tracing::debug!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("setting permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_: &Path) -> Result<()> {
    Ok(())
}

fn status_label(status: CompatibilityStatus) -> &'static str {
    match status {
        CompatibilityStatus::Supported => "[supported]",
        CompatibilityStatus::Partial => "[partial]",
        CompatibilityStatus::Unsupported => "[UNSUPPORTED]",
    }
}

/// Plain text rendering of a fleet report
pub fn analysis_text(report: &FleetCompatibilityReport) -> String {
    let mut out = String::new();
    let s = report.summary;
    let _ = writeln!(out, "Compatibility analysis for {}\n", report.target);
    let _ = writeln!(out, "  Total routes:        {}", s.total);
    let _ = writeln!(out, "  Fully compatible:    {}", s.fully_compatible);
    let _ = writeln!(out, "  Needs workarounds:   {}", s.needs_workaround);
    let _ = writeln!(out, "  Has unsupported:     {}\n", s.has_unsupported);

    for route in &report.routes {
        let _ = writeln!(out, "{}/{} ({})", route.namespace, route.name, route.overall_status);
        if route.mappings.is_empty() {
            out.push_str("  no nginx annotations; migrates as-is\n\n");
            continue;
        }
        let width = route.mappings.iter().map(|m| m.key.len()).max().unwrap_or(0);
        for m in &route.mappings {
            let _ = writeln!(
                out,
                "  {:<width$}  {:<13}  {}",
                m.key,
                status_label(m.status),
                if m.target_construct.is_empty() { &m.note } else { &m.target_construct },
            );
        }
        out.push('\n');
    }
    let _ = writeln!(out, "Run `ingshift migrate --target {}` to generate migration files", report.target);
    out
}

/// Plain text rendering of a validation report
pub fn validation_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Phase: {} ({})", report.phase, report.target);
    let _ = writeln!(out, "{}\n", report.phase_description);
    for check in &report.checks {
        let _ = writeln!(out, "  [{}] {}: {}", check.status, check.name, check.message);
    }
    let _ = writeln!(out, "\nOverall: {}\n\nNext steps:", report.overall);
    for (i, step) in report.checklist.iter().enumerate() {
        let _ = writeln!(out, "  {}. {step}", i + 1);
    }
    out
}

/// Plain text rendering of an annotation explanation
pub fn explanation_text(explanation: &Explanation) -> String {
    let mut out = String::new();
    let entry = &explanation.entry;
    let _ = writeln!(out, "{} on {}: {}", explanation.key, explanation.target, entry.status);
    if let Some(def) = &explanation.definition {
        let _ = writeln!(out, "  {} ({})", def.description, def.category);
    }
    if !entry.target_construct.is_empty() {
        let _ = writeln!(out, "  Target: {}", entry.target_construct);
    }
    let _ = writeln!(out, "  Note: {}", entry.note);
    if let Some(guide) = &explanation.guide {
        let _ = writeln!(out, "\nWhat: {}\nFix: {}", guide.what, guide.fix);
        if let Some(example) = guide.example {
            let _ = writeln!(out, "\nExample:\n{example}");
        }
        if let Some(link) = guide.docs_link {
            let _ = writeln!(out, "Docs: {link}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingshift_core::{analyze, derive_validation_phase, explain, ClusterFacts, Route, Target};
    use ingshift_model::ArtifactCategory;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = [
            GeneratedArtifact::new("00-migration-report.md", ArtifactCategory::Guide, "r", "# r\n"),
            GeneratedArtifact::new("07-cleanup/remove-nginx.sh", ArtifactCategory::Cleanup, "c", "#!/bin/bash\n"),
        ];
        write_artifacts(dir.path(), &artifacts).unwrap();
        let script = dir.path().join("07-cleanup/remove-nginx.sh");
        assert_eq!(fs::read_to_string(&script).unwrap(), "#!/bin/bash\n");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            assert_eq!(fs::metadata(&script).unwrap().permissions().mode() & 0o777, 0o755);
        }
    }

    #[test]
    fn analysis_lists_each_route() {
        let routes = [
            Route::new("shop", "checkout").with_nginx("limit-rps", "50"),
            Route::new("shop", "web"),
        ];
        let text = analysis_text(&analyze(&routes, Target::GatewayApi));
        assert!(text.contains("shop/checkout (workaround)"));
        assert!(text.contains("[partial]"));
        assert!(text.contains("no nginx annotations"));
    }

    #[test]
    fn validation_numbers_steps() {
        let report = derive_validation_phase(&ClusterFacts::default(), Target::Traefik);
        let text = validation_text(&report);
        assert_eq!(text.lines().next(), Some("Phase: pre (traefik)"));
        assert!(text.contains("  1. "));
        assert!(text.contains("Overall: fail"));
    }

    #[test]
    fn explanation_includes_guide() {
        let text = explanation_text(&explain("limit-rps", Target::GatewayApi));
        assert!(text.starts_with("limit-rps on gateway-api: partial"));
        assert!(text.contains("Fix: "));
    }
}
