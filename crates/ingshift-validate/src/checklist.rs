//! Remediation checklists per phase and target

use ingshift_model::Target;

use crate::phase::{ClusterFacts, MigrationPhase};

const PRE_TRAEFIK: &[&str] = &[
    "Generate migration files with `ingshift migrate --target traefik`",
    "Review 00-migration-report.md to understand every change",
    "Install Traefik next to NGINX with 01-install-traefik/; production traffic is unaffected",
];

const PRE_GATEWAY: &[&str] = &[
    "Generate migration files with `ingshift migrate --target gateway-api`",
    "Review 00-migration-report.md for the full migration overview",
    "Install the Gateway API CRDs with 01-install-gateway-api-crds/install.sh",
    "Install Envoy Gateway next to NGINX with 02-install-envoy-gateway/; production traffic is unaffected",
];

const POST: &[&str] = &[
    "Monitor application logs and metrics for at least 24 hours",
    "Confirm TLS certificates renew correctly",
    "Keep the NGINX Helm values as a rollback backup",
    "Update CI/CD pipelines to deploy the new resource kinds",
];

/// Next steps for `phase`, refined by what the facts show is already done
#[must_use]
pub fn checklist(phase: MigrationPhase, target: Target, facts: &ClusterFacts) -> Vec<String> {
    let owned = |steps: &[&str]| steps.iter().map(|s| (*s).to_string()).collect();
    match (phase, target) {
        (MigrationPhase::Pre, Target::Traefik) => owned(PRE_TRAEFIK),
        (MigrationPhase::Pre, Target::GatewayApi) => owned(PRE_GATEWAY),
        (MigrationPhase::Post, _) => owned(POST),
        (MigrationPhase::Parallel, Target::Traefik) => {
            let mut steps = Vec::new();
            if facts.middleware_count == 0 {
                steps.push("Apply the Middlewares in 02-middlewares/".to_string());
            }
            if facts.ingresses_updated < facts.ingress_count {
                steps.push("Apply the updated Ingresses in 03-ingresses/ to attach the middlewares".to_string());
            }
            steps.extend(
                [
                    "Run 04-verify.sh to check Traefik serves every host",
                    "Follow 05-dns-migration.md to move DNS to the Traefik address",
                    "After DNS has settled, run 06-cleanup/ to remove NGINX",
                ]
                .map(String::from),
            );
            steps
        }
        (MigrationPhase::Parallel, Target::GatewayApi) => {
            let mut steps = Vec::new();
            if facts.httproute_count == 0 {
                steps.extend(
                    [
                        "Apply the GatewayClass and Gateway in 03-gateway/",
                        "Apply the HTTPRoutes in 04-httproutes/",
                        "Apply the policies in 05-policies/, if any",
                    ]
                    .map(String::from),
                );
            }
            steps.extend(
                [
                    "Run 06-verify.sh to check Envoy Gateway serves every host",
                    "Move DNS to the Gateway address once verified",
                    "After DNS has settled, run 07-cleanup/remove-nginx.sh",
                ]
                .map(String::from),
            );
            steps
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_traefik_skips_done_steps() {
        let done = ClusterFacts {
            ingress_count: 2,
            ingresses_updated: 2,
            middleware_count: 5,
            ..ClusterFacts::controllers(true, true)
        };
        let steps = checklist(MigrationPhase::Parallel, Target::Traefik, &done);
        assert_eq!(steps.len(), 3);
        assert!(steps[0].contains("04-verify.sh"));

        let fresh = ClusterFacts {
            ingress_count: 2,
            ..ClusterFacts::controllers(true, true)
        };
        let steps = checklist(MigrationPhase::Parallel, Target::Traefik, &fresh);
        assert_eq!(steps.len(), 5);
        assert!(steps[0].contains("02-middlewares/"));
    }

    #[test]
    fn parallel_gateway_lists_apply_steps_until_routes_exist() {
        let facts = ClusterFacts::controllers(true, true);
        assert_eq!(checklist(MigrationPhase::Parallel, Target::GatewayApi, &facts).len(), 6);
        let applied = ClusterFacts {
            httproute_count: 3,
            ..facts
        };
        assert_eq!(checklist(MigrationPhase::Parallel, Target::GatewayApi, &applied).len(), 3);
    }

    #[test]
    fn post_is_shared() {
        let facts = ClusterFacts::controllers(false, true);
        assert_eq!(
            checklist(MigrationPhase::Post, Target::Traefik, &facts),
            checklist(MigrationPhase::Post, Target::GatewayApi, &facts)
        );
    }
}
