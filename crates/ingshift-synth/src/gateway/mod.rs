//! Gateway API synthesizer
//!
//! Produces one shared Gateway for the fleet, HTTPRoutes per route and
//! Envoy Gateway policies for behaviour HTTPRoute cannot express.

mod httproute;
mod infra;
mod listeners;
mod policy;
mod scripts;

pub use httproute::{path_match_type, redirect_status, API_VERSION};
pub use listeners::{Certificate, ListenerTable, TlsListener, HTTP_SECTION, PLACEHOLDER_SECTION};
pub use policy::{ENVOY_API_VERSION, LB_POLICY_API_VERSION};

use ingshift_model::{ArtifactCategory, GeneratedArtifact, Route, Target};

use crate::config::SynthConfig;
use crate::error::{Result, SynthError};
use crate::manifest::yaml_artifact;
use crate::{ensure_unique_paths, sorted_routes, Synthesizer};

/// Gateway, HTTPRoute and policy output for Envoy Gateway
#[derive(Debug, Clone, Default)]
pub struct GatewayApiSynthesizer {
    config: SynthConfig,
}

impl GatewayApiSynthesizer {
    /// Create a synthesizer
    #[inline]
    #[must_use]
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }
}

impl Synthesizer for GatewayApiSynthesizer {
    fn target(&self) -> Target {
        Target::GatewayApi
    }

    fn synthesize(&self, routes: &[Route]) -> Result<Vec<GeneratedArtifact>> {
        let routes = sorted_routes(routes);
        let table = ListenerTable::build(&routes);
        tracing::debug!(
            "Assigned {} HTTPS listeners, placeholder: {}",
            table.listeners().len(),
            table.needs_placeholder()
        );

        let mut artifacts = vec![
            scripts::install_crds(&self.config),
            scripts::helm_install(&self.config),
            scripts::helm_values(),
        ];

        let class = infra::gateway_class(&self.config)
            .map_err(|e| SynthError::render("03-gateway/gatewayclass.yaml", e))?;
        artifacts.push(yaml_artifact(
            "03-gateway/gatewayclass.yaml".to_string(),
            ArtifactCategory::Gateway,
            format!("GatewayClass {}", self.config.gateway_class),
            &[class],
        )?);
        let gateway = infra::gateway(&self.config, &table)
            .map_err(|e| SynthError::render("03-gateway/gateway.yaml", e))?;
        artifacts.push(yaml_artifact(
            "03-gateway/gateway.yaml".to_string(),
            ArtifactCategory::Gateway,
            format!("Shared Gateway {}", self.config.gateway_name),
            &[gateway],
        )?);

        let mut policies = Vec::new();
        for route in &routes {
            let stem = route.file_stem();
            let set = policy::policies(route, &self.config)
                .map_err(|e| SynthError::render(format!("05-policies/{stem}"), e))?;

            let path = format!("04-httproutes/{stem}.yaml");
            let documents = httproute::http_routes(route, &table, &self.config, set.route_notes)
                .map_err(|e| SynthError::render(&path, e))?;
            artifacts.push(yaml_artifact(
                path,
                ArtifactCategory::HttpRoute,
                format!("HTTPRoutes for {}", route.qualified_name()),
                &documents,
            )?);

            tracing::debug!(
                "Built {} policies for {}",
                set.policies.len(),
                route.qualified_name()
            );
            for p in set.policies {
                policies.push(yaml_artifact(
                    format!("05-policies/{stem}-{}.yaml", p.purpose),
                    ArtifactCategory::Policy,
                    format!("{} policy for {}", p.purpose, route.qualified_name()),
                    &[p.document],
                )?);
            }
        }

        artifacts.extend(policies);
        artifacts.push(scripts::verify(&self.config, &routes));
        artifacts.push(scripts::remove_nginx());

        ensure_unique_paths(&artifacts)?;
        tracing::info!(
            "Generated {} Gateway API artifacts for {} routes",
            artifacts.len(),
            routes.len()
        );
        Ok(artifacts)
    }
}
