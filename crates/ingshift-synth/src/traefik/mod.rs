//! Traefik synthesizer
//!
//! Keeps every route as an Ingress and attaches Traefik Middlewares for
//! the annotation groups Traefik cannot read natively.

mod ingress;
mod middleware;
mod scripts;

pub use ingress::MIDDLEWARES_ANNOTATION;
pub use middleware::{MiddlewarePlan, API_VERSION};

use ingshift_model::{ArtifactCategory, GeneratedArtifact, Route, Target};

use crate::config::SynthConfig;
use crate::error::{Result, SynthError};
use crate::manifest::yaml_artifact;
use crate::{ensure_unique_paths, sorted_routes, Synthesizer};

/// Ingress plus Middleware output for Traefik v3
#[derive(Debug, Clone, Default)]
pub struct TraefikSynthesizer {
    config: SynthConfig,
}

impl TraefikSynthesizer {
    /// Create a synthesizer
    #[inline]
    #[must_use]
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }
}

impl Synthesizer for TraefikSynthesizer {
    fn target(&self) -> Target {
        Target::Traefik
    }

    fn synthesize(&self, routes: &[Route]) -> Result<Vec<GeneratedArtifact>> {
        let routes = sorted_routes(routes);
        let mut artifacts = vec![scripts::helm_install(&self.config), scripts::helm_values()];
        let mut ingresses = Vec::with_capacity(routes.len());

        for route in &routes {
            let stem = route.file_stem();
            let plan = MiddlewarePlan::build(route, &self.config).map_err(|e| {
                SynthError::render(format!("02-middlewares/{stem}-middlewares.yaml"), e)
            })?;
            tracing::debug!(
                "Planned {} middlewares for {}",
                plan.references.len(),
                route.qualified_name()
            );

            if !plan.is_empty() {
                artifacts.push(yaml_artifact(
                    format!("02-middlewares/{stem}-middlewares.yaml"),
                    ArtifactCategory::Middleware,
                    format!("Traefik Middlewares for {}", route.qualified_name()),
                    &plan.documents,
                )?);
            }

            let path = format!("03-ingresses/{stem}.yaml");
            let doc = ingress::updated_ingress(
                route,
                &self.config,
                &plan.references,
                &plan.consumed,
                plan.route_notes,
            )
            .map_err(|e| SynthError::render(&path, e))?;
            ingresses.push(yaml_artifact(
                path,
                ArtifactCategory::Ingress,
                format!("Ingress for {} with Traefik middleware references", route.qualified_name()),
                &[doc],
            )?);
        }

        artifacts.extend(ingresses);
        artifacts.push(scripts::verify(&routes));
        artifacts.push(scripts::dns_guide());
        artifacts.push(scripts::preserve_ingress_class(&self.config));
        artifacts.push(scripts::remove_nginx(&self.config));

        ensure_unique_paths(&artifacts)?;
        tracing::info!(
            "Generated {} Traefik artifacts for {} routes",
            artifacts.len(),
            routes.len()
        );
        Ok(artifacts)
    }
}
