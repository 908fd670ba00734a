//! ingshift manifest synthesizers
//!
//! Turns route snapshots into ordered, numbered migration artifacts for one
//! target controller.
//!
//! # Core Concepts
//!
//! - [`Synthesizer`]: one implementation per [`Target`]
//! - [`TraefikSynthesizer`]: keeps Ingresses and adds Traefik Middlewares
//! - [`GatewayApiSynthesizer`]: shared Gateway, HTTPRoutes and Envoy Gateway policies
//! - [`SynthConfig`]: gateway names, versions and fallback values
//!
//! Output is a pure function of the input set: routes are processed in
//! namespace and name order, so shuffling the input changes nothing.
//!
//! # Example
//!
//! ```
//! use ingshift_model::{PathRule, Route, Target};
//! use ingshift_synth::{synthesizer_for, SynthConfig};
//!
//! let route = Route::new("default", "web")
//!     .with_path(PathRule::new("web.example.com", "/", "web", 80));
//! let synth = synthesizer_for(Target::GatewayApi, SynthConfig::default());
//! let artifacts = synth.synthesize(&[route]).unwrap();
//! assert!(artifacts.iter().any(|a| a.relative_path == "04-httproutes/default-web.yaml"));
//! ```

mod config;
mod error;
pub mod gateway;
pub mod manifest;
pub mod traefik;
pub mod values;

use std::collections::BTreeSet;

pub use config::SynthConfig;
pub use error::{ConfigError, Result, SynthError};
pub use gateway::GatewayApiSynthesizer;
pub use traefik::TraefikSynthesizer;

use ingshift_model::{GeneratedArtifact, Route, Target};

/// Manifest generator for one target
pub trait Synthesizer: Send + Sync {
    /// Target this synthesizer emits for
    fn target(&self) -> Target;

    /// Generate the ordered artifact list for `routes`
    fn synthesize(&self, routes: &[Route]) -> Result<Vec<GeneratedArtifact>>;
}

/// Synthesizer for `target`
#[must_use]
pub fn synthesizer_for(target: Target, config: SynthConfig) -> Box<dyn Synthesizer> {
    match target {
        Target::Traefik => Box::new(TraefikSynthesizer::new(config)),
        Target::GatewayApi => Box::new(GatewayApiSynthesizer::new(config)),
    }
}

pub(crate) fn sorted_routes(routes: &[Route]) -> Vec<&Route> {
    let mut sorted: Vec<&Route> = routes.iter().collect();
    sorted.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
    sorted
}

pub(crate) fn ensure_unique_paths(artifacts: &[GeneratedArtifact]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for artifact in artifacts {
        if !seen.insert(artifact.relative_path.as_str()) {
            return Err(SynthError::DuplicatePath(artifact.relative_path.clone()));
        }
    }
    Ok(())
}

/// Log a value fallback and hand the note back for the manifest header
pub(crate) fn fallback(route: &Route, note: String) -> String {
    tracing::warn!("{}: {}", route.qualified_name(), note);
    note
}
