//! Route input loading
//!
//! Accepts a bare list of routes or a scan envelope with an `ingresses`
//! list, as JSON or YAML. Every route is normalized on the way in.

use std::path::Path;

use ingshift_model::Route;
use serde::Deserialize;

use crate::error::{MigrationError, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RouteInput {
    List(Vec<Route>),
    Envelope { ingresses: Vec<Route> },
}

impl RouteInput {
    fn into_routes(self) -> Vec<Route> {
        match self {
            Self::List(routes) | Self::Envelope { ingresses: routes } => routes,
        }
    }
}

/// Parse routes from JSON or YAML text
///
/// Text starting with `[` or `{` is read as JSON; anything else as YAML.
pub fn parse_routes(text: &str) -> Result<Vec<Route>> {
    let trimmed = text.trim_start();
    let input: RouteInput = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        serde_json::from_str(trimmed)?
    } else {
        serde_yaml::from_str(text)?
    };
    let routes: Vec<Route> = input.into_routes().into_iter().map(Route::normalized).collect();
    tracing::debug!("Parsed {} routes", routes.len());
    Ok(routes)
}

/// Read and parse a route file
pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<Route>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| MigrationError::io(path, e))?;
    parse_routes(&text)
}
