//! Migration target dialects

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Replacement controller a migration is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Traefik v3 with Middleware CRDs
    #[serde(rename = "traefik")]
    Traefik,

    /// Kubernetes Gateway API, implemented by Envoy Gateway
    #[serde(rename = "gateway-api")]
    GatewayApi,
}

impl Target {
    /// All supported targets
    pub const ALL: [Target; 2] = [Target::Traefik, Target::GatewayApi];

    /// Wire name accepted on the command line and in reports
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Traefik => "traefik",
            Self::GatewayApi => "gateway-api",
        }
    }

    /// Human readable controller name
    #[inline]
    #[must_use]
    pub const fn controller_name(self) -> &'static str {
        match self {
            Self::Traefik => "Traefik",
            Self::GatewayApi => "Envoy Gateway",
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traefik" => Ok(Self::Traefik),
            "gateway-api" | "gateway" | "gatewayapi" => Ok(Self::GatewayApi),
            other => Err(ModelError::unknown_target(other)),
        }
    }
}
