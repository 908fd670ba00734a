//! Generated artifacts

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;

/// What kind of step an artifact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactCategory {
    /// Controller or CRD installation
    Install,
    /// Shared gateway infrastructure
    Gateway,
    /// Traefik Middleware objects
    Middleware,
    /// Rewritten Ingress objects
    Ingress,
    /// Gateway API HTTPRoute objects
    #[serde(rename = "httproute")]
    HttpRoute,
    /// Envoy Gateway policy objects
    Policy,
    /// Verification scripts
    Verify,
    /// Human-facing guides and reports
    Guide,
    /// Legacy controller removal
    Cleanup,
}

impl ArtifactCategory {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Gateway => "gateway",
            Self::Middleware => "middleware",
            Self::Ingress => "ingress",
            Self::HttpRoute => "httproute",
            Self::Policy => "policy",
            Self::Verify => "verify",
            Self::Guide => "guide",
            Self::Cleanup => "cleanup",
        }
    }
}

impl Display for ArtifactCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    /// Path relative to the output root, unique within a run
    pub relative_path: String,
    /// File content
    pub content: String,
    /// One-line description
    pub description: String,
    /// Step category
    pub category: ArtifactCategory,
}

impl GeneratedArtifact {
    /// Create an artifact
    #[must_use]
    pub fn new(
        relative_path: impl Into<String>,
        category: ArtifactCategory,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
            description: description.into(),
            category,
        }
    }

    /// Blake3 digest of the content
    #[inline]
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        ContentHash::compute(self.content.as_bytes())
    }

    /// Whether the artifact is a shell script
    #[inline]
    #[must_use]
    pub fn is_script(&self) -> bool {
        std::path::Path::new(&self.relative_path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("sh"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&ArtifactCategory::HttpRoute).unwrap();
        assert_eq!(json, "\"httproute\"");
        assert_eq!(ArtifactCategory::HttpRoute.to_string(), "httproute");
    }

    #[test]
    fn digest_tracks_content() {
        let a = GeneratedArtifact::new("04-verify.sh", ArtifactCategory::Verify, "verify", "echo ok\n");
        let b = GeneratedArtifact::new("other.sh", ArtifactCategory::Verify, "other", "echo ok\n");
        assert_eq!(a.digest(), b.digest());
        assert!(a.is_script());
    }
}
