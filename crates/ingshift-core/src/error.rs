//! Error types for the migration entry points

use std::path::PathBuf;

use ingshift_model::ModelError;
use ingshift_synth::{ConfigError, SynthError};

/// Result alias for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Failure of a whole migration call
///
/// Calls are all-or-nothing: no partial artifact list accompanies an error.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Target name is not `traefik` or `gateway-api`
    #[error("unknown target '{0}': expected 'traefik' or 'gateway-api'")]
    UnknownTarget(String),

    /// Route input could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Route input is not valid JSON
    #[error("invalid JSON route input: {0}")]
    Json(#[from] serde_json::Error),

    /// Route input is not valid YAML
    #[error("invalid YAML route input: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Synthesizer configuration rejected
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Manifest generation failed
    #[error(transparent)]
    Synth(#[from] SynthError),

    /// Model value rejected
    #[error(transparent)]
    Model(ModelError),
}

impl MigrationError {
    /// Create an I/O error for `path`
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ModelError> for MigrationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownTarget(name) => Self::UnknownTarget(name),
            other => Self::Model(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_lifted_from_model() {
        let err: MigrationError = ModelError::unknown_target("haproxy").into();
        assert!(matches!(err, MigrationError::UnknownTarget(ref n) if n == "haproxy"));
        assert!(err.to_string().contains("'haproxy'"));
    }

    #[test]
    fn io_display_names_path() {
        let err = MigrationError::io("routes.json", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("failed to read routes.json"));
    }
}
