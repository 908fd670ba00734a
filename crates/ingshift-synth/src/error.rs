//! Synthesis and configuration errors

use thiserror::Error;

/// Failure while producing manifests
///
/// Unparseable annotation values never surface here; they fall back to a
/// default and leave a note in the generated file instead.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A manifest object could not be serialized
    #[error("failed to render {path}: {source}")]
    Render {
        /// Artifact being rendered
        path: String,
        /// Serializer error
        #[source]
        source: serde_yaml::Error,
    },

    /// Two artifacts would be written to the same path
    #[error("duplicate artifact path: {0}")]
    DuplicatePath(String),
}

impl SynthError {
    /// Create a render error for `path`
    #[inline]
    pub fn render(path: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }
}

/// Invalid synthesizer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document did not parse
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid-field error
    #[inline]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for synthesis
pub type Result<T> = std::result::Result<T, SynthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_display() {
        let err = ConfigError::invalid("gateway_name", "must not be empty");
        assert_eq!(err.to_string(), "invalid value for gateway_name: must not be empty");
    }

    #[test]
    fn duplicate_path_display() {
        let err = SynthError::DuplicatePath("04-httproutes/a-b.yaml".into());
        assert!(err.to_string().contains("04-httproutes/a-b.yaml"));
    }
}
