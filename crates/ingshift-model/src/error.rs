//! Error types for the data model

/// Result alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while interpreting model values
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Target name is not one of the supported dialects
    #[error("unknown target '{0}': expected 'traefik' or 'gateway-api'")]
    UnknownTarget(String),

    /// Digest string has the wrong number of bytes
    #[error("invalid digest length: expected {expected}, got {actual}")]
    InvalidDigestLength {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },

    /// Digest string is not valid hex
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

impl ModelError {
    /// Create an unknown target error
    #[inline]
    pub fn unknown_target(name: impl Into<String>) -> Self {
        Self::UnknownTarget(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_display_lists_choices() {
        let err = ModelError::unknown_target("haproxy");
        let msg = err.to_string();
        assert!(msg.contains("haproxy"));
        assert!(msg.contains("gateway-api"));
    }

    #[test]
    fn digest_length_display() {
        let err = ModelError::InvalidDigestLength {
            expected: 32,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "invalid digest length: expected 32, got 4"
        );
    }
}
