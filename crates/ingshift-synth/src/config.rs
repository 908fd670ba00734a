//! Synthesizer configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Values are checked by [`SynthConfig::validate`] after
//! loading.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Knobs shared by both synthesizers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Name of the shared Gateway
    pub gateway_name: String,
    /// Namespace of the shared Gateway
    pub gateway_namespace: String,
    /// GatewayClass name
    pub gateway_class: String,
    /// GatewayClass controller
    pub gateway_controller: String,
    /// Gateway API CRD release
    pub gateway_api_version: String,
    /// Envoy Gateway chart version
    pub envoy_gateway_version: String,
    /// Traefik chart version; latest when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traefik_chart_version: Option<String>,
    /// Secret named by the placeholder HTTPS listener
    pub placeholder_tls_secret: String,
    /// Ingress class written when a route has none
    pub default_ingress_class: String,
    /// Requests per second used when a rate value does not parse
    pub default_rate_limit: u32,
    /// Traefik burst used when no multiplier is given
    pub default_burst: u32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            gateway_name: "ingshift-gateway".to_string(),
            gateway_namespace: "default".to_string(),
            gateway_class: "eg".to_string(),
            gateway_controller: "gateway.envoyproxy.io/gatewayclass-controller".to_string(),
            gateway_api_version: "v1.2.0".to_string(),
            envoy_gateway_version: "v1.2.0".to_string(),
            traefik_chart_version: None,
            placeholder_tls_secret: "ingshift-placeholder-tls".to_string(),
            default_ingress_class: "nginx".to_string(),
            default_rate_limit: 100,
            default_burst: 200,
        }
    }
}

impl SynthConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the Gateway name and namespace
    #[inline]
    #[must_use]
    pub fn with_gateway(mut self, name: &str, namespace: &str) -> Self {
        self.gateway_name = name.to_string();
        self.gateway_namespace = namespace.to_string();
        self
    }

    /// Set the GatewayClass name
    #[inline]
    #[must_use]
    pub fn with_gateway_class(mut self, class: &str) -> Self {
        self.gateway_class = class.to_string();
        self
    }

    /// Pin the Traefik chart version
    #[inline]
    #[must_use]
    pub fn with_traefik_chart_version(mut self, version: &str) -> Self {
        self.traefik_chart_version = Some(version.to_string());
        self
    }

    /// Set the fallback ingress class
    #[inline]
    #[must_use]
    pub fn with_default_ingress_class(mut self, class: &str) -> Self {
        self.default_ingress_class = class.to_string();
        self
    }

    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_name("gateway_name", &self.gateway_name)?;
        check_name("gateway_namespace", &self.gateway_namespace)?;
        check_name("gateway_class", &self.gateway_class)?;
        check_name("placeholder_tls_secret", &self.placeholder_tls_secret)?;
        check_name("default_ingress_class", &self.default_ingress_class)?;
        if self.gateway_controller.trim().is_empty() {
            return Err(ConfigError::invalid("gateway_controller", "must not be empty"));
        }
        check_version("gateway_api_version", &self.gateway_api_version)?;
        check_version("envoy_gateway_version", &self.envoy_gateway_version)?;
        if self.default_rate_limit == 0 {
            return Err(ConfigError::invalid("default_rate_limit", "must be positive"));
        }
        if self.default_burst == 0 {
            return Err(ConfigError::invalid("default_burst", "must be positive"));
        }
        Ok(())
    }
}

/// Kubernetes object names must be lowercase RFC 1123 labels
fn check_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.len() > 63 {
        return Err(ConfigError::invalid(field, "must be 1 to 63 characters"));
    }
    let valid_chars = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || value.starts_with('-') || value.ends_with('-') {
        return Err(ConfigError::invalid(
            field,
            format!("{value:?} is not a lowercase RFC 1123 label"),
        ));
    }
    Ok(())
}

fn check_version(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let digits = value.strip_prefix('v').unwrap_or_default();
    let numeric = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if digits.is_empty() || !digits.split('.').all(numeric) {
        return Err(ConfigError::invalid(field, format!("{value:?} is not a vX.Y.Z release tag")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SynthConfig::from_toml("").unwrap();
        assert_eq!(config, SynthConfig::default());
    }

    #[test]
    fn partial_document_overrides() {
        let config = SynthConfig::from_toml(
            "gateway_name = \"edge\"\ngateway_namespace = \"infra\"\ndefault_burst = 50\n",
        )
        .unwrap();
        assert_eq!(config.gateway_name, "edge");
        assert_eq!(config.gateway_namespace, "infra");
        assert_eq!(config.default_burst, 50);
        assert_eq!(config.gateway_class, "eg");
        assert_eq!(config.placeholder_tls_secret, "ingshift-placeholder-tls");
    }

    #[test]
    fn placeholder_secret_checked() {
        let config = SynthConfig::from_toml("placeholder_tls_secret = \"edge-tls\"\n").unwrap();
        assert_eq!(config.placeholder_tls_secret, "edge-tls");
        let err = SynthConfig::from_toml("placeholder_tls_secret = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "placeholder_tls_secret", .. }));
    }

    #[test]
    fn unknown_field_rejected() {
        let err = SynthConfig::from_toml("gateway = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_name_rejected() {
        let err = SynthConfig::from_toml("gateway_name = \"Edge_GW\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gateway_name", .. }));
    }

    #[test]
    fn bad_version_rejected() {
        let err = SynthConfig::from_toml("gateway_api_version = \"1.2\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gateway_api_version", .. }));
    }

    #[test]
    fn builders_stay_valid() {
        let config = SynthConfig::default()
            .with_gateway("edge", "infra")
            .with_gateway_class("envoy")
            .with_traefik_chart_version("34.1.0")
            .with_default_ingress_class("public");
        assert!(config.validate().is_ok());
        assert_eq!(config.traefik_chart_version.as_deref(), Some("34.1.0"));
    }

    #[test]
    fn zero_rate_rejected() {
        let config = SynthConfig {
            default_rate_limit: 0,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
