//! Route snapshots
//!
//! A [`Route`] is one Ingress object as extracted from a cluster. The raw
//! annotation map is kept intact; [`Route::nginx_annotations`] holds only
//! the `nginx.ingress.kubernetes.io/` keys with that prefix removed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Annotation prefix recognized as legacy controller configuration
pub const NGINX_PREFIX: &str = "nginx.ingress.kubernetes.io/";

const UNSUPPORTED_KEYS: &[&str] = &[
    "proxy-body-size",
    "client-body-buffer-size",
    "snippets",
    "lua-resty-waf",
    "modsecurity-snippet",
];

const COMPLEX_KEYS: &[&str] = &[
    "auth-url",
    "auth-response-headers",
    "canary",
    "canary-weight",
    "limit-rps",
    "limit-connections",
    "rewrite-target",
    "use-regex",
    "affinity",
    "whitelist-source-range",
    "denylist-source-range",
    "proxy-read-timeout",
    "proxy-connect-timeout",
];

/// Advisory triage tier shown next to a route
///
/// Only used for display. Classification never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    /// Basic host/path routing only
    #[default]
    Simple,
    /// Uses annotations that need migration work
    Complex,
    /// Uses annotations with no clean equivalent
    Unsupported,
}

impl ComplexityTier {
    /// Assess a filtered (prefix-stripped) annotation map
    #[must_use]
    pub fn assess(nginx: &BTreeMap<String, String>) -> Self {
        if nginx.keys().any(|k| UNSUPPORTED_KEYS.contains(&k.as_str())) {
            Self::Unsupported
        } else if nginx.keys().any(|k| COMPLEX_KEYS.contains(&k.as_str())) {
            Self::Complex
        } else {
            Self::Simple
        }
    }
}

/// One host/path rule of a route
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    /// Host the rule applies to; empty for the default host
    #[serde(default)]
    pub host: String,
    /// Request path
    #[serde(default)]
    pub path: String,
    /// `Prefix`, `Exact` or `ImplementationSpecific`
    #[serde(default)]
    pub path_type: String,
    /// Backend service name
    #[serde(default)]
    pub service_name: String,
    /// Backend service port; 0 when unset
    #[serde(default)]
    pub service_port: u16,
}

impl PathRule {
    /// Create a rule for `host` + `path` backed by `service:port`
    #[must_use]
    pub fn new(host: &str, path: &str, service: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            path: path.to_string(),
            path_type: "Prefix".to_string(),
            service_name: service.to_string(),
            service_port: port,
        }
    }

    /// Set the path type
    #[inline]
    #[must_use]
    pub fn with_path_type(mut self, path_type: &str) -> Self {
        self.path_type = path_type.to_string();
        self
    }
}

/// A read-only snapshot of one Ingress object
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Namespace
    pub namespace: String,
    /// Object name
    pub name: String,
    /// `spec.ingressClassName`, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_class: Option<String>,
    /// Hostnames, sorted
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Path rules in declaration order
    #[serde(default)]
    pub paths: Vec<PathRule>,
    /// Whether any TLS block is present
    #[serde(default)]
    pub tls_enabled: bool,
    /// TLS secret names
    #[serde(default)]
    pub tls_secrets: Vec<String>,
    /// Every annotation on the object
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    /// Legacy controller annotations, prefix removed
    #[serde(default)]
    pub nginx_annotations: BTreeMap<String, String>,
    /// Advisory triage tier
    #[serde(default)]
    pub complexity: ComplexityTier,
}

impl Route {
    /// Create an empty route
    #[must_use]
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a hostname, keeping the list sorted and unique
    #[must_use]
    pub fn with_host(mut self, host: &str) -> Self {
        if let Err(pos) = self.hosts.binary_search_by(|h| h.as_str().cmp(host)) {
            self.hosts.insert(pos, host.to_string());
        }
        self
    }

    /// Append a path rule; its host is added to the host list
    #[must_use]
    pub fn with_path(mut self, rule: PathRule) -> Self {
        let host = rule.host.clone();
        self.paths.push(rule);
        if host.is_empty() {
            self
        } else {
            self.with_host(&host)
        }
    }

    /// Reference a TLS secret
    #[must_use]
    pub fn with_tls_secret(mut self, secret: &str) -> Self {
        self.tls_enabled = true;
        self.tls_secrets.push(secret.to_string());
        self
    }

    /// Set the ingress class name
    #[inline]
    #[must_use]
    pub fn with_ingress_class(mut self, class: &str) -> Self {
        self.ingress_class = Some(class.to_string());
        self
    }

    /// Add a raw annotation, mirroring it into the filtered map when prefixed
    #[must_use]
    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        if let Some(short) = key.strip_prefix(NGINX_PREFIX) {
            self.nginx_annotations
                .insert(short.to_string(), value.to_string());
        }
        self.complexity = ComplexityTier::assess(&self.nginx_annotations);
        self
    }

    /// Add a legacy annotation by its short key
    #[inline]
    #[must_use]
    pub fn with_nginx(self, short_key: &str, value: &str) -> Self {
        self.with_annotation(&format!("{NGINX_PREFIX}{short_key}"), value)
    }

    /// Restore the filtered-map invariant on a deserialized snapshot
    ///
    /// Keys present only in the filtered map are written back into the raw
    /// map, then the filtered map is rebuilt from the raw map. Hosts are
    /// sorted and deduplicated and the complexity tier is reassessed.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for (short, value) in &self.nginx_annotations {
            self.annotations
                .entry(format!("{NGINX_PREFIX}{short}"))
                .or_insert_with(|| value.clone());
        }
        self.nginx_annotations = self
            .annotations
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(NGINX_PREFIX)
                    .map(|short| (short.to_string(), v.clone()))
            })
            .collect();
        for rule in &self.paths {
            if !rule.host.is_empty() && !self.hosts.contains(&rule.host) {
                self.hosts.push(rule.host.clone());
            }
        }
        self.hosts.sort();
        self.hosts.dedup();
        if !self.tls_secrets.is_empty() {
            self.tls_enabled = true;
        }
        self.complexity = ComplexityTier::assess(&self.nginx_annotations);
        self
    }

    /// Legacy annotation value by short key
    #[inline]
    #[must_use]
    pub fn nginx(&self, short_key: &str) -> Option<&str> {
        self.nginx_annotations.get(short_key).map(String::as_str)
    }

    /// Whether a legacy annotation is present
    #[inline]
    #[must_use]
    pub fn has_nginx(&self, short_key: &str) -> bool {
        self.nginx_annotations.contains_key(short_key)
    }

    /// Whether a legacy annotation is exactly `"true"`
    #[inline]
    #[must_use]
    pub fn nginx_is_true(&self, short_key: &str) -> bool {
        self.nginx(short_key).is_some_and(|v| v.trim() == "true")
    }

    /// Whether regex paths are enabled
    ///
    /// True whenever `use-regex` is present, whatever its value.
    #[inline]
    #[must_use]
    pub fn regex_enabled(&self) -> bool {
        self.has_nginx("use-regex")
    }

    /// First hostname, if any
    #[inline]
    #[must_use]
    pub fn primary_host(&self) -> Option<&str> {
        self.hosts.first().map(String::as_str)
    }

    /// `namespace/name`
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// `namespace-name`, used in file names
    #[inline]
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.namespace, self.name)
    }
}
