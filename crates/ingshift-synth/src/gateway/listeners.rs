//! HTTPS listener assignment
//!
//! One `https-N` listener per distinct primary host of a TLS route, numbered
//! over the fleet sorted by namespace and name. Every TLS secret of every
//! route sharing that host becomes a certificate on the same listener, so no
//! two listeners claim the same port and hostname. Anything unmapped falls
//! back to the placeholder `https` listener.

use std::collections::BTreeMap;

use ingshift_model::Route;

use super::httproute::redirect_status;

/// Section name of the plaintext listener
pub const HTTP_SECTION: &str = "http";
/// Section name of the fallback HTTPS listener
pub const PLACEHOLDER_SECTION: &str = "https";

/// Secret referenced by an HTTPS listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// TLS secret name
    pub secret: String,
    /// Namespace of the secret
    pub namespace: String,
}

/// One certificate-backed HTTPS listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsListener {
    /// `https-N`
    pub section: String,
    /// Primary host shared by the routes bound here
    pub hostname: Option<String>,
    /// Certificates in first-seen order, without duplicates
    pub certificates: Vec<Certificate>,
}

/// Fleet-wide listener layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerTable {
    listeners: Vec<TlsListener>,
    sections: BTreeMap<String, String>,
    placeholder: bool,
}

impl ListenerTable {
    /// Build the table from routes already sorted by namespace and name
    #[must_use]
    pub fn build(routes: &[&Route]) -> Self {
        let mut table = Self::default();
        let mut by_host: BTreeMap<Option<&str>, usize> = BTreeMap::new();
        for route in routes {
            if !route.tls_enabled || route.tls_secrets.is_empty() {
                continue;
            }
            let hostname = route.primary_host();
            let index = *by_host.entry(hostname).or_insert_with(|| {
                let section = format!("https-{}", table.listeners.len());
                if let Some(host) = hostname {
                    table.sections.insert(host.to_string(), section.clone());
                }
                table.listeners.push(TlsListener {
                    section,
                    hostname: hostname.map(str::to_string),
                    certificates: Vec::new(),
                });
                table.listeners.len() - 1
            });
            let certificates = &mut table.listeners[index].certificates;
            for secret in &route.tls_secrets {
                let certificate = Certificate {
                    secret: secret.clone(),
                    namespace: route.namespace.clone(),
                };
                if !certificates.contains(&certificate) {
                    certificates.push(certificate);
                }
            }
        }
        let unmapped_redirect = routes
            .iter()
            .any(|r| redirect_status(r).is_some() && table.section_for(r).is_none());
        table.placeholder = table.listeners.is_empty() || unmapped_redirect;
        table
    }

    /// Mapped section for the route's primary host
    #[must_use]
    pub fn section_for(&self, route: &Route) -> Option<&str> {
        route
            .primary_host()
            .and_then(|h| self.sections.get(h))
            .map(String::as_str)
    }

    /// Section a backend route binds to when its redirect is split off
    #[must_use]
    pub fn https_section(&self, route: &Route) -> &str {
        self.section_for(route).unwrap_or(PLACEHOLDER_SECTION)
    }

    /// Certificate-backed listeners in section order
    #[inline]
    #[must_use]
    pub fn listeners(&self) -> &[TlsListener] {
        &self.listeners
    }

    /// Whether the Gateway must declare the placeholder listener
    #[inline]
    #[must_use]
    pub fn needs_placeholder(&self) -> bool {
        self.placeholder
    }
}
