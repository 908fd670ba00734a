//! Catalog of known ingress-nginx annotations
//!
//! Every key that appears in a compatibility table is listed here with a
//! category and a one-line description. The catalog also carries a few keys
//! that neither target maps; those classify through the unknown sentinel.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Functional area of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationCategory {
    /// TLS and HTTPS redirects
    Tls,
    /// Authentication
    Auth,
    /// Path handling and redirects
    Routing,
    /// Session affinity
    Affinity,
    /// Rate and connection limits
    RateLimit,
    /// Proxy behavior and timeouts
    Proxy,
    /// Cross-origin resource sharing
    Cors,
    /// Header manipulation
    Headers,
    /// Source IP access control
    Access,
    /// Canary releases
    Canary,
    /// Backend protocol
    Protocol,
    /// Load balancing
    Lb,
}

impl AnnotationCategory {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tls => "tls",
            Self::Auth => "auth",
            Self::Routing => "routing",
            Self::Affinity => "affinity",
            Self::RateLimit => "ratelimit",
            Self::Proxy => "proxy",
            Self::Cors => "cors",
            Self::Headers => "headers",
            Self::Access => "access",
            Self::Canary => "canary",
            Self::Protocol => "protocol",
            Self::Lb => "lb",
        }
    }
}

impl Display for AnnotationCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One known annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnotationDef {
    /// Short key without prefix
    pub key: &'static str,
    /// Functional area
    pub category: AnnotationCategory,
    /// One-line description
    pub description: &'static str,
}

const fn def(key: &'static str, category: AnnotationCategory, description: &'static str) -> AnnotationDef {
    AnnotationDef {
        key,
        category,
        description,
    }
}

use AnnotationCategory::{
    Access, Affinity, Auth, Canary, Cors, Headers, Lb, Protocol, Proxy, RateLimit, Routing, Tls,
};

pub(crate) const CATALOG: &[AnnotationDef] = &[
    def("ssl-redirect", Tls, "Redirect HTTP to HTTPS"),
    def("force-ssl-redirect", Tls, "Force HTTPS redirect even behind a TLS-terminating proxy"),
    def("ssl-passthrough", Tls, "Pass TLS directly to the backend"),
    def("ssl-ciphers", Tls, "Custom TLS cipher list"),
    def("auth-tls-secret", Tls, "Client certificate authentication CA"),
    def("auth-tls-verify-client", Tls, "Client certificate verification mode"),
    def("secure-verify-ca-secret", Tls, "CA used to verify the backend certificate"),
    def("auth-url", Auth, "External authentication service URL"),
    def("auth-method", Auth, "HTTP method for the auth request"),
    def("auth-response-headers", Auth, "Headers copied from the auth response"),
    def("auth-request-redirect", Auth, "Redirect target for auth failures"),
    def("auth-type", Auth, "Authentication type (basic/digest)"),
    def("auth-secret", Auth, "Secret containing credentials"),
    def("auth-realm", Auth, "Authentication realm"),
    def("rewrite-target", Routing, "Rewrite the request path"),
    def("use-regex", Routing, "Enable regex path matching"),
    def("app-root", Routing, "Redirect requests for / to the application root"),
    def("permanent-redirect", Routing, "Permanent redirect URL"),
    def("temporal-redirect", Routing, "Temporary redirect URL"),
    def("from-to-www-redirect", Routing, "Redirect between the bare and www domains"),
    def("server-snippet", Routing, "Raw NGINX server block directives"),
    def("configuration-snippet", Routing, "Raw NGINX location block directives"),
    def("affinity", Affinity, "Session affinity type (cookie)"),
    def("affinity-mode", Affinity, "Affinity mode (balanced/persistent)"),
    def("session-cookie-name", Affinity, "Session cookie name"),
    def("session-cookie-path", Affinity, "Session cookie path"),
    def("session-cookie-samesite", Affinity, "SameSite cookie attribute"),
    def("session-cookie-conditional-samesite-none", Affinity, "SameSite=None only for compatible browsers"),
    def("session-cookie-expires", Affinity, "Session cookie expiry"),
    def("session-cookie-max-age", Affinity, "Session cookie max age"),
    def("session-cookie-secure", Affinity, "Secure flag for the session cookie"),
    def("session-cookie-change-on-failure", Affinity, "Reissue the session cookie when the backend fails"),
    def("limit-rps", RateLimit, "Requests per second per client"),
    def("limit-rpm", RateLimit, "Requests per minute per client"),
    def("limit-connections", RateLimit, "Concurrent connections per client"),
    def("limit-burst-multiplier", RateLimit, "Burst multiplier for rate limits"),
    def("limit-whitelist", RateLimit, "Client ranges exempt from rate limits"),
    def("proxy-body-size", Proxy, "Max request body size"),
    def("proxy-read-timeout", Proxy, "Backend read timeout"),
    def("proxy-send-timeout", Proxy, "Backend send timeout"),
    def("proxy-connect-timeout", Proxy, "Backend connect timeout"),
    def("proxy-buffering", Proxy, "Response buffering"),
    def("proxy-request-buffering", Proxy, "Request body buffering"),
    def("proxy-buffer-size", Proxy, "Proxy buffer size"),
    def("proxy-next-upstream", Proxy, "Conditions for retrying the next upstream"),
    def("proxy-http-version", Proxy, "HTTP version used towards the backend"),
    def("proxy-ssl-secret", Proxy, "Client certificate for backend TLS"),
    def("client-body-buffer-size", Proxy, "Client body buffer size"),
    def("enable-cors", Cors, "Enable CORS"),
    def("cors-allow-origin", Cors, "Allowed origins"),
    def("cors-allow-methods", Cors, "Allowed methods"),
    def("cors-allow-headers", Cors, "Allowed request headers"),
    def("cors-expose-headers", Cors, "Exposed response headers"),
    def("cors-allow-credentials", Cors, "Allow credentials"),
    def("cors-max-age", Cors, "Preflight cache duration"),
    def("custom-headers", Headers, "Custom headers from a ConfigMap"),
    def("upstream-vhost", Headers, "Host header sent to the backend"),
    def("whitelist-source-range", Access, "Allowed client CIDR ranges"),
    def("denylist-source-range", Access, "Blocked client CIDR ranges"),
    def("canary", Canary, "Mark the Ingress as a canary"),
    def("canary-weight", Canary, "Canary traffic weight"),
    def("canary-weight-total", Canary, "Total weight denominator"),
    def("canary-by-header", Canary, "Header that routes to the canary"),
    def("canary-by-header-value", Canary, "Header value that routes to the canary"),
    def("canary-by-cookie", Canary, "Cookie that routes to the canary"),
    def("websocket-services", Protocol, "Services that use WebSocket"),
    def("grpc-backend", Protocol, "Backend speaks gRPC"),
    def("backend-protocol", Protocol, "Backend protocol (HTTP/HTTPS/GRPC/GRPCS/AJP/FCGI)"),
    def("service-upstream", Lb, "Route to the Service IP instead of endpoints"),
    def("upstream-hash-by", Lb, "Consistent hash key"),
    def("load-balance", Lb, "Load balancing algorithm"),
];
