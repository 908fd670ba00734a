//! Gateway API / Envoy Gateway compatibility table

use ingshift_model::CompatibilityStatus::{Partial as P, Supported as S, Unsupported as U};

use crate::entry::CompatibilityEntry as E;

pub(crate) const ENTRIES: &[(&str, E)] = &[
    // TLS / redirect
    ("ssl-redirect", E::new(S, "HTTPRoute (RequestRedirect filter)", "RequestRedirect filter with scheme=https")),
    ("force-ssl-redirect", E::new(S, "HTTPRoute (RequestRedirect filter)", "301 redirect to HTTPS")),
    ("ssl-passthrough", E::new(P, "TLSRoute", "TLS passthrough via TLSRoute")),
    ("secure-verify-ca-secret", E::new(P, "BackendTLSPolicy", "BackendTLSPolicy with caCertificateRefs for backend TLS verification")),
    // Routing
    ("rewrite-target", E::new(S, "HTTPRoute (URLRewrite filter)", "Path rewrite via URLRewrite filter")),
    ("use-regex", E::new(S, "HTTPRoute (PathMatch RegularExpression)", "Native regex path matching")),
    ("permanent-redirect", E::new(S, "HTTPRoute (RequestRedirect)", "301 redirect filter")),
    ("temporal-redirect", E::new(S, "HTTPRoute (RequestRedirect)", "302 redirect filter")),
    ("from-to-www-redirect", E::new(S, "HTTPRoute (RequestRedirect)", "RequestRedirect filter with hostname replacement")),
    ("app-root", E::new(P, "HTTPRoute (URLRewrite)", "URLRewrite on the root path; limited to an exact match on /")),
    ("configuration-snippet", E::new(U, "", "NGINX-specific; no equivalent")),
    ("server-snippet", E::new(U, "", "NGINX-specific; no equivalent")),
    // Headers
    ("custom-headers", E::new(S, "HTTPRoute (ResponseHeaderModifier)", "Response header manipulation filter")),
    ("upstream-vhost", E::new(S, "HTTPRoute (RequestHeaderModifier)", "RequestHeaderModifier filter sets the Host header")),
    // Canary
    ("canary", E::new(S, "HTTPRoute (weighted backendRefs)", "Traffic split via backendRefs weights")),
    ("canary-weight", E::new(S, "HTTPRoute (weighted backendRefs)", "Weight value in backendRefs")),
    ("canary-weight-total", E::new(S, "HTTPRoute (weighted backendRefs)", "backendRefs weights are relative; total is implicit")),
    ("canary-by-header", E::new(S, "HTTPRoute (header match)", "Match header in HTTPRouteMatch")),
    ("canary-by-header-value", E::new(S, "HTTPRoute (header match)", "Exact header value match")),
    ("canary-by-cookie", E::new(U, "", "Cookie-based canary routing requires ExtensionRef; not in core Gateway API")),
    // CORS
    ("enable-cors", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Manual CORS headers; no native CORS filter in v1")),
    ("cors-allow-origin", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Set Access-Control-Allow-Origin header")),
    ("cors-allow-methods", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Set Access-Control-Allow-Methods header")),
    ("cors-allow-headers", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Set Access-Control-Allow-Headers header")),
    ("cors-allow-credentials", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Set Access-Control-Allow-Credentials header")),
    ("cors-expose-headers", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Set Access-Control-Expose-Headers via ResponseHeaderModifier")),
    ("cors-max-age", E::new(P, "HTTPRoute (ResponseHeaderModifier)", "Set Access-Control-Max-Age via ResponseHeaderModifier")),
    // Authentication
    ("auth-url", E::new(P, "SecurityPolicy (ExtensionRef)", "Envoy Gateway SecurityPolicy with ext-auth")),
    ("auth-response-headers", E::new(P, "SecurityPolicy (ExtensionRef)", "Part of SecurityPolicy ext-auth config")),
    ("auth-type", E::new(U, "", "No basic auth in core Gateway API")),
    ("auth-secret", E::new(U, "", "No basic auth in core Gateway API")),
    // Rate limiting
    ("limit-rps", E::new(P, "BackendTrafficPolicy (RateLimit)", "Envoy Gateway BackendTrafficPolicy")),
    ("limit-rpm", E::new(P, "BackendTrafficPolicy (RateLimit)", "Rate limit with unit Minute")),
    ("limit-connections", E::new(P, "BackendTrafficPolicy (CircuitBreaker)", "Circuit breaker policy")),
    ("limit-burst-multiplier", E::new(P, "BackendTrafficPolicy (RateLimit)", "Burst is configurable but uses tokens, not a multiplier")),
    ("limit-whitelist", E::new(U, "", "Per-IP rate limit exemption list is not in BackendTrafficPolicy")),
    // Access control
    ("whitelist-source-range", E::new(P, "SecurityPolicy (IPFilter)", "Envoy Gateway SecurityPolicy authorization with Allow rules")),
    ("denylist-source-range", E::new(P, "SecurityPolicy (IPFilter)", "Envoy Gateway SecurityPolicy IP filter")),
    // Session affinity
    ("affinity", E::new(P, "BackendLBPolicy (SessionPersistence)", "Gateway API v1.1 SessionPersistence")),
    ("affinity-mode", E::new(P, "BackendLBPolicy (SessionPersistence)", "Cookie persistence only; balanced re-balancing unavailable")),
    ("session-cookie-name", E::new(P, "BackendLBPolicy", "Cookie name in SessionPersistence")),
    ("session-cookie-expires", E::new(P, "BackendLBPolicy (absoluteTimeout)", "cookieConfig.lifetimeType Permanent with absoluteTimeout")),
    ("session-cookie-max-age", E::new(P, "BackendLBPolicy (absoluteTimeout)", "cookieConfig.absoluteTimeout field")),
    ("session-cookie-samesite", E::new(U, "", "SameSite is not configurable in BackendLBPolicy")),
    ("session-cookie-path", E::new(U, "", "Cookie path scoping is not in BackendLBPolicy")),
    ("session-cookie-secure", E::new(U, "", "Secure flag is not configurable in BackendLBPolicy")),
    ("session-cookie-conditional-samesite-none", E::new(U, "", "No Gateway API or Envoy Gateway equivalent")),
    ("session-cookie-change-on-failure", E::new(U, "", "No Gateway API equivalent")),
    // Proxy
    ("proxy-read-timeout", E::new(P, "HTTPRoute (timeouts)", "HTTPRoute spec.rules[].timeouts.backendRequest")),
    ("proxy-connect-timeout", E::new(P, "HTTPRoute (timeouts)", "Not emitted; timeouts.request bounds the whole request and must not be shorter than backendRequest")),
    ("proxy-send-timeout", E::new(U, "", "Only backendRequest (from proxy-read-timeout) is supported")),
    ("proxy-buffering", E::new(U, "", "No Gateway API or Envoy Gateway equivalent")),
    ("proxy-body-size", E::new(P, "BackendTrafficPolicy (requestBuffer)", "BackendTrafficPolicy with requestBuffer.limit")),
    ("proxy-request-buffering", E::new(S, "Native", "Envoy Gateway streams requests by default")),
    ("proxy-http-version", E::new(S, "Native", "Envoy Gateway handles HTTP/2 and HTTP/1.1 natively")),
    ("client-body-buffer-size", E::new(U, "", "No Gateway API equivalent")),
    // Protocol
    ("backend-protocol", E::new(P, "Gateway TLS config", "TLS backend via Gateway listener config")),
    ("websocket-services", E::new(S, "Native", "Gateway API supports WebSocket natively")),
    ("grpc-backend", E::new(S, "GRPCRoute", "Dedicated GRPCRoute resource")),
    ("service-upstream", E::new(S, "Native", "Gateway API routes to pod IPs natively")),
    // Load balancing
    ("load-balance", E::new(U, "", "Not configurable via Gateway API")),
    ("upstream-hash-by", E::new(U, "", "Not in core Gateway API")),
];
