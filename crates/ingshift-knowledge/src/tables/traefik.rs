//! Traefik v3 compatibility table

use ingshift_model::CompatibilityStatus::{Partial as P, Supported as S, Unsupported as U};

use crate::entry::CompatibilityEntry as E;

pub(crate) const ENTRIES: &[(&str, E)] = &[
    // TLS / redirect
    ("ssl-redirect", E::new(S, "Middleware (RedirectScheme)", "Generates RedirectScheme middleware")),
    ("force-ssl-redirect", E::new(S, "Middleware (RedirectScheme)", "Permanent redirect to HTTPS")),
    ("ssl-passthrough", E::new(P, "Traefik TCP router", "Requires an IngressRouteTCP with a passthrough TLS entrypoint")),
    // CORS
    ("enable-cors", E::new(S, "Middleware (Headers)", "Generates CORS Headers middleware")),
    ("cors-allow-origin", E::new(S, "Middleware (Headers)", "Part of Headers CORS middleware")),
    ("cors-allow-methods", E::new(S, "Middleware (Headers)", "Part of Headers CORS middleware")),
    ("cors-allow-headers", E::new(S, "Middleware (Headers)", "Part of Headers CORS middleware")),
    ("cors-expose-headers", E::new(S, "Middleware (Headers)", "Part of Headers CORS middleware")),
    ("cors-allow-credentials", E::new(S, "Middleware (Headers)", "Part of Headers CORS middleware")),
    ("cors-max-age", E::new(S, "Middleware (Headers)", "Part of Headers CORS middleware")),
    // Session affinity
    ("affinity", E::new(S, "Service sticky annotation", "Traefik sticky cookie on Service")),
    ("affinity-mode", E::new(P, "Service (sticky cookie)", "Traefik always uses persistent affinity; balanced re-balancing is not available")),
    ("session-cookie-name", E::new(S, "Service sticky annotation", "Cookie name for session affinity")),
    ("session-cookie-path", E::new(P, "Service sticky annotation", "Limited path support")),
    ("session-cookie-samesite", E::new(S, "Service sticky annotation", "SameSite attribute")),
    ("session-cookie-secure", E::new(S, "Service sticky annotation", "Secure flag")),
    ("session-cookie-expires", E::new(P, "Service (sticky cookie maxage)", "Convert seconds to the service.sticky.cookie.maxage annotation on the Service")),
    ("session-cookie-max-age", E::new(S, "Service (sticky cookie maxage)", "Maps to the service.sticky.cookie.maxage annotation on the Service")),
    ("session-cookie-conditional-samesite-none", E::new(U, "", "Traefik sets SameSite statically; no User-Agent conditional logic")),
    ("session-cookie-change-on-failure", E::new(U, "", "No Traefik equivalent")),
    // Rate limiting
    ("limit-rps", E::new(S, "Middleware (RateLimit)", "Generates RateLimit middleware")),
    ("limit-rpm", E::new(S, "Middleware (RateLimit)", "Converted to an average rate over one minute")),
    ("limit-connections", E::new(S, "Middleware (InFlightReq)", "Max concurrent requests")),
    ("limit-burst-multiplier", E::new(S, "Middleware (RateLimit)", "Burst size multiplier")),
    ("limit-whitelist", E::new(S, "Middleware (RateLimit)", "Exempt IPs from rate limiting")),
    // Authentication
    ("auth-url", E::new(S, "Middleware (ForwardAuth)", "Generates ForwardAuth middleware")),
    ("auth-method", E::new(P, "Middleware (ForwardAuth)", "Only GET/POST supported")),
    ("auth-response-headers", E::new(S, "Middleware (ForwardAuth)", "Headers passed after auth")),
    ("auth-request-redirect", E::new(P, "Middleware (ForwardAuth)", "Redirect URL for auth failure")),
    ("auth-type", E::new(P, "Middleware (BasicAuth)", "Basic auth only; digest not supported")),
    ("auth-secret", E::new(P, "Middleware (BasicAuth)", "Secret format differs from NGINX")),
    ("auth-realm", E::new(S, "Middleware (BasicAuth)", "Auth realm")),
    // Access control
    ("whitelist-source-range", E::new(S, "Middleware (IPAllowList)", "Generates IPAllowList middleware")),
    ("denylist-source-range", E::new(S, "Middleware (IPDenyList)", "Generates IPDenyList middleware")),
    // Headers
    ("custom-headers", E::new(P, "Middleware (Headers)", "ConfigMap ref not supported; inline headers needed")),
    ("upstream-vhost", E::new(P, "Middleware (Headers) + passhostheader", "Headers middleware sets the Host header; disable passhostheader on the Service")),
    // Routing
    ("rewrite-target", E::new(S, "Middleware (ReplacePath/AddPrefix)", "URL rewrite middleware")),
    ("use-regex", E::new(S, "Router (native)", "Traefik supports regex routing natively")),
    ("app-root", E::new(S, "Router + Middleware", "Redirect root path")),
    ("permanent-redirect", E::new(S, "Middleware (RedirectRegex)", "Permanent redirect")),
    ("temporal-redirect", E::new(S, "Middleware (RedirectRegex)", "Temporary redirect")),
    ("from-to-www-redirect", E::new(P, "Middleware (RedirectRegex)", "Requires RedirectRegex middleware and a separate Ingress entry for www")),
    ("configuration-snippet", E::new(U, "", "NGINX-specific; intentionally not supported")),
    ("server-snippet", E::new(U, "", "NGINX-specific; intentionally not supported")),
    // Canary
    ("canary", E::new(S, "Weighted Services", "Weighted backend traffic splitting")),
    ("canary-weight", E::new(S, "Weighted Services", "Traffic weight percentage")),
    ("canary-weight-total", E::new(S, "Weighted Services", "Traefik uses relative weights; total is implicit")),
    ("canary-by-header", E::new(P, "Router rules", "Header matching in router rules")),
    ("canary-by-header-value", E::new(P, "Router rules", "Header value matching")),
    ("canary-by-cookie", E::new(P, "Router rules", "Cookie-based routing via rules")),
    // Proxy
    ("proxy-read-timeout", E::new(P, "ServersTransport CRD", "Requires ServersTransport resource")),
    ("proxy-send-timeout", E::new(P, "ServersTransport CRD", "Requires ServersTransport resource")),
    ("proxy-connect-timeout", E::new(P, "ServersTransport CRD", "Requires ServersTransport resource")),
    ("proxy-http-version", E::new(P, "ServersTransport CRD", "HTTP/2 via ServersTransport; HTTP/1.0 not supported")),
    ("proxy-buffering", E::new(U, "", "No direct Traefik equivalent")),
    ("proxy-body-size", E::new(P, "Middleware (Buffering)", "Traefik Buffering middleware with maxRequestBodyBytes")),
    ("proxy-request-buffering", E::new(P, "Native (off by default)", "Off is the default; enabling request buffering requires Buffering middleware")),
    ("client-body-buffer-size", E::new(U, "", "No Traefik equivalent")),
    // Protocol
    ("backend-protocol", E::new(P, "Service annotation", "HTTPS/GRPC backends need ServersTransport")),
    ("websocket-services", E::new(S, "Native", "Traefik supports WebSocket natively")),
    ("grpc-backend", E::new(P, "ServersTransport + h2c", "gRPC requires h2c configuration")),
    ("secure-verify-ca-secret", E::new(P, "ServersTransport (rootCAs)", "ServersTransport CRD referencing the CA secret")),
    ("service-upstream", E::new(S, "Service annotation (nativelb)", "Set traefik.ingress.kubernetes.io/service.nativelb: 'true' on the Service")),
    // Load balancing
    ("upstream-hash-by", E::new(U, "", "Hash-based LB not supported in Traefik Ingress")),
    ("load-balance", E::new(U, "", "Traefik uses round-robin; custom LB not available via Ingress")),
];
