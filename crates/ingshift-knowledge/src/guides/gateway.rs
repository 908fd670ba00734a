//! Remediation guides for Gateway API / Envoy Gateway

use crate::entry::AnnotationGuide as G;

const CORS_EXAMPLE: &str = "filters:\n  - type: ResponseHeaderModifier\n    responseHeaderModifier:\n      set:\n        - name: Access-Control-Allow-Origin\n          value: \"https://app.example.com\"\n        - name: Access-Control-Allow-Methods\n          value: \"GET, POST, OPTIONS\"";

const SESSION_DOCS: &str =
    "https://gateway-api.sigs.k8s.io/reference/spec/#gateway.networking.k8s.io%2fv1alpha2.BackendLBPolicy";

pub(crate) const GUIDES: &[(&str, G)] = &[
    (
        "enable-cors",
        G::new(
            "Enables CORS with the configured origins, methods and headers.",
            "Gateway API v1 has no CORS filter. The generated HTTPRoute sets CORS headers through a ResponseHeaderModifier; add a separate OPTIONS rule if preflight responses must short-circuit.",
        )
        .example(CORS_EXAMPLE),
    ),
    (
        "cors-allow-origin",
        G::new(
            "Sets Access-Control-Allow-Origin.",
            "Set the header in the ResponseHeaderModifier filter.",
        )
        .example(CORS_EXAMPLE),
    ),
    (
        "cors-allow-methods",
        G::new(
            "Sets Access-Control-Allow-Methods.",
            "Set the header in the ResponseHeaderModifier filter.",
        ),
    ),
    (
        "cors-allow-headers",
        G::new(
            "Sets Access-Control-Allow-Headers.",
            "Set the header in the ResponseHeaderModifier filter.",
        ),
    ),
    (
        "cors-allow-credentials",
        G::new(
            "Sets Access-Control-Allow-Credentials.",
            "Set the header in the ResponseHeaderModifier filter.",
        ),
    ),
    (
        "auth-url",
        G::new(
            "Calls an external URL to authenticate every request.",
            "Apply the generated SecurityPolicy and point extAuth.http.backendRef at the in-cluster auth Service.",
        )
        .example("spec:\n  extAuth:\n    http:\n      backendRef:\n        name: oauth2-proxy\n        port: 4180\n      headersToBackend:\n        - Authorization")
        .docs("https://gateway.envoyproxy.io/docs/tasks/security/ext-auth/"),
    ),
    (
        "auth-response-headers",
        G::new(
            "Selects auth response headers copied to the upstream request.",
            "List them under extAuth.headersToBackend in the SecurityPolicy.",
        ),
    ),
    (
        "limit-rps",
        G::new(
            "Limits requests per second per client IP.",
            "Apply the generated BackendTrafficPolicy. Global rate limiting needs the Envoy Gateway rate limit service enabled.",
        )
        .example("spec:\n  rateLimit:\n    type: Global\n    global:\n      rules:\n        - clientSelectors:\n            - sourceCIDR:\n                type: Distinct\n                value: 0.0.0.0/0\n          limit:\n            requests: 100\n            unit: Second")
        .docs("https://gateway.envoyproxy.io/docs/tasks/traffic/global-rate-limit/"),
    ),
    (
        "limit-rpm",
        G::new(
            "Limits requests per minute per client IP.",
            "Same policy as limit-rps with unit Minute.",
        )
        .example("limit:\n  requests: 300\n  unit: Minute"),
    ),
    (
        "limit-connections",
        G::new(
            "Limits concurrent connections per client IP.",
            "Envoy Gateway has no per-IP connection limit. Use a circuitBreaker in a BackendTrafficPolicy to cap backend concurrency.",
        )
        .example("spec:\n  circuitBreaker:\n    maxConnections: 100"),
    ),
    (
        "whitelist-source-range",
        G::new(
            "Allows traffic only from the listed CIDR ranges.",
            "Apply the generated SecurityPolicy; it denies by default and allows the listed ranges.",
        )
        .example("spec:\n  authorization:\n    defaultAction: Deny\n    rules:\n      - action: Allow\n        principal:\n          clientCIDRs:\n            - 10.0.0.0/8")
        .docs("https://gateway.envoyproxy.io/docs/tasks/security/restrict-ip-access/"),
    ),
    (
        "denylist-source-range",
        G::new(
            "Blocks traffic from the listed CIDR ranges.",
            "Apply the generated SecurityPolicy; it allows by default and denies the listed ranges.",
        )
        .docs("https://gateway.envoyproxy.io/docs/tasks/security/restrict-ip-access/"),
    ),
    (
        "affinity",
        G::new(
            "Enables cookie-based sticky sessions.",
            "Apply the generated BackendLBPolicy with sessionPersistence. Requires Gateway API v1.1 and Envoy Gateway v1.2.",
        )
        .example("spec:\n  sessionPersistence:\n    sessionName: SERVERID\n    type: Cookie")
        .docs(SESSION_DOCS),
    ),
    (
        "affinity-mode",
        G::new(
            "Controls re-balancing of sticky sessions when replicas change.",
            "sessionPersistence is always persistent. Add active health checks in a BackendTrafficPolicy.",
        )
        .docs("https://gateway.envoyproxy.io/docs/api/extension_types/#backendtrafficpolicy")
        .consequence("Sticky sessions are not re-balanced after a scale-up."),
    ),
    (
        "session-cookie-name",
        G::new(
            "Names the sticky session cookie.",
            "Set sessionPersistence.sessionName in the BackendLBPolicy.",
        ),
    ),
    (
        "session-cookie-expires",
        G::new(
            "Hard expiry for the sticky session cookie.",
            "Set cookieConfig.lifetimeType Permanent and absoluteTimeout in the BackendLBPolicy.",
        )
        .example("sessionPersistence:\n  absoluteTimeout: 48h\n  cookieConfig:\n    lifetimeType: Permanent")
        .docs(SESSION_DOCS)
        .consequence("Without an expiry the cookie lives for the browser session only."),
    ),
    (
        "session-cookie-max-age",
        G::new(
            "Max-Age of the sticky session cookie.",
            "Set absoluteTimeout in the BackendLBPolicy, converting seconds to a duration.",
        )
        .docs(SESSION_DOCS),
    ),
    (
        "proxy-read-timeout",
        G::new(
            "Timeout for the backend response.",
            "Emitted as timeouts.backendRequest on the HTTPRoute rule. timeouts.request is left unset.",
        )
        .example("timeouts:\n  backendRequest: 60s")
        .docs("https://gateway-api.sigs.k8s.io/reference/spec/#gateway.networking.k8s.io/v1.HTTPRouteTimeouts"),
    ),
    (
        "proxy-connect-timeout",
        G::new(
            "Timeout for establishing the backend connection.",
            "Gateway API has no connect timeout, and timeouts.request must not be shorter than backendRequest. Set timeout.tcp.connectTimeout in a BackendTrafficPolicy instead.",
        )
        .example("spec:\n  timeout:\n    tcp:\n      connectTimeout: 10s")
        .docs("https://gateway.envoyproxy.io/docs/api/extension_types/#backendtrafficpolicy"),
    ),
    (
        "ssl-passthrough",
        G::new(
            "Passes TLS to the backend without terminating it.",
            "Add a TLS listener with tls.mode Passthrough and a TLSRoute for the host.",
        )
        .example("apiVersion: gateway.networking.k8s.io/v1alpha2\nkind: TLSRoute\nmetadata:\n  name: myapp-tls\nspec:\n  parentRefs:\n    - name: ing-switch-gateway\n      sectionName: tls-passthrough\n  hostnames:\n    - myapp.example.com\n  rules:\n    - backendRefs:\n        - name: myapp\n          port: 443"),
    ),
    (
        "backend-protocol",
        G::new(
            "Sets the backend protocol (HTTPS, GRPC, GRPCS, AJP).",
            "Use a BackendTLSPolicy for HTTPS backends and a GRPCRoute for gRPC backends.",
        ),
    ),
    (
        "proxy-body-size",
        G::new(
            "Limits the client request body size; larger requests get 413.",
            "Apply the generated BackendTrafficPolicy with requestBuffer.limit. Requires Envoy Gateway v1.3.",
        )
        .example("spec:\n  requestBuffer:\n    limit: 10Mi")
        .docs("https://gateway.envoyproxy.io/docs/api/extension_types/#backendtrafficpolicy")
        .consequence("Without a limit Envoy forwards bodies of any size to the backend."),
    ),
    (
        "secure-verify-ca-secret",
        G::new(
            "Verifies the backend certificate against a custom CA.",
            "Export the CA into a ConfigMap and create a BackendTLSPolicy with caCertificateRefs.",
        )
        .example("spec:\n  validation:\n    caCertificateRefs:\n      - group: \"\"\n        kind: ConfigMap\n        name: backend-ca-cert\n    hostname: backend.internal.example.com")
        .docs("https://gateway-api.sigs.k8s.io/reference/spec/#gateway.networking.k8s.io/v1alpha3.BackendTLSPolicy"),
    ),
    (
        "session-cookie-conditional-samesite-none",
        G::new(
            "Sets SameSite=None only for browsers that handle it, based on the User-Agent.",
            "Set SameSite=None unconditionally, or deploy an Envoy extension that inspects the User-Agent.",
        )
        .consequence("Old browsers (iOS 12, Chrome 51-66) may lose sticky sessions.")
        .issue("https://github.com/envoyproxy/envoy/issues/15555"),
    ),
    (
        "session-cookie-change-on-failure",
        G::new(
            "Issues a new sticky cookie when the assigned backend fails.",
            "Configure health checks and a circuit breaker in a BackendTrafficPolicy.",
        )
        .docs("https://gateway.envoyproxy.io/docs/api/extension_types/#backendtrafficpolicy")
        .consequence("A user pinned to a failed backend may see one error before being re-routed."),
    ),
    (
        "configuration-snippet",
        G::new(
            "Injects raw NGINX directives into the location block.",
            "Replace each directive with a Gateway API construct: headers with header modifier filters, redirects with RequestRedirect, rate limits with BackendTrafficPolicy, auth with SecurityPolicy, anything else with an EnvoyPatchPolicy.",
        )
        .example("filters:\n  - type: ResponseHeaderModifier\n    responseHeaderModifier:\n      set:\n        - name: X-Frame-Options\n          value: DENY")
        .consequence("Directives in the snippet are not applied."),
    ),
    (
        "server-snippet",
        G::new(
            "Injects raw NGINX directives into the server block.",
            "Map each directive to a Gateway API resource; use EnvoyPatchPolicy for Envoy-specific settings.",
        )
        .docs("https://gateway.envoyproxy.io/docs/api/extension_types/#envoypatchpolicy")
        .consequence("Server-level directives are not applied."),
    ),
    (
        "auth-type",
        G::new(
            "Enables HTTP basic authentication.",
            "Core Gateway API has no basic auth. Use an Envoy Gateway SecurityPolicy with basicAuth.",
        )
        .example("spec:\n  basicAuth:\n    users:\n      name: basic-auth-users")
        .docs("https://gateway.envoyproxy.io/docs/tasks/security/basic-auth/")
        .consequence("The route is unprotected until the SecurityPolicy exists."),
    ),
    (
        "auth-secret",
        G::new(
            "References the secret holding htpasswd credentials.",
            "Create a secret with a .htpasswd key and reference it from SecurityPolicy basicAuth.users.",
        )
        .consequence("Basic auth stays disabled until the secret is referenced."),
    ),
    (
        "load-balance",
        G::new(
            "Selects the load balancing algorithm.",
            "Set loadBalancer.type in a BackendTrafficPolicy (RoundRobin, LeastRequest, Random, ConsistentHash).",
        )
        .consequence("Envoy Gateway defaults to LeastRequest until a policy is applied."),
    ),
    (
        "upstream-hash-by",
        G::new(
            "Consistent-hash load balancing on a request variable.",
            "Use a BackendTrafficPolicy with loadBalancer.type ConsistentHash on a header or source IP.",
        )
        .consequence("Hash-based placement is lost until the policy exists."),
    ),
];
