//! Remediation guides for Traefik

use crate::entry::AnnotationGuide as G;

pub(crate) const GUIDES: &[(&str, G)] = &[
    (
        "affinity-mode",
        G::new(
            "Controls how sticky sessions are re-balanced when replicas change. 'balanced' re-assigns cookies on scaling; 'persistent' keeps a cookie on the same backend.",
            "Traefik sticky sessions are always persistent. Enable Service health checks so unhealthy pods drop out quickly.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.healthcheck.path: /healthz\n  traefik.ingress.kubernetes.io/service.healthcheck.interval: 10s")
        .docs("https://doc.traefik.io/traefik/routing/services/#sticky-sessions")
        .consequence("Existing sticky sessions are not re-balanced onto new pods after a scale-up."),
    ),
    (
        "proxy-http-version",
        G::new(
            "Forces the HTTP version used towards the backend (1.1 for WebSocket, 2.0 for gRPC/h2c).",
            "For h2c backends set the Service scheme to h2c. WebSocket over HTTP/1.1 works without configuration. HTTP/1.0 backends are not supported.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.serversscheme: h2c")
        .docs("https://doc.traefik.io/traefik/routing/services/#servers-transport"),
    ),
    (
        "session-cookie-path",
        G::new(
            "Restricts the session affinity cookie to a path.",
            "Set the cookie path with a Service annotation.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.sticky.cookie.path: \"/app\""),
    ),
    (
        "session-cookie-expires",
        G::new(
            "Sets a hard expiry in seconds for the session affinity cookie.",
            "Add service.sticky.cookie.maxage to the Service with the same number of seconds.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.sticky.cookie: \"true\"\n  traefik.ingress.kubernetes.io/service.sticky.cookie.maxage: \"172800\"")
        .docs("https://doc.traefik.io/traefik/routing/services/#sticky-sessions")
        .consequence("Without an expiry the cookie lives for the browser session only."),
    ),
    (
        "auth-method",
        G::new(
            "Sets the HTTP method used to call the external auth URL.",
            "ForwardAuth reuses the method of the incoming request. Put an adapter in front of auth servers that require a fixed method.",
        ),
    ),
    (
        "auth-request-redirect",
        G::new(
            "Sets the URL the auth service redirects to on failure.",
            "Configure the redirect in the auth service. ForwardAuth forwards the original URL in X-Forwarded-Uri.",
        )
        .example("spec:\n  forwardAuth:\n    address: https://auth.example.com/verify\n    trustForwardHeader: true"),
    ),
    (
        "auth-type",
        G::new(
            "Enables HTTP basic authentication from an htpasswd secret.",
            "Use the generated BasicAuth middleware. Traefik expects bcrypt-hashed users in the secret.",
        )
        .example("kubectl create secret generic basic-auth \\\n  --from-literal=users=\"$(htpasswd -nbB user 'password')\" -n <namespace>")
        .docs("https://doc.traefik.io/traefik/middlewares/http/basicauth/"),
    ),
    (
        "auth-secret",
        G::new(
            "References the secret holding htpasswd credentials.",
            "Regenerate the secret with bcrypt hashes (htpasswd -nB) before switching traffic.",
        )
        .example("htpasswd -nB admin mypassword"),
    ),
    (
        "custom-headers",
        G::new(
            "Adds headers taken from a ConfigMap.",
            "Headers middleware cannot reference a ConfigMap. Copy the key/value pairs inline into the generated headers middleware.",
        )
        .example("spec:\n  headers:\n    customResponseHeaders:\n      X-Custom-Header: \"value\""),
    ),
    (
        "canary-by-header",
        G::new(
            "Sends requests carrying a header to the canary backend.",
            "Add a router rule that matches the header on the canary Ingress.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/router.rule: \"PathPrefix(`/`) && Header(`X-Canary`, `always`)\""),
    ),
    (
        "canary-by-header-value",
        G::new(
            "Sends requests whose header equals a value to the canary backend.",
            "Match the exact header value in the canary router rule.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/router.rule: \"PathPrefix(`/`) && Header(`X-Version`, `v2`)\""),
    ),
    (
        "canary-by-cookie",
        G::new(
            "Sends requests carrying a cookie to the canary backend.",
            "Match the Cookie header with a regular expression in the canary router rule.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/router.rule: \"PathPrefix(`/`) && HeaderRegexp(`Cookie`, `canary=always`)\""),
    ),
    (
        "proxy-read-timeout",
        G::new(
            "Timeout for reading the backend response.",
            "Create a ServersTransport with forwardingTimeouts and reference it from the Service.",
        )
        .example("apiVersion: traefik.io/v1alpha1\nkind: ServersTransport\nmetadata:\n  name: custom-transport\nspec:\n  forwardingTimeouts:\n    responseHeaderTimeout: 60s\n---\nannotations:\n  traefik.ingress.kubernetes.io/service.serverstransport: <namespace>-custom-transport@kubernetescrd")
        .docs("https://doc.traefik.io/traefik/routing/providers/kubernetes-crd/#kind-serverstransport"),
    ),
    (
        "proxy-send-timeout",
        G::new(
            "Timeout for transmitting the request to the backend.",
            "Use ServersTransport forwardingTimeouts.",
        )
        .example("spec:\n  forwardingTimeouts:\n    dialTimeout: 30s"),
    ),
    (
        "proxy-connect-timeout",
        G::new(
            "Timeout for establishing the backend connection.",
            "Set ServersTransport forwardingTimeouts.dialTimeout.",
        )
        .example("spec:\n  forwardingTimeouts:\n    dialTimeout: 10s"),
    ),
    (
        "ssl-passthrough",
        G::new(
            "Passes TLS to the backend without terminating it.",
            "Ingress cannot express passthrough. Use an IngressRouteTCP with tls.passthrough on a TCP entrypoint.",
        )
        .example("apiVersion: traefik.io/v1alpha1\nkind: IngressRouteTCP\nmetadata:\n  name: myapp-passthrough\nspec:\n  entryPoints:\n    - websecure\n  routes:\n    - match: HostSNI(`myapp.example.com`)\n      services:\n        - name: myapp\n          port: 443\n  tls:\n    passthrough: true")
        .docs("https://doc.traefik.io/traefik/routing/providers/kubernetes-crd/#kind-ingressroutetcp"),
    ),
    (
        "backend-protocol",
        G::new(
            "Sets the backend protocol (HTTPS, GRPC, GRPCS, AJP, FCGI).",
            "HTTPS backends need a ServersTransport with rootCAs. gRPC backends need the h2c scheme on the Service.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.serversscheme: h2c"),
    ),
    (
        "grpc-backend",
        G::new(
            "Marks a backend as gRPC.",
            "Set the Service scheme to h2c; add a ServersTransport for streaming timeouts.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.serversscheme: h2c"),
    ),
    (
        "proxy-body-size",
        G::new(
            "Limits the client request body size; larger requests get 413.",
            "Apply the generated Buffering middleware. It is attached to the Ingress through the router.middlewares annotation.",
        )
        .example("spec:\n  buffering:\n    maxRequestBodyBytes: 5242880")
        .docs("https://doc.traefik.io/traefik/middlewares/http/buffering/")
        .consequence("Without a limit Traefik forwards bodies of any size to the backend."),
    ),
    (
        "proxy-request-buffering",
        G::new(
            "Controls whether the request body is buffered before forwarding.",
            "Traefik streams by default. Add a Buffering middleware only if buffering must stay on.",
        )
        .docs("https://doc.traefik.io/traefik/middlewares/http/buffering/"),
    ),
    (
        "from-to-www-redirect",
        G::new(
            "Redirects the bare domain to www or the reverse.",
            "Create a RedirectRegex middleware and a separate Ingress for the source domain that uses it.",
        )
        .example("spec:\n  redirectRegex:\n    regex: \"^https?://example\\\\.com/(.*)\"\n    replacement: \"https://www.example.com/${1}\"\n    permanent: true")
        .docs("https://doc.traefik.io/traefik/middlewares/http/redirectregex/"),
    ),
    (
        "upstream-vhost",
        G::new(
            "Overrides the Host header sent to the backend.",
            "Apply the generated headers middleware and set service.passhostheader to false on the Service.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.passhostheader: \"false\"")
        .docs("https://doc.traefik.io/traefik/routing/services/#pass-host-header"),
    ),
    (
        "secure-verify-ca-secret",
        G::new(
            "Verifies the backend certificate against a custom CA.",
            "Create a ServersTransport with rootCAs pointing at the CA secret and reference it from the Service.",
        )
        .example("apiVersion: traefik.io/v1alpha1\nkind: ServersTransport\nmetadata:\n  name: verify-backend-ca\nspec:\n  rootCAs:\n    - secret: my-ca-secret\n  serverName: backend.internal")
        .docs("https://doc.traefik.io/traefik/routing/providers/kubernetes-crd/#kind-serverstransport"),
    ),
    (
        "session-cookie-conditional-samesite-none",
        G::new(
            "Sets SameSite=None only for browsers that handle it, based on the User-Agent.",
            "Set SameSite=None unconditionally, or add a plugin that inspects the User-Agent.",
        )
        .example("annotations:\n  traefik.ingress.kubernetes.io/service.sticky.cookie.samesite: none\n  traefik.ingress.kubernetes.io/service.sticky.cookie.secure: \"true\"")
        .docs("https://doc.traefik.io/traefik/routing/services/#sticky-sessions")
        .consequence("Old browsers (iOS 12, Chrome 51-66) may lose sticky sessions.")
        .issue("https://github.com/traefik/traefik/issues/6962"),
    ),
    (
        "session-cookie-change-on-failure",
        G::new(
            "Issues a new sticky cookie when the assigned backend fails.",
            "Enable Service health checks and add a Retry middleware to absorb transient failures.",
        )
        .example("spec:\n  retry:\n    attempts: 3\n    initialInterval: 100ms")
        .docs("https://doc.traefik.io/traefik/middlewares/http/retry/")
        .consequence("A user pinned to a failed backend may see one error before being re-routed.")
        .issue("https://github.com/traefik/traefik/issues/1299"),
    ),
    (
        "client-body-buffer-size",
        G::new(
            "Sets the buffer size used to read the client body.",
            "Handle buffering in the application, or bound the whole body with a Buffering middleware.",
        )
        .consequence("Request bodies are streamed to the backend."),
    ),
    (
        "configuration-snippet",
        G::new(
            "Injects raw NGINX directives into the location block.",
            "Replace each directive with a typed middleware: headers with Headers, rewrites with ReplacePath or ReplacePathRegex, redirects with RedirectScheme or RedirectRegex, auth with ForwardAuth or BasicAuth, rate limiting with RateLimit.",
        )
        .example("spec:\n  headers:\n    customResponseHeaders:\n      X-Frame-Options: \"DENY\"")
        .consequence("Directives in the snippet are not applied."),
    ),
    (
        "server-snippet",
        G::new(
            "Injects raw NGINX directives into the server block.",
            "Translate each directive into a middleware, or move the route to an IngressRoute for full control.",
        )
        .consequence("Server-level directives are not applied."),
    ),
    (
        "proxy-buffering",
        G::new(
            "Enables or disables response buffering.",
            "Traefik streams responses; SSE and chunked responses need no configuration.",
        )
        .consequence("Behavior differs only if buffering was enabled for throughput."),
    ),
    (
        "upstream-hash-by",
        G::new(
            "Consistent-hash load balancing on a request variable.",
            "Use cookie sticky sessions, or an IngressRoute for finer control.",
        )
        .consequence("Hash-based placement becomes round-robin."),
    ),
    (
        "load-balance",
        G::new(
            "Selects the load balancing algorithm.",
            "Traefik Ingress uses round-robin. Use weighted services in an IngressRoute for custom distribution.",
        )
        .consequence("The custom algorithm is replaced by round-robin."),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_links_point_at_traefik() {
        for (key, guide) in GUIDES {
            if let Some(link) = guide.docs_link {
                assert!(link.starts_with("https://doc.traefik.io/traefik"), "{key}: {link}");
            }
        }
    }
}
