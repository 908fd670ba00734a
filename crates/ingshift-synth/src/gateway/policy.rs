//! Envoy Gateway policies
//!
//! Behaviour with no HTTPRoute field lives in separate policy objects that
//! point back at the backend HTTPRoute by name.

use ingshift_model::Route;
use serde::Serialize;

use crate::config::SynthConfig;
use crate::fallback;
use crate::manifest::{Document, Object, ObjectMeta};
use crate::values::{parse_count, parse_seconds, parse_size, quantity, split_list};

/// Envoy Gateway extension group version
pub const ENVOY_API_VERSION: &str = "gateway.envoyproxy.io/v1alpha1";
/// BackendLBPolicy group version
pub const LB_POLICY_API_VERSION: &str = "gateway.networking.k8s.io/v1alpha2";

const DEFAULT_SESSION_COOKIE: &str = "INGRESSCOOKIE";

/// One generated policy
#[derive(Debug)]
pub struct Policy {
    /// File and object name suffix
    pub purpose: &'static str,
    /// Rendered object
    pub document: Document,
}

/// Policies for one route plus notes for its HTTPRoute
#[derive(Debug, Default)]
pub struct PolicySet {
    /// Policies in generation order
    pub policies: Vec<Policy>,
    /// Notes with no policy to attach to
    pub route_notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct TargetRef {
    group: &'static str,
    kind: &'static str,
    name: String,
}

impl TargetRef {
    fn http_route(name: &str) -> Self {
        Self {
            group: "gateway.networking.k8s.io",
            kind: "HTTPRoute",
            name: name.to_string(),
        }
    }

    fn service(name: &str) -> Self {
        Self {
            group: "",
            kind: "Service",
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrafficPolicySpec {
    target_ref: TargetRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit: Option<RateLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_buffer: Option<RequestBuffer>,
}

#[derive(Debug, Serialize)]
struct RateLimit {
    r#type: &'static str,
    global: GlobalRateLimit,
}

#[derive(Debug, Serialize)]
struct GlobalRateLimit {
    rules: Vec<RateLimitRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitRule {
    client_selectors: Vec<ClientSelector>,
    limit: Limit,
}

#[derive(Debug, Serialize)]
struct ClientSelector {
    #[serde(rename = "sourceCIDR")]
    source_cidr: SourceCidr,
}

#[derive(Debug, Serialize)]
struct SourceCidr {
    r#type: &'static str,
    value: &'static str,
}

#[derive(Debug, Serialize)]
struct Limit {
    requests: u32,
    unit: &'static str,
}

#[derive(Debug, Serialize)]
struct RequestBuffer {
    limit: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SecurityPolicySpec {
    target_ref: TargetRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    ext_auth: Option<ExtAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorization: Option<Authorization>,
}

#[derive(Debug, Serialize)]
struct ExtAuth {
    http: HttpExtAuth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpExtAuth {
    backend_ref: AuthBackendRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    headers_to_backend: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct AuthBackendRef {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    port: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Authorization {
    default_action: &'static str,
    rules: Vec<AuthorizationRule>,
}

#[derive(Debug, Serialize)]
struct AuthorizationRule {
    action: &'static str,
    principal: Principal,
}

#[derive(Debug, Serialize)]
struct Principal {
    #[serde(rename = "clientCIDRs")]
    client_cidrs: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LbPolicySpec {
    target_refs: Vec<TargetRef>,
    session_persistence: SessionPersistence,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionPersistence {
    session_name: String,
    r#type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    absolute_timeout: Option<String>,
}

/// Cluster service behind an `auth-url`, with the request path
#[derive(Debug, Clone, PartialEq, Eq)]
struct AuthTarget {
    backend: AuthBackendRef,
    path: Option<String>,
}

/// Resolve `auth-url` to an in-cluster Service when the host names one
fn auth_target(url: &str) -> Option<AuthTarget> {
    let (rest, default_port) = if let Some(rest) = url.strip_prefix("https://") {
        (rest, 443)
    } else if let Some(rest) = url.strip_prefix("http://") {
        (rest, 80)
    } else {
        (url, 80)
    };
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], Some(&rest[i..])),
        None => (rest, None),
    };
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().ok()?),
        None => (authority, default_port),
    };
    let labels: Vec<&str> = host.split('.').collect();
    let (name, namespace) = match labels.as_slice() {
        [name] if !name.is_empty() => (*name, None),
        [name, namespace, "svc", ..] => (*name, Some(namespace.to_string())),
        _ => return None,
    };
    Some(AuthTarget {
        backend: AuthBackendRef {
            name: name.to_string(),
            namespace,
            port,
        },
        path: path.filter(|p| *p != "/").map(str::to_string),
    })
}

fn envoy_object<S: Serialize>(route: &Route, purpose: &str, kind: &'static str, spec: S) -> serde_yaml::Result<Document> {
    Object::new(
        ENVOY_API_VERSION,
        kind,
        ObjectMeta::namespaced(&format!("{}-{purpose}", route.name), &route.namespace),
        spec,
    )
    .into_document()
}

fn rate_limit(route: &Route, config: &SynthConfig) -> serde_yaml::Result<Option<Policy>> {
    let (raw, unit) = match (route.nginx("limit-rps"), route.nginx("limit-rpm")) {
        (Some(rps), _) => (rps, "Second"),
        (None, Some(rpm)) => (rpm, "Minute"),
        (None, None) => return Ok(None),
    };
    let mut notes = vec!["global rate limiting needs the Envoy Gateway rate limit service backed by Redis".to_string()];
    let requests = match parse_count(raw) {
        Some(n) if n > 0 => n,
        _ => {
            notes.push(fallback(
                route,
                format!("rate {raw:?} is not a positive integer; using {}", config.default_rate_limit),
            ));
            config.default_rate_limit
        }
    };
    if route.has_nginx("limit-burst-multiplier") {
        notes.push("limit-burst-multiplier has no equivalent; Envoy enforces the limit without burst".into());
    }
    let spec = TrafficPolicySpec {
        target_ref: TargetRef::http_route(&route.name),
        rate_limit: Some(RateLimit {
            r#type: "Global",
            global: GlobalRateLimit {
                rules: vec![RateLimitRule {
                    client_selectors: vec![ClientSelector {
                        source_cidr: SourceCidr {
                            r#type: "Distinct",
                            value: "0.0.0.0/0",
                        },
                    }],
                    limit: Limit { requests, unit },
                }],
            },
        }),
        request_buffer: None,
    };
    let document = envoy_object(route, "ratelimit", "BackendTrafficPolicy", spec)?.with_notes(notes);
    Ok(Some(Policy {
        purpose: "ratelimit",
        document,
    }))
}

fn body_size(route: &Route, set: &mut PolicySet) -> serde_yaml::Result<Option<Policy>> {
    let Some(raw) = route.nginx("proxy-body-size") else {
        return Ok(None);
    };
    let bytes = match parse_size(raw) {
        Some(0) => {
            set.route_notes
                .push("proxy-body-size 0 disables the limit; no request buffer policy emitted".into());
            return Ok(None);
        }
        Some(bytes) => bytes,
        None => {
            set.route_notes.push(fallback(
                route,
                format!("proxy-body-size {raw:?} not understood; no request buffer policy emitted"),
            ));
            return Ok(None);
        }
    };
    let spec = TrafficPolicySpec {
        target_ref: TargetRef::http_route(&route.name),
        rate_limit: None,
        request_buffer: Some(RequestBuffer {
            limit: quantity(bytes),
        }),
    };
    let document = envoy_object(route, "body-size", "BackendTrafficPolicy", spec)?;
    Ok(Some(Policy {
        purpose: "body-size",
        document,
    }))
}

fn ext_auth(route: &Route) -> serde_yaml::Result<Option<Policy>> {
    let Some(url) = route.nginx("auth-url").map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    let mut notes = vec![format!("translated from auth-url {url}")];
    let target = auth_target(url).unwrap_or_else(|| {
        notes.push("auth-url is not a cluster Service; point backendRef at a Service that reaches it".into());
        AuthTarget {
            backend: AuthBackendRef {
                name: "auth-service".to_string(),
                namespace: None,
                port: 9001,
            },
            path: None,
        }
    });
    if let Some(ns) = &target.backend.namespace {
        if *ns != route.namespace {
            notes.push(format!(
                "backendRef crosses into namespace {ns}; a ReferenceGrant there must allow SecurityPolicy"
            ));
        }
    }
    let spec = SecurityPolicySpec {
        target_ref: TargetRef::http_route(&route.name),
        ext_auth: Some(ExtAuth {
            http: HttpExtAuth {
                backend_ref: target.backend,
                path: target.path,
                headers_to_backend: route
                    .nginx("auth-response-headers")
                    .map(split_list)
                    .unwrap_or_default(),
            },
        }),
        authorization: None,
    };
    let document = envoy_object(route, "extauth", "SecurityPolicy", spec)?.with_notes(notes);
    Ok(Some(Policy {
        purpose: "extauth",
        document,
    }))
}

fn ip_filter(route: &Route) -> serde_yaml::Result<Option<Policy>> {
    let list = |key: &str| route.nginx(key).map(split_list).filter(|l| !l.is_empty());
    let allow = list("whitelist-source-range");
    let deny = list("denylist-source-range");
    let rule = |action, client_cidrs| AuthorizationRule {
        action,
        principal: Principal { client_cidrs },
    };
    let authorization = match (allow, deny) {
        (None, None) => return Ok(None),
        (Some(allow), None) => Authorization {
            default_action: "Deny",
            rules: vec![rule("Allow", allow)],
        },
        (None, Some(deny)) => Authorization {
            default_action: "Allow",
            rules: vec![rule("Deny", deny)],
        },
        (Some(allow), Some(deny)) => Authorization {
            default_action: "Deny",
            rules: vec![rule("Deny", deny), rule("Allow", allow)],
        },
    };
    let spec = SecurityPolicySpec {
        target_ref: TargetRef::http_route(&route.name),
        ext_auth: None,
        authorization: Some(authorization),
    };
    let document = envoy_object(route, "ipfilter", "SecurityPolicy", spec)?;
    Ok(Some(Policy {
        purpose: "ipfilter",
        document,
    }))
}

fn session(route: &Route) -> serde_yaml::Result<Option<Policy>> {
    if route.nginx("affinity").map(str::trim) != Some("cookie") {
        return Ok(None);
    }
    let mut notes = Vec::new();
    let session_name = route
        .nginx("session-cookie-name")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_SESSION_COOKIE)
        .to_string();
    let absolute_timeout = route.nginx("session-cookie-max-age").and_then(|raw| {
        let secs = parse_seconds(raw);
        if secs.is_none() {
            notes.push(fallback(
                route,
                format!("session-cookie-max-age {raw:?} is not a number of seconds; no timeout set"),
            ));
        }
        secs.map(|s| format!("{s}s"))
    });

    let mut services: Vec<&str> = Vec::new();
    for rule in &route.paths {
        if !rule.service_name.is_empty() && !services.contains(&rule.service_name.as_str()) {
            services.push(&rule.service_name);
        }
    }
    if services.is_empty() {
        notes.push("route has no backend services; add targetRefs by hand".into());
    }

    let spec = LbPolicySpec {
        target_refs: services.into_iter().map(TargetRef::service).collect(),
        session_persistence: SessionPersistence {
            session_name,
            r#type: "Cookie",
            absolute_timeout,
        },
    };
    let document = Object::new(
        LB_POLICY_API_VERSION,
        "BackendLBPolicy",
        ObjectMeta::namespaced(&format!("{}-session", route.name), &route.namespace),
        spec,
    )
    .into_document()?
    .with_notes(notes);
    Ok(Some(Policy {
        purpose: "session",
        document,
    }))
}

/// Build every policy the route needs
pub fn policies(route: &Route, config: &SynthConfig) -> serde_yaml::Result<PolicySet> {
    let mut set = PolicySet::default();
    let built = [
        rate_limit(route, config)?,
        body_size(route, &mut set)?,
        ext_auth(route)?,
        ip_filter(route)?,
        session(route)?,
    ];
    set.policies.extend(built.into_iter().flatten());
    Ok(set)
}
