//! Traefik Middleware groups
//!
//! Each group inspects a route's legacy annotations and may produce one
//! Middleware named `<route>-<purpose>`. Groups run in a fixed order; that
//! order is also the order of the `router.middlewares` reference list.

use std::collections::{BTreeMap, BTreeSet};

use ingshift_model::Route;
use serde::Serialize;

use crate::config::SynthConfig;
use crate::fallback;
use crate::manifest::{Document, Object, ObjectMeta};
use crate::values::{parse_count, parse_size, split_list};

/// Traefik CRD group version
pub const API_VERSION: &str = "traefik.io/v1alpha1";

const DEFAULT_CORS_METHODS: &str = "GET, PUT, POST, DELETE, PATCH, OPTIONS";
const DEFAULT_CORS_HEADERS: &str = "DNT,Keep-Alive,User-Agent,X-Requested-With,If-Modified-Since,Cache-Control,Content-Type,Range,Authorization";
const DEFAULT_CORS_MAX_AGE: u64 = 1_728_000;

/// Middleware `spec`; exactly one field is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_scheme: Option<RedirectScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_regex: Option<RedirectRegex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Headers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    forward_auth: Option<ForwardAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    basic_auth: Option<BasicAuth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rate_limit: Option<RateLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_flight_req: Option<InFlightReq>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_allow_list: Option<SourceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_deny_list: Option<SourceRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replace_path: Option<ReplacePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replace_path_regex: Option<ReplacePathRegex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buffering: Option<Buffering>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RedirectScheme {
    scheme: &'static str,
    permanent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RedirectRegex {
    regex: String,
    replacement: String,
    permanent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Headers {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    access_control_allow_origin_list: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    access_control_allow_methods: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    access_control_allow_headers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    access_control_expose_headers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_control_allow_credentials: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    access_control_max_age: Option<u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom_request_headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom_response_headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ForwardAuth {
    address: String,
    trust_forward_header: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    auth_response_headers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct BasicAuth {
    secret: String,
    realm: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct RateLimit {
    average: u64,
    burst: u64,
    period: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct InFlightReq {
    amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceRange {
    source_range: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ReplacePath {
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ReplacePathRegex {
    regex: String,
    replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Buffering {
    max_request_body_bytes: u64,
}

/// Outcome of one group
#[derive(Debug, Default)]
struct Group {
    purpose: &'static str,
    spec: Option<MiddlewareSpec>,
    consumed: &'static [&'static str],
    comments: Vec<String>,
    notes: Vec<String>,
}

impl Group {
    fn emit(purpose: &'static str, consumed: &'static [&'static str], spec: MiddlewareSpec) -> Self {
        Self {
            purpose,
            spec: Some(spec),
            consumed,
            ..Self::default()
        }
    }

    fn note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    fn comment(mut self, comment: String) -> Self {
        self.comments.push(comment);
        self
    }
}

type GroupFn = fn(&Route, &SynthConfig) -> Option<Group>;

const GROUPS: &[GroupFn] = &[
    ssl_redirect,
    force_ssl_redirect,
    redirect,
    app_root,
    cors,
    forward_auth,
    basic_auth,
    rate_limit,
    in_flight_req,
    ip_allow_list,
    ip_deny_list,
    rewrite,
    custom_headers,
    buffering,
    upstream_vhost,
];

/// Middlewares generated for one route
#[derive(Debug, Default)]
pub struct MiddlewarePlan {
    /// Middleware documents in generation order
    pub documents: Vec<Document>,
    /// `<namespace>-<name>@kubernetescrd` references, same order
    pub references: Vec<String>,
    /// Short annotation keys translated by some group
    pub consumed: BTreeSet<&'static str>,
    /// Notes with no Middleware to attach to
    pub route_notes: Vec<String>,
}

impl MiddlewarePlan {
    /// Run every group against `route`
    pub fn build(route: &Route, config: &SynthConfig) -> serde_yaml::Result<Self> {
        let mut plan = Self::default();
        for group in GROUPS.iter().filter_map(|g| g(route, config)) {
            plan.consumed.extend(group.consumed.iter().copied());
            let Some(spec) = group.spec else {
                plan.route_notes.extend(group.notes);
                continue;
            };
            let name = format!("{}-{}", route.name, group.purpose);
            let mut doc = Object::new(
                API_VERSION,
                "Middleware",
                ObjectMeta::namespaced(&name, &route.namespace),
                spec,
            )
            .into_document()?;
            for comment in group.comments {
                doc = doc.with_comment(comment);
            }
            plan.documents.push(doc.with_notes(group.notes));
            plan.references
                .push(format!("{}-{name}@kubernetescrd", route.namespace));
        }
        Ok(plan)
    }

    /// Whether no Middleware was generated
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn redirect_scheme(purpose: &'static str, consumed: &'static [&'static str], permanent: bool) -> Group {
    Group::emit(
        purpose,
        consumed,
        MiddlewareSpec {
            redirect_scheme: Some(RedirectScheme {
                scheme: "https",
                permanent,
            }),
            ..MiddlewareSpec::default()
        },
    )
}

fn ssl_redirect(route: &Route, _: &SynthConfig) -> Option<Group> {
    route
        .nginx_is_true("ssl-redirect")
        .then(|| redirect_scheme("ssl-redirect", &["ssl-redirect"], false))
}

fn force_ssl_redirect(route: &Route, _: &SynthConfig) -> Option<Group> {
    route
        .nginx_is_true("force-ssl-redirect")
        .then(|| redirect_scheme("force-ssl-redirect", &["force-ssl-redirect"], true))
}

fn redirect(route: &Route, _: &SynthConfig) -> Option<Group> {
    let permanent = route.nginx("permanent-redirect").filter(|v| !v.trim().is_empty());
    let temporal = route.nginx("temporal-redirect").filter(|v| !v.trim().is_empty());
    let (target, is_permanent) = match (permanent, temporal) {
        (Some(p), _) => (p, true),
        (None, Some(t)) => (t, false),
        (None, None) => return None,
    };
    let mut group = Group::emit(
        "redirect",
        &["permanent-redirect", "permanent-redirect-code", "temporal-redirect"],
        MiddlewareSpec {
            redirect_regex: Some(RedirectRegex {
                regex: "^.*$".to_string(),
                replacement: target.trim().to_string(),
                permanent: is_permanent,
            }),
            ..MiddlewareSpec::default()
        },
    );
    if permanent.is_some() && temporal.is_some() {
        group = group.note("temporal-redirect ignored; permanent-redirect takes precedence".into());
    }
    if let Some(code) = route.nginx("permanent-redirect-code") {
        if !matches!(code.trim(), "301" | "308") {
            group = group.note(fallback(
                route,
                format!("permanent-redirect-code {code} not expressible; Traefik sends 301, or 308 for non-GET"),
            ));
        }
    }
    Some(group)
}

fn app_root(route: &Route, _: &SynthConfig) -> Option<Group> {
    let root = route.nginx("app-root")?.trim();
    if root.is_empty() {
        return None;
    }
    let root = if root.starts_with('/') {
        root.to_string()
    } else {
        format!("/{root}")
    };
    Some(Group::emit(
        "app-root",
        &["app-root"],
        MiddlewareSpec {
            redirect_regex: Some(RedirectRegex {
                regex: "^(https?://[^/]+)/$".to_string(),
                replacement: format!("${{1}}{root}"),
                permanent: false,
            }),
            ..MiddlewareSpec::default()
        },
    ))
}

fn cors(route: &Route, _: &SynthConfig) -> Option<Group> {
    if !route.nginx_is_true("enable-cors") {
        return None;
    }
    let value = |key: &str, default: &'static str| {
        route
            .nginx(key)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(default)
    };
    let mut notes = Vec::new();

    let credentials = match route.nginx("cors-allow-credentials").map(str::trim) {
        None | Some("true") => true,
        Some("false") => false,
        Some(other) => {
            notes.push(fallback(
                route,
                format!("cors-allow-credentials {other:?} is not a boolean; using true"),
            ));
            true
        }
    };
    let max_age = match route.nginx("cors-max-age") {
        None => DEFAULT_CORS_MAX_AGE,
        Some(v) => parse_count(v).map_or_else(
            || {
                notes.push(fallback(
                    route,
                    format!("cors-max-age {v:?} is not a number; using {DEFAULT_CORS_MAX_AGE}"),
                ));
                DEFAULT_CORS_MAX_AGE
            },
            u64::from,
        ),
    };

    let headers = Headers {
        access_control_allow_origin_list: split_list(value("cors-allow-origin", "*")),
        access_control_allow_methods: split_list(value("cors-allow-methods", DEFAULT_CORS_METHODS)),
        access_control_allow_headers: split_list(value("cors-allow-headers", DEFAULT_CORS_HEADERS)),
        access_control_expose_headers: split_list(value("cors-expose-headers", "")),
        access_control_allow_credentials: Some(credentials),
        access_control_max_age: Some(max_age),
        ..Headers::default()
    };
    let mut group = Group::emit(
        "cors",
        &[
            "enable-cors",
            "cors-allow-origin",
            "cors-allow-methods",
            "cors-allow-headers",
            "cors-expose-headers",
            "cors-allow-credentials",
            "cors-max-age",
        ],
        MiddlewareSpec {
            headers: Some(headers),
            ..MiddlewareSpec::default()
        },
    );
    group.notes = notes;
    Some(group)
}

fn forward_auth(route: &Route, _: &SynthConfig) -> Option<Group> {
    let address = route.nginx("auth-url")?.trim();
    if address.is_empty() {
        return None;
    }
    let mut group = Group::emit(
        "auth",
        &["auth-url", "auth-response-headers", "auth-method"],
        MiddlewareSpec {
            forward_auth: Some(ForwardAuth {
                address: address.to_string(),
                trust_forward_header: true,
                auth_response_headers: route
                    .nginx("auth-response-headers")
                    .map(split_list)
                    .unwrap_or_default(),
            }),
            ..MiddlewareSpec::default()
        },
    );
    if let Some(method) = route.nginx("auth-method") {
        group = group.note(format!(
            "auth-method {} dropped; forwardAuth always replays the client method",
            method.trim()
        ));
    }
    Some(group)
}

fn basic_auth(route: &Route, _: &SynthConfig) -> Option<Group> {
    if route.nginx("auth-type").map(str::trim) != Some("basic") {
        return None;
    }
    let default_secret = format!("{}-basic-auth", route.name);
    let raw_secret = route
        .nginx("auth-secret")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_secret.as_str());
    let mut notes = Vec::new();
    let secret = match raw_secret.split_once('/') {
        Some((ns, name)) => {
            if ns != route.namespace {
                notes.push(format!(
                    "auth-secret lives in namespace {ns}; copy it into {} as {name}",
                    route.namespace
                ));
            }
            name
        }
        None => raw_secret,
    };
    let realm = route
        .nginx("auth-realm")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("traefik");

    let mut group = Group::emit(
        "basicauth",
        &["auth-type", "auth-secret", "auth-secret-type", "auth-realm"],
        MiddlewareSpec {
            basic_auth: Some(BasicAuth {
                secret: secret.to_string(),
                realm: realm.to_string(),
            }),
            ..MiddlewareSpec::default()
        },
    )
    .comment("The secret must hold htpasswd lines under the `users` key:".to_string())
    .comment(format!(
        "kubectl create secret generic {secret} --from-literal=users=\"$(htpasswd -nb user password)\" -n {}",
        route.namespace
    ));
    group.notes = notes;
    Some(group)
}

fn rate_limit(route: &Route, config: &SynthConfig) -> Option<Group> {
    let (raw, period) = match (route.nginx("limit-rps"), route.nginx("limit-rpm")) {
        (Some(rps), _) => (rps, "1s"),
        (None, Some(rpm)) => (rpm, "1m"),
        (None, None) => return None,
    };
    let mut notes = Vec::new();
    if route.has_nginx("limit-rps") && route.has_nginx("limit-rpm") {
        notes.push("limit-rpm ignored; limit-rps takes precedence".to_string());
    }
    let average = match parse_count(raw) {
        Some(n) if n > 0 => u64::from(n),
        _ => {
            notes.push(fallback(
                route,
                format!("rate {raw:?} is not a positive integer; using {}", config.default_rate_limit),
            ));
            u64::from(config.default_rate_limit)
        }
    };
    let burst = match route.nginx("limit-burst-multiplier") {
        None => u64::from(config.default_burst),
        Some(m) => match parse_count(m) {
            Some(m) if m > 0 => average.saturating_mul(u64::from(m)),
            _ => {
                notes.push(fallback(
                    route,
                    format!("limit-burst-multiplier {m:?} is not a positive integer; using burst {}", config.default_burst),
                ));
                u64::from(config.default_burst)
            }
        },
    };
    if let Some(exempt) = route.nginx("limit-whitelist") {
        notes.push(format!(
            "limit-whitelist {} not applied; exclude these ranges with a separate router or a sourceCriterion",
            exempt.trim()
        ));
    }
    let mut group = Group::emit(
        "ratelimit",
        &["limit-rps", "limit-rpm", "limit-burst-multiplier", "limit-whitelist"],
        MiddlewareSpec {
            rate_limit: Some(RateLimit {
                average,
                burst,
                period,
            }),
            ..MiddlewareSpec::default()
        },
    );
    group.notes = notes;
    Some(group)
}

fn in_flight_req(route: &Route, _: &SynthConfig) -> Option<Group> {
    let raw = route.nginx("limit-connections")?;
    let (amount, note) = match parse_count(raw) {
        Some(n) if n > 0 => (n, None),
        _ => (
            10,
            Some(fallback(route, format!("limit-connections {raw:?} is not a positive integer; using 10"))),
        ),
    };
    let group = Group::emit(
        "inflightreq",
        &["limit-connections"],
        MiddlewareSpec {
            in_flight_req: Some(InFlightReq { amount }),
            ..MiddlewareSpec::default()
        },
    );
    Some(match note {
        Some(n) => group.note(n),
        None => group,
    })
}

fn source_range(route: &Route, key: &str) -> Option<SourceRange> {
    let ranges = split_list(route.nginx(key)?);
    (!ranges.is_empty()).then_some(SourceRange {
        source_range: ranges,
    })
}

fn ip_allow_list(route: &Route, _: &SynthConfig) -> Option<Group> {
    let ranges = source_range(route, "whitelist-source-range")?;
    Some(Group::emit(
        "ipallowlist",
        &["whitelist-source-range"],
        MiddlewareSpec {
            ip_allow_list: Some(ranges),
            ..MiddlewareSpec::default()
        },
    ))
}

fn ip_deny_list(route: &Route, _: &SynthConfig) -> Option<Group> {
    let ranges = source_range(route, "denylist-source-range")?;
    Some(Group::emit(
        "ipdenylist",
        &["denylist-source-range"],
        MiddlewareSpec {
            ip_deny_list: Some(ranges),
            ..MiddlewareSpec::default()
        },
    ))
}

fn rewrite(route: &Route, _: &SynthConfig) -> Option<Group> {
    let target = route.nginx("rewrite-target")?.trim();
    if target.is_empty() {
        return None;
    }
    if !route.regex_enabled() {
        return Some(Group::emit(
            "rewrite",
            &["rewrite-target"],
            MiddlewareSpec {
                replace_path: Some(ReplacePath {
                    path: target.to_string(),
                }),
                ..MiddlewareSpec::default()
            },
        ));
    }
    let source = route
        .paths
        .iter()
        .map(|p| p.path.as_str())
        .find(|p| !p.is_empty())
        .unwrap_or("/(.*)");
    let regex = if source.starts_with('^') {
        source.to_string()
    } else {
        format!("^{source}")
    };
    let group = Group::emit(
        "rewrite",
        &["rewrite-target", "use-regex"],
        MiddlewareSpec {
            replace_path_regex: Some(ReplacePathRegex {
                regex: regex.clone(),
                replacement: target.to_string(),
            }),
            ..MiddlewareSpec::default()
        },
    );
    Some(if route.paths.len() > 1 {
        group.note(format!(
            "regex {regex} taken from the first path; other paths may need their own rewrite"
        ))
    } else {
        group
    })
}

fn custom_headers(route: &Route, _: &SynthConfig) -> Option<Group> {
    let source = route.nginx("custom-headers")?.trim();
    let headers = Headers {
        custom_response_headers: BTreeMap::from([("X-Custom-Header".to_string(), "value".to_string())]),
        ..Headers::default()
    };
    Some(
        Group::emit(
            "headers",
            &["custom-headers"],
            MiddlewareSpec {
                headers: Some(headers),
                ..MiddlewareSpec::default()
            },
        )
        .note(format!(
            "placeholder header; inline the headers from ConfigMap {source}"
        )),
    )
}

fn buffering(route: &Route, _: &SynthConfig) -> Option<Group> {
    let raw = route.nginx("proxy-body-size")?;
    match parse_size(raw) {
        Some(0) => Some(Group {
            consumed: &["proxy-body-size"],
            notes: vec!["proxy-body-size 0 disables the limit; Traefik sets none by default".into()],
            ..Group::default()
        }),
        Some(bytes) => Some(Group::emit(
            "buffering",
            &["proxy-body-size"],
            MiddlewareSpec {
                buffering: Some(Buffering {
                    max_request_body_bytes: bytes,
                }),
                ..MiddlewareSpec::default()
            },
        )),
        None => Some(Group {
            notes: vec![fallback(
                route,
                format!("proxy-body-size {raw:?} not understood; add a buffering middleware by hand"),
            )],
            ..Group::default()
        }),
    }
}

fn upstream_vhost(route: &Route, _: &SynthConfig) -> Option<Group> {
    let host = route.nginx("upstream-vhost")?.trim();
    if host.is_empty() {
        return None;
    }
    let headers = Headers {
        custom_request_headers: BTreeMap::from([("Host".to_string(), host.to_string())]),
        ..Headers::default()
    };
    Some(Group::emit(
        "upstream-vhost",
        &["upstream-vhost"],
        MiddlewareSpec {
            headers: Some(headers),
            ..MiddlewareSpec::default()
        },
    ))
}
