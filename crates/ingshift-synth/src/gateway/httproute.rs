//! HTTPRoute construction
//!
//! A route with an HTTPS redirect becomes two HTTPRoutes: `<name>-redirect`
//! on the `http` section carrying only `RequestRedirect`, and `<name>` on
//! its HTTPS section carrying backends. A single route attached to both
//! listeners would redirect HTTPS requests to themselves.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use ingshift_model::{PathRule, Route};
use serde::Serialize;

use super::listeners::{ListenerTable, HTTP_SECTION};
use crate::config::SynthConfig;
use crate::fallback;
use crate::manifest::{Document, Object, ObjectMeta};
use crate::values::{has_regex_chars, parse_seconds, parse_weight};

/// Gateway API group version
pub const API_VERSION: &str = "gateway.networking.k8s.io/v1";

const DEFAULT_CORS_METHODS: &str = "GET, PUT, POST, DELETE, PATCH, OPTIONS";
const DEFAULT_CORS_HEADERS: &str = "Content-Type, Authorization";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpRouteSpec {
    parent_refs: Vec<ParentRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hostnames: Vec<String>,
    rules: Vec<RouteRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParentRef {
    name: String,
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRule {
    matches: Vec<RouteMatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    backend_refs: Vec<BackendRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeouts: Option<Timeouts>,
}

#[derive(Debug, Clone, Serialize)]
struct RouteMatch {
    path: PathMatch,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    headers: Vec<HeaderMatch>,
}

#[derive(Debug, Clone, Serialize)]
struct PathMatch {
    r#type: &'static str,
    value: String,
}

#[derive(Debug, Clone, Serialize)]
struct HeaderMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    r#type: Option<&'static str>,
    name: String,
    value: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Filter {
    r#type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_redirect: Option<RequestRedirect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url_rewrite: Option<UrlRewrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_header_modifier: Option<HeaderModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_header_modifier: Option<HeaderModifier>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestRedirect {
    scheme: &'static str,
    status_code: u16,
}

#[derive(Debug, Clone, Serialize)]
struct UrlRewrite {
    path: PathModifier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PathModifier {
    r#type: &'static str,
    replace_full_path: String,
}

#[derive(Debug, Clone, Default, Serialize)]
struct HeaderModifier {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    set: Vec<HttpHeader>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    add: Vec<HttpHeader>,
}

#[derive(Debug, Clone, Serialize)]
struct HttpHeader {
    name: String,
    value: String,
}

impl HttpHeader {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BackendRef {
    name: String,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Timeouts {
    backend_request: String,
}

/// Redirect status code when the route asks for HTTPS redirection
///
/// `force-ssl-redirect` yields 301, `ssl-redirect` alone 302.
#[must_use]
pub fn redirect_status(route: &Route) -> Option<u16> {
    if route.nginx_is_true("force-ssl-redirect") {
        Some(301)
    } else if route.nginx_is_true("ssl-redirect") {
        Some(302)
    } else {
        None
    }
}

/// Match type for one path rule
#[must_use]
pub fn path_match_type(route: &Route, rule: &PathRule) -> &'static str {
    let path = if rule.path.is_empty() { "/" } else { &rule.path };
    if route.regex_enabled() || has_regex_chars(path) {
        "RegularExpression"
    } else if rule.path_type == "Exact" {
        "Exact"
    } else {
        "PathPrefix"
    }
}

/// Rules in host first-appearance order
fn ordered_paths(route: &Route) -> Vec<&PathRule> {
    let mut by_host: IndexMap<&str, Vec<&PathRule>> = IndexMap::new();
    for rule in &route.paths {
        by_host.entry(rule.host.as_str()).or_default().push(rule);
    }
    by_host.into_values().flatten().collect()
}

fn header_matches(route: &Route, notes: &mut Vec<String>) -> Vec<HeaderMatch> {
    let Some(name) = route.nginx("canary-by-header").map(str::trim).filter(|h| !h.is_empty()) else {
        return Vec::new();
    };
    let value = route.nginx("canary-by-header-value").map(str::trim).filter(|v| !v.is_empty());
    let pattern = route.nginx("canary-by-header-pattern").map(str::trim).filter(|v| !v.is_empty());
    let header = match (value, pattern) {
        (Some(value), _) => HeaderMatch {
            r#type: None,
            name: name.to_string(),
            value: value.to_string(),
        },
        (None, Some(pattern)) => HeaderMatch {
            r#type: Some("RegularExpression"),
            name: name.to_string(),
            value: pattern.to_string(),
        },
        (None, None) => {
            notes.push(format!(
                "header {name}: \"always\" selects this backend; the \"never\" value has no equivalent"
            ));
            HeaderMatch {
                r#type: None,
                name: name.to_string(),
                value: "always".to_string(),
            }
        }
    };
    vec![header]
}

fn route_match(route: &Route, rule: &PathRule, headers: &[HeaderMatch]) -> RouteMatch {
    let value = if rule.path.is_empty() { "/" } else { &rule.path };
    RouteMatch {
        path: PathMatch {
            r#type: path_match_type(route, rule),
            value: value.to_string(),
        },
        headers: headers.to_vec(),
    }
}

fn backend_filters(route: &Route, notes: &mut Vec<String>) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(target) = route.nginx("rewrite-target").map(str::trim).filter(|t| !t.is_empty()) {
        if route.regex_enabled() && target.contains('$') {
            notes.push(format!(
                "rewrite-target {target} uses capture groups; ReplaceFullPath does not expand them"
            ));
        }
        filters.push(Filter {
            r#type: "URLRewrite",
            url_rewrite: Some(UrlRewrite {
                path: PathModifier {
                    r#type: "ReplaceFullPath",
                    replace_full_path: target.to_string(),
                },
            }),
            ..Filter::default()
        });
    }

    if let Some(host) = route.nginx("upstream-vhost").map(str::trim).filter(|h| !h.is_empty()) {
        filters.push(Filter {
            r#type: "RequestHeaderModifier",
            request_header_modifier: Some(HeaderModifier {
                set: vec![HttpHeader::new("Host", host)],
                ..HeaderModifier::default()
            }),
            ..Filter::default()
        });
    }

    let mut response = Vec::new();
    if route.nginx_is_true("enable-cors") {
        let value = |key: &str, default: &'static str| {
            route
                .nginx(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        response.push(HttpHeader::new("Access-Control-Allow-Origin", value("cors-allow-origin", "*")));
        response.push(HttpHeader::new(
            "Access-Control-Allow-Methods",
            value("cors-allow-methods", DEFAULT_CORS_METHODS),
        ));
        response.push(HttpHeader::new(
            "Access-Control-Allow-Headers",
            value("cors-allow-headers", DEFAULT_CORS_HEADERS),
        ));
        response.push(HttpHeader::new(
            "Access-Control-Allow-Credentials",
            value("cors-allow-credentials", "true"),
        ));
    }
    if let Some(source) = route.nginx("custom-headers") {
        response.push(HttpHeader::new("X-Custom-Header", "value"));
        notes.push(format!(
            "X-Custom-Header is a placeholder; copy the headers from ConfigMap {}",
            source.trim()
        ));
    }
    if !response.is_empty() {
        filters.push(Filter {
            r#type: "ResponseHeaderModifier",
            response_header_modifier: Some(HeaderModifier {
                add: response,
                ..HeaderModifier::default()
            }),
            ..Filter::default()
        });
    }
    filters
}

fn canary_weight(route: &Route, notes: &mut Vec<String>) -> Option<u32> {
    if !route.nginx_is_true("canary") {
        return None;
    }
    let Some(raw) = route.nginx("canary-weight") else {
        if !route.has_nginx("canary-by-header") {
            notes.push("canary has neither weight nor header; all matching traffic reaches this backend".into());
        }
        return None;
    };
    match parse_weight(raw) {
        Some((weight, clamped)) => {
            if clamped {
                notes.push(fallback(route, format!("canary-weight {} clamped to 100", raw.trim())));
            }
            Some(weight)
        }
        None => {
            notes.push(fallback(
                route,
                format!("canary-weight {raw:?} is not a number; weight omitted"),
            ));
            None
        }
    }
}

fn port_of(rule: &PathRule) -> u16 {
    if rule.service_port == 0 {
        80
    } else {
        rule.service_port
    }
}

fn stable_backend_stub(port: u16, weight: u32) -> Vec<String> {
    vec![
        format!("NOTE: add the stable backend with weight {weight}"),
        "- name: stable-service".to_string(),
        format!("  port: {port}"),
        format!("  weight: {weight}"),
    ]
}

fn timeouts(route: &Route, notes: &mut Vec<String>) -> Option<Timeouts> {
    if let Some(connect) = route.nginx("proxy-connect-timeout") {
        notes.push(format!(
            "proxy-connect-timeout {} not emitted; timeouts.request must not be shorter than backendRequest",
            connect.trim()
        ));
    }
    let raw = route.nginx("proxy-read-timeout")?;
    match parse_seconds(raw) {
        Some(secs) => Some(Timeouts {
            backend_request: format!("{secs}s"),
        }),
        None => {
            notes.push(fallback(
                route,
                format!("proxy-read-timeout {raw:?} is not a number of seconds; timeout omitted"),
            ));
            None
        }
    }
}

fn parent_ref(config: &SynthConfig, section: Option<&str>) -> ParentRef {
    ParentRef {
        name: config.gateway_name.clone(),
        namespace: config.gateway_namespace.clone(),
        section_name: section.map(str::to_string),
    }
}

fn http_route(route: &Route, name: &str, spec: HttpRouteSpec) -> serde_yaml::Result<Document> {
    Object::new(
        API_VERSION,
        "HTTPRoute",
        ObjectMeta::namespaced(name, &route.namespace),
        spec,
    )
    .into_document()
}

/// HTTPRoute documents for one route; two when an HTTPS redirect is split off
pub fn http_routes(
    route: &Route,
    table: &ListenerTable,
    config: &SynthConfig,
    mut notes: Vec<String>,
) -> serde_yaml::Result<Vec<Document>> {
    let paths = ordered_paths(route);
    let headers = header_matches(route, &mut notes);
    let filters = backend_filters(route, &mut notes);
    let weight = canary_weight(route, &mut notes);
    let timeouts_value = timeouts(route, &mut notes);
    if paths.is_empty() {
        notes.push("route has no paths; the HTTPRoute matches nothing".into());
    }

    let mut documents = Vec::with_capacity(2);
    let backend_section = match redirect_status(route) {
        Some(status) => {
            let rules = paths
                .iter()
                .map(|rule| RouteRule {
                    matches: vec![route_match(route, rule, &headers)],
                    filters: vec![Filter {
                        r#type: "RequestRedirect",
                        request_redirect: Some(RequestRedirect {
                            scheme: "https",
                            status_code: status,
                        }),
                        ..Filter::default()
                    }],
                    backend_refs: Vec::new(),
                    timeouts: None,
                })
                .collect();
            let spec = HttpRouteSpec {
                parent_refs: vec![parent_ref(config, Some(HTTP_SECTION))],
                hostnames: route.hosts.clone(),
                rules,
            };
            documents.push(
                http_route(route, &format!("{}-redirect", route.name), spec)?
                    .with_comment("HTTP to HTTPS redirect, bound to the http listener only"),
            );
            Some(table.https_section(route))
        }
        None => None,
    };

    let rules = paths
        .iter()
        .map(|rule| RouteRule {
            matches: vec![route_match(route, rule, &headers)],
            filters: filters.clone(),
            backend_refs: vec![BackendRef {
                name: rule.service_name.clone(),
                port: port_of(rule),
                weight,
            }],
            timeouts: timeouts_value.clone(),
        })
        .collect();
    let spec = HttpRouteSpec {
        parent_refs: vec![parent_ref(config, backend_section)],
        hostnames: route.hosts.clone(),
        rules,
    };
    let mut document = http_route(route, &route.name, spec)?.with_notes(notes);
    if let Some(weight) = weight {
        let ports: BTreeSet<u16> = paths.iter().map(|rule| port_of(rule)).collect();
        for port in ports {
            document = document.with_inline_comment(
                vec![format!("port: {port}"), format!("weight: {weight}")],
                stable_backend_stub(port, 100 - weight),
            );
        }
    }
    documents.push(document);
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn render(route: &Route) -> Vec<String> {
        let table = ListenerTable::build(&[route]);
        http_routes(route, &table, &SynthConfig::default(), Vec::new())
            .unwrap()
            .iter()
            .map(|d| d.render().unwrap())
            .collect()
    }

    fn base() -> Route {
        Route::new("shop", "web").with_path(PathRule::new("shop.example.com", "/", "web", 8080))
    }

    #[test]
    fn plain_route_has_no_section() {
        let docs = render(&base());
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0],
            "apiVersion: gateway.networking.k8s.io/v1\n\
             kind: HTTPRoute\n\
             metadata:\n  name: web\n  namespace: shop\n\
             spec:\n  parentRefs:\n  - name: ingshift-gateway\n    namespace: default\n\
             \x20 hostnames:\n  - shop.example.com\n\
             \x20 rules:\n  - matches:\n    - path:\n        type: PathPrefix\n        value: /\n\
             \x20   backendRefs:\n    - name: web\n      port: 8080\n"
        );
    }

    #[test]
    fn force_redirect_is_permanent() {
        let docs = render(&base().with_tls_secret("web-tls").with_nginx("force-ssl-redirect", "true"));
        assert_eq!(docs.len(), 2);
        assert!(docs[0].contains("statusCode: 301"));
        assert!(docs[0].contains("sectionName: http\n"));
        assert!(!docs[0].contains("backendRefs"));
        assert!(docs[1].contains("sectionName: https-0\n"));
        assert!(!docs[1].contains("RequestRedirect"));
    }

    #[test]
    fn ssl_redirect_is_temporary() {
        let docs = render(&base().with_nginx("ssl-redirect", "true"));
        assert!(docs[0].contains("statusCode: 302"));
        assert!(docs[1].contains("sectionName: https\n"));
    }

    #[test]
    fn only_read_timeout_emitted() {
        let docs = render(
            &base()
                .with_nginx("proxy-read-timeout", "300")
                .with_nginx("proxy-connect-timeout", "5"),
        );
        assert!(docs[0].contains("    timeouts:\n      backendRequest: 300s\n"));
        assert!(!docs[0].contains("request: 5s"));
        assert!(docs[0].starts_with("# NOTE: proxy-connect-timeout 5 not emitted"));
    }

    #[test]
    fn canary_weight_and_header() {
        let docs = render(
            &base()
                .with_nginx("canary", "true")
                .with_nginx("canary-weight", "20")
                .with_nginx("canary-by-header", "X-Canary"),
        );
        assert!(docs[0].contains(
            "    - name: web\n      port: 8080\n      weight: 20\n    \
             # NOTE: add the stable backend with weight 80\n    \
             # - name: stable-service\n    #   port: 8080\n    #   weight: 80\n"
        ));
        assert!(!docs[0].contains("to each rule"));
        assert!(docs[0].contains("      headers:\n      - name: X-Canary\n        value: always\n"));
    }

    #[test]
    fn canary_header_value_is_exact() {
        let docs = render(
            &base()
                .with_nginx("canary", "true")
                .with_nginx("canary-by-header", "X-Canary")
                .with_nginx("canary-by-header-value", "yes-please"),
        );
        assert!(docs[0].contains("      - name: X-Canary\n        value: yes-please\n"));
        assert!(!docs[0].contains("RegularExpression"));
    }

    #[test]
    fn filters_folded_once_per_type() {
        let docs = render(
            &base()
                .with_nginx("rewrite-target", "/app")
                .with_nginx("enable-cors", "true")
                .with_nginx("custom-headers", "shop/headers")
                .with_nginx("upstream-vhost", "web.internal"),
        );
        let text = &docs[0];
        assert_eq!(text.matches("type: ResponseHeaderModifier").count(), 1);
        assert!(text.contains("replaceFullPath: /app\n"));
        assert!(text.contains("name: Access-Control-Allow-Origin\n"));
        assert!(text.contains("name: X-Custom-Header\n"));
        assert!(text.contains("requestHeaderModifier:\n        set:\n        - name: Host\n          value: web.internal\n"));
    }

    #[test]
    fn exact_and_port_default() {
        let route = Route::new("shop", "web")
            .with_path(PathRule::new("shop.example.com", "/health", "web", 0).with_path_type("Exact"));
        let docs = render(&route);
        assert!(docs[0].contains("type: Exact\n        value: /health\n"));
        assert!(docs[0].contains("port: 80\n"));
    }

    #[test]
    fn regex_flag_counts_by_presence() {
        let route = Route::new("shop", "api")
            .with_path(PathRule::new("shop.example.com", "/api", "api", 80))
            .with_nginx("use-regex", "false")
            .with_nginx("rewrite-target", "/$2");
        let docs = render(&route);
        assert!(docs[0].contains("type: RegularExpression\n        value: /api\n"));
        assert!(!docs[0].contains("type: PathPrefix"));
        assert!(docs[0].contains("capture groups"));
    }

    proptest! {
        #[test]
        fn prop_regex_chars_force_regex(
            prefix in "/[a-z]{1,6}",
            special in prop_oneof![Just("("), Just(")"), Just("|"), Just("["), Just("]"), Just("{"), Just("}")],
            flag in any::<bool>(),
        ) {
            let mut route = Route::new("a", "b");
            if flag {
                route = route.with_nginx("use-regex", "true");
            }
            let rule = PathRule::new("h.example.com", &format!("{prefix}{special}"), "svc", 80);
            prop_assert_eq!(path_match_type(&route, &rule), "RegularExpression");
        }

        #[test]
        fn prop_plain_paths_are_prefix_or_exact(path in "/[a-z0-9/_.-]{0,12}", exact in any::<bool>()) {
            let route = Route::new("a", "b");
            let mut rule = PathRule::new("h.example.com", &path, "svc", 80);
            if exact {
                rule = rule.with_path_type("Exact");
            }
            let expected = if exact { "Exact" } else { "PathPrefix" };
            prop_assert_eq!(path_match_type(&route, &rule), expected);
        }
    }
}
