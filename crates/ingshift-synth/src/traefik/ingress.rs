//! Rewritten Ingress objects
//!
//! The Ingress keeps its rules and TLS blocks. Annotations translated into
//! Middlewares are removed and replaced by a single reference list.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use ingshift_model::{PathRule, Route, NGINX_PREFIX};
use serde::Serialize;

use crate::config::SynthConfig;
use crate::manifest::{Document, Object, ObjectMeta};

/// Annotation carrying the Middleware reference list
pub const MIDDLEWARES_ANNOTATION: &str = "traefik.ingress.kubernetes.io/router.middlewares";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IngressSpec {
    ingress_class_name: String,
    rules: Vec<IngressRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tls: Vec<IngressTls>,
}

#[derive(Debug, Serialize)]
struct IngressRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    http: HttpRuleValue,
}

#[derive(Debug, Serialize)]
struct HttpRuleValue {
    paths: Vec<HttpPath>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpPath {
    path: String,
    path_type: String,
    backend: Backend,
}

#[derive(Debug, Serialize)]
struct Backend {
    service: ServiceBackend,
}

#[derive(Debug, Serialize)]
struct ServiceBackend {
    name: String,
    port: ServicePort,
}

#[derive(Debug, Serialize)]
struct ServicePort {
    number: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IngressTls {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hosts: Vec<String>,
    secret_name: String,
}

fn http_path(rule: &PathRule) -> HttpPath {
    let or = |value: &str, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };
    HttpPath {
        path: or(&rule.path, "/"),
        path_type: or(&rule.path_type, "Prefix"),
        backend: Backend {
            service: ServiceBackend {
                name: rule.service_name.clone(),
                port: ServicePort {
                    number: rule.service_port,
                },
            },
        },
    }
}

/// Group path rules by host in first-appearance order
fn rules(route: &Route) -> Vec<IngressRule> {
    let mut by_host: IndexMap<&str, Vec<HttpPath>> = IndexMap::new();
    for rule in &route.paths {
        by_host
            .entry(rule.host.as_str())
            .or_default()
            .push(http_path(rule));
    }
    by_host
        .into_iter()
        .map(|(host, paths)| IngressRule {
            host: (!host.is_empty()).then(|| host.to_string()),
            http: HttpRuleValue { paths },
        })
        .collect()
}

/// Build the rewritten Ingress document
pub fn updated_ingress(
    route: &Route,
    config: &SynthConfig,
    references: &[String],
    consumed: &BTreeSet<&'static str>,
    notes: Vec<String>,
) -> serde_yaml::Result<Document> {
    let mut annotations: BTreeMap<String, String> = route
        .annotations
        .iter()
        .filter(|(key, _)| {
            key.strip_prefix(NGINX_PREFIX)
                .map_or(true, |short| !consumed.contains(short))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if !references.is_empty() {
        annotations.insert(MIDDLEWARES_ANNOTATION.to_string(), references.join(","));
    }

    let leftover: Vec<&str> = route
        .nginx_annotations
        .keys()
        .map(String::as_str)
        .filter(|k| !consumed.contains(*k))
        .collect();

    let mut meta = ObjectMeta::namespaced(&route.name, &route.namespace);
    meta.annotations = annotations;
    let spec = IngressSpec {
        ingress_class_name: route
            .ingress_class
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| config.default_ingress_class.clone()),
        rules: rules(route),
        tls: route
            .tls_secrets
            .iter()
            .map(|secret| IngressTls {
                hosts: route.hosts.clone(),
                secret_name: secret.clone(),
            })
            .collect(),
    };

    let mut doc = Object::new("networking.k8s.io/v1", "Ingress", meta, spec)
        .into_document()?
        .with_notes(notes);
    if !leftover.is_empty() {
        doc = doc.with_note(format!(
            "left for the kubernetesIngressNginx provider: {}",
            leftover.join(", ")
        ));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(route: &Route, references: &[String], consumed: &[&'static str]) -> String {
        let consumed: BTreeSet<&'static str> = consumed.iter().copied().collect();
        updated_ingress(route, &SynthConfig::default(), references, &consumed, Vec::new())
            .unwrap()
            .render()
            .unwrap()
    }

    #[test]
    fn rules_grouped_by_host_in_first_seen_order() {
        let route = Route::new("shop", "web")
            .with_ingress_class("nginx")
            .with_path(PathRule::new("b.example.com", "/", "b", 80))
            .with_path(PathRule::new("a.example.com", "/x", "a", 8080).with_path_type("Exact"))
            .with_path(PathRule::new("b.example.com", "/api", "api", 9000));
        let text = render(&route, &[], &[]);
        assert_eq!(
            text,
            "apiVersion: networking.k8s.io/v1\n\
             kind: Ingress\n\
             metadata:\n  name: web\n  namespace: shop\n\
             spec:\n  ingressClassName: nginx\n  rules:\n\
             \x20 - host: b.example.com\n    http:\n      paths:\n\
             \x20     - path: /\n        pathType: Prefix\n        backend:\n          service:\n            name: b\n            port:\n              number: 80\n\
             \x20     - path: /api\n        pathType: Prefix\n        backend:\n          service:\n            name: api\n            port:\n              number: 9000\n\
             \x20 - host: a.example.com\n    http:\n      paths:\n\
             \x20     - path: /x\n        pathType: Exact\n        backend:\n          service:\n            name: a\n            port:\n              number: 8080\n"
        );
    }

    #[test]
    fn consumed_annotations_replaced_by_reference() {
        let route = Route::new("shop", "web")
            .with_path(PathRule::new("shop.example.com", "/", "web", 80))
            .with_nginx("ssl-redirect", "true")
            .with_nginx("proxy-buffer-size", "8k")
            .with_annotation("cert-manager.io/cluster-issuer", "letsencrypt");
        let text = render(
            &route,
            &["shop-web-ssl-redirect@kubernetescrd".to_string()],
            &["ssl-redirect"],
        );
        assert!(!text.contains("nginx.ingress.kubernetes.io/ssl-redirect"));
        assert!(text.contains("nginx.ingress.kubernetes.io/proxy-buffer-size: 8k"));
        assert!(text.contains("cert-manager.io/cluster-issuer: letsencrypt"));
        assert!(text.contains(
            "traefik.ingress.kubernetes.io/router.middlewares: shop-web-ssl-redirect@kubernetescrd"
        ));
        assert!(text.starts_with("# NOTE: left for the kubernetesIngressNginx provider: proxy-buffer-size\n"));
    }

    #[test]
    fn class_and_tls_defaults() {
        let route = Route::new("shop", "web")
            .with_path(PathRule::new("", "", "web", 80))
            .with_tls_secret("web-tls");
        let text = render(&route, &[], &[]);
        assert!(text.contains("ingressClassName: nginx\n"));
        assert!(text.contains("  - http:\n"));
        assert!(text.contains("- path: /\n"));
        assert!(text.contains("  tls:\n  - secretName: web-tls\n"));
        assert!(!text.contains("annotations:"));
    }
}
