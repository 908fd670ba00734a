//! Shared GatewayClass and Gateway

use serde::Serialize;

use super::httproute::API_VERSION;
use super::listeners::{ListenerTable, HTTP_SECTION, PLACEHOLDER_SECTION};
use crate::config::SynthConfig;
use crate::manifest::{Document, Object, ObjectMeta};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayClassSpec {
    controller_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewaySpec {
    gateway_class_name: String,
    listeners: Vec<Listener>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Listener {
    name: String,
    protocol: &'static str,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tls: Option<ListenerTls>,
    allowed_routes: AllowedRoutes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListenerTls {
    mode: &'static str,
    certificate_refs: Vec<CertificateRef>,
}

#[derive(Debug, Serialize)]
struct CertificateRef {
    name: String,
    namespace: String,
}

#[derive(Debug, Serialize)]
struct AllowedRoutes {
    namespaces: RouteNamespaces,
}

#[derive(Debug, Serialize)]
struct RouteNamespaces {
    from: &'static str,
}

fn allow_all() -> AllowedRoutes {
    AllowedRoutes {
        namespaces: RouteNamespaces { from: "All" },
    }
}

/// `GatewayClass` bound to the configured controller
pub fn gateway_class(config: &SynthConfig) -> serde_yaml::Result<Document> {
    Object::new(
        API_VERSION,
        "GatewayClass",
        ObjectMeta::cluster(&config.gateway_class),
        GatewayClassSpec {
            controller_name: config.gateway_controller.clone(),
        },
    )
    .into_document()
}

/// Shared `Gateway` with one HTTP listener and the HTTPS listeners of `table`
pub fn gateway(config: &SynthConfig, table: &ListenerTable) -> serde_yaml::Result<Document> {
    let mut listeners = vec![Listener {
        name: HTTP_SECTION.to_string(),
        protocol: "HTTP",
        port: 80,
        hostname: None,
        tls: None,
        allowed_routes: allow_all(),
    }];
    let mut notes = Vec::new();

    listeners.extend(table.listeners().iter().map(|l| Listener {
        name: l.section.clone(),
        protocol: "HTTPS",
        port: 443,
        hostname: l.hostname.clone(),
        tls: Some(ListenerTls {
            mode: "Terminate",
            certificate_refs: l
                .certificates
                .iter()
                .map(|c| CertificateRef {
                    name: c.secret.clone(),
                    namespace: c.namespace.clone(),
                })
                .collect(),
        }),
        allowed_routes: allow_all(),
    }));

    if table
        .listeners()
        .iter()
        .flat_map(|l| &l.certificates)
        .any(|c| c.namespace != config.gateway_namespace)
    {
        notes.push(format!(
            "certificateRefs outside {} need a ReferenceGrant in the secret's namespace",
            config.gateway_namespace
        ));
    }

    if table.needs_placeholder() {
        listeners.push(Listener {
            name: PLACEHOLDER_SECTION.to_string(),
            protocol: "HTTPS",
            port: 443,
            hostname: None,
            tls: Some(ListenerTls {
                mode: "Terminate",
                certificate_refs: vec![CertificateRef {
                    name: config.placeholder_tls_secret.clone(),
                    namespace: config.gateway_namespace.clone(),
                }],
            }),
            allowed_routes: allow_all(),
        });
        notes.push(format!(
            "listener {PLACEHOLDER_SECTION} references secret {}/{}; create it before routing HTTPS traffic to it",
            config.gateway_namespace, config.placeholder_tls_secret
        ));
    }

    let document = Object::new(
        API_VERSION,
        "Gateway",
        ObjectMeta::namespaced(&config.gateway_name, &config.gateway_namespace),
        GatewaySpec {
            gateway_class_name: config.gateway_class.clone(),
            listeners,
        },
    )
    .into_document()?
    .with_comment("Shared Gateway replacing the ingress-nginx controller")
    .with_notes(notes);
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingshift_model::{PathRule, Route};
    use pretty_assertions::assert_eq;

    #[test]
    fn class_uses_configured_controller() {
        let text = gateway_class(&SynthConfig::default()).unwrap().render().unwrap();
        assert_eq!(
            text,
            "apiVersion: gateway.networking.k8s.io/v1\n\
             kind: GatewayClass\n\
             metadata:\n  name: eg\n\
             spec:\n  controllerName: gateway.envoyproxy.io/gatewayclass-controller\n"
        );
    }

    #[test]
    fn https_listener_per_secret() {
        let route = Route::new("default", "web")
            .with_path(PathRule::new("web.example.com", "/", "web", 80))
            .with_tls_secret("web-tls");
        let table = ListenerTable::build(&[&route]);
        let doc = gateway(&SynthConfig::default(), &table).unwrap();
        let text = doc.render().unwrap();
        assert!(text.contains(
            "  - name: https-0\n    protocol: HTTPS\n    port: 443\n    hostname: web.example.com\n    tls:\n      mode: Terminate\n      certificateRefs:\n      - name: web-tls\n        namespace: default\n"
        ));
        assert!(!text.contains("name: https\n"));
        assert!(doc.notes().is_empty());
    }

    #[test]
    fn placeholder_and_reference_grant_notes() {
        let tls = Route::new("shop", "one")
            .with_path(PathRule::new("one.example.com", "/", "one", 80))
            .with_tls_secret("one-tls");
        let plain = Route::new("shop", "two")
            .with_path(PathRule::new("two.example.com", "/", "two", 80))
            .with_nginx("force-ssl-redirect", "true");
        let table = ListenerTable::build(&[&tls, &plain]);
        let doc = gateway(&SynthConfig::default(), &table).unwrap();
        let text = doc.render().unwrap();
        assert!(text.contains(
            "  - name: https\n    protocol: HTTPS\n    port: 443\n    tls:\n      mode: Terminate\n      certificateRefs:\n      - name: ingshift-placeholder-tls\n        namespace: default\n    allowedRoutes:\n"
        ));
        assert_eq!(doc.notes().len(), 2);
        assert!(doc.notes()[0].contains("ReferenceGrant"));
        assert!(doc.notes()[1].contains("default/ingshift-placeholder-tls"));
    }

    #[test]
    fn shared_host_yields_one_listener() {
        let one = Route::new("default", "one")
            .with_path(PathRule::new("shop.example.com", "/a", "one", 80))
            .with_tls_secret("one-tls");
        let two = Route::new("default", "two")
            .with_path(PathRule::new("shop.example.com", "/b", "two", 80))
            .with_tls_secret("two-tls");
        let table = ListenerTable::build(&[&one, &two]);
        let text = gateway(&SynthConfig::default(), &table).unwrap().render().unwrap();
        assert_eq!(text.matches("port: 443").count(), 1);
        assert_eq!(text.matches("hostname: shop.example.com").count(), 1);
        assert!(text.contains(
            "      certificateRefs:\n      - name: one-tls\n        namespace: default\n      - name: two-tls\n        namespace: default\n"
        ));
    }

    #[test]
    fn http_listener_first() {
        let doc = gateway(&SynthConfig::default(), &ListenerTable::default()).unwrap();
        let text = doc.render().unwrap();
        assert!(text.contains("  listeners:\n  - name: http\n    protocol: HTTP\n    port: 80\n    allowedRoutes:\n      namespaces:\n        from: All\n"));
    }
}
