//! Testing utilities for the ingshift workspace
//!
//! Shared route fixtures and proptest strategies.

#![allow(missing_docs)]

use ingshift_model::{PathRule, Route};
use proptest::prelude::*;

/// `shop/checkout` on `shop.example.com/pay` with TLS, an HTTPS redirect and a rate limit
pub fn shop_checkout() -> Route {
    Route::new("shop", "checkout")
        .with_ingress_class("nginx")
        .with_path(PathRule::new("shop.example.com", "/pay", "checkout", 8080))
        .with_tls_secret("shop-tls")
        .with_nginx("ssl-redirect", "true")
        .with_nginx("limit-rps", "50")
}

/// Plain route with a single `/` rule and no annotations
pub fn simple_route(namespace: &str, name: &str, host: &str) -> Route {
    Route::new(namespace, name)
        .with_ingress_class("nginx")
        .with_path(PathRule::new(host, "/", name, 80))
}

/// Route carrying a raw NGINX snippet
pub fn snippet_route() -> Route {
    simple_route("legacy", "snippets", "legacy.example.com")
        .with_nginx("configuration-snippet", "more_set_headers \"X-Frame-Options: DENY\";")
}

/// Route exercising most Traefik middleware groups
pub fn kitchen_sink() -> Route {
    Route::new("prod", "api")
        .with_ingress_class("nginx")
        .with_path(PathRule::new("api.example.com", "/v1", "api", 8080))
        .with_path(PathRule::new("api.example.com", "/v2", "api-v2", 8080).with_path_type("Exact"))
        .with_tls_secret("api-tls")
        .with_nginx("force-ssl-redirect", "true")
        .with_nginx("enable-cors", "true")
        .with_nginx("cors-allow-origin", "https://app.example.com")
        .with_nginx("auth-url", "https://auth.example.com/verify")
        .with_nginx("auth-response-headers", "X-User, X-Email")
        .with_nginx("limit-rpm", "600")
        .with_nginx("limit-connections", "20")
        .with_nginx("whitelist-source-range", "10.0.0.0/8, 192.168.0.0/16")
        .with_nginx("rewrite-target", "/")
        .with_nginx("proxy-read-timeout", "60")
        .with_nginx("proxy-connect-timeout", "5")
        .with_annotation("cert-manager.io/cluster-issuer", "letsencrypt")
}

/// A small mixed fleet in deliberately unsorted order
pub fn fleet() -> Vec<Route> {
    vec![
        kitchen_sink(),
        shop_checkout(),
        snippet_route(),
        simple_route("default", "web", "www.example.com"),
    ]
}

/// Strategy over table keys plus a few unknown ones
pub fn annotation_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ssl-redirect".to_string()),
        Just("force-ssl-redirect".to_string()),
        Just("limit-rps".to_string()),
        Just("auth-url".to_string()),
        Just("auth-type".to_string()),
        Just("rewrite-target".to_string()),
        Just("use-regex".to_string()),
        Just("canary".to_string()),
        Just("canary-weight".to_string()),
        Just("configuration-snippet".to_string()),
        Just("server-snippet".to_string()),
        Just("proxy-read-timeout".to_string()),
        Just("affinity".to_string()),
        "[a-z]{3,8}-[a-z]{3,8}",
    ]
}

/// Strategy over routes with random legacy annotations
pub fn arb_route() -> impl Strategy<Value = Route> {
    (
        "[a-z]{1,6}",
        "[a-z]{1,8}",
        proptest::collection::btree_map(annotation_key(), "[a-z0-9]{0,6}", 0..8),
    )
        .prop_map(|(ns, name, annotations)| {
            annotations
                .into_iter()
                .fold(simple_route(&ns, &name, "app.example.com"), |route, (k, v)| {
                    route.with_nginx(&k, &v)
                })
        })
}
