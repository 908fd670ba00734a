//! Install, verify and cleanup files for the Gateway API path

use std::fmt::Write as _;

use ingshift_model::{ArtifactCategory, GeneratedArtifact, Route};

use crate::config::SynthConfig;

const VALUES: &str = r"# Envoy Gateway chart values
deployment:
  replicas: 2

config:
  envoyGateway:
    logging:
      level:
        default: info
";

/// `01-install-gateway-api-crds/install.sh`
pub fn install_crds(config: &SynthConfig) -> GeneratedArtifact {
    let version = &config.gateway_api_version;
    let content = format!(
        r#"#!/bin/bash
# Install the Gateway API standard channel CRDs
set -e

kubectl apply -f https://github.com/kubernetes-sigs/gateway-api/releases/download/{version}/standard-install.yaml
kubectl wait --for condition=Established crd/gateways.gateway.networking.k8s.io --timeout=60s
kubectl wait --for condition=Established crd/httproutes.gateway.networking.k8s.io --timeout=60s

echo "Gateway API {version} CRDs installed"
"#
    );
    GeneratedArtifact::new(
        "01-install-gateway-api-crds/install.sh",
        ArtifactCategory::Install,
        "Install Gateway API CRDs",
        content,
    )
}

/// `02-install-envoy-gateway/helm-install.sh`
pub fn helm_install(config: &SynthConfig) -> GeneratedArtifact {
    let version = &config.envoy_gateway_version;
    let content = format!(
        r#"#!/bin/bash
# Install Envoy Gateway next to ingress-nginx
set -e

helm upgrade --install eg oci://docker.io/envoyproxy/gateway-helm \
  --version {version} \
  --namespace envoy-gateway-system \
  --create-namespace \
  --values values.yaml

kubectl wait --timeout=5m -n envoy-gateway-system deployment/envoy-gateway --for=condition=Available

echo "Envoy Gateway is running. Next: kubectl apply -f ../03-gateway/"
"#
    );
    GeneratedArtifact::new(
        "02-install-envoy-gateway/helm-install.sh",
        ArtifactCategory::Install,
        "Helm install script for Envoy Gateway",
        content,
    )
}

/// `02-install-envoy-gateway/values.yaml`
pub fn helm_values() -> GeneratedArtifact {
    GeneratedArtifact::new(
        "02-install-envoy-gateway/values.yaml",
        ArtifactCategory::Install,
        "Envoy Gateway Helm values",
        VALUES,
    )
}

/// `06-verify.sh`, checking the Gateway and then every host
pub fn verify(config: &SynthConfig, routes: &[&Route]) -> GeneratedArtifact {
    let name = &config.gateway_name;
    let namespace = &config.gateway_namespace;
    let mut checks = String::new();
    for route in routes {
        for host in &route.hosts {
            let _ = write!(
                checks,
                "echo \"{qualified} -> {host}\"\n\
                 curl -s --connect-to \"{host}:80:${{GATEWAY_IP}}:80\" \"http://{host}\" -o /dev/null -w \"HTTP %{{http_code}}\\n\" || true\n",
                qualified = route.qualified_name(),
            );
        }
    }
    let content = format!(
        r#"#!/bin/bash
# Check the Gateway is programmed and send each host to it directly
set -e

kubectl get gateway {name} -n {namespace}
kubectl get httproute --all-namespaces

GATEWAY_IP=$(kubectl get gateway {name} -n {namespace} -o jsonpath='{{.status.addresses[0].value}}' 2>/dev/null || echo "")
if [ -z "$GATEWAY_IP" ]; then
  echo "Gateway {name} has no address yet"
  exit 1
fi
echo "Gateway: $GATEWAY_IP"

{checks}
echo "When every host answers as expected, move DNS to $GATEWAY_IP"
"#
    );
    GeneratedArtifact::new(
        "06-verify.sh",
        ArtifactCategory::Verify,
        "Check every host through the Gateway before DNS cutover",
        content,
    )
}

/// `07-cleanup/remove-nginx.sh`
pub fn remove_nginx() -> GeneratedArtifact {
    let content = r#"#!/bin/bash
# Remove ingress-nginx once the Gateway carries all traffic and DNS has settled
set -e

kubectl delete validatingwebhookconfiguration ingress-nginx-admission --ignore-not-found

if helm list -n ingress-nginx | grep -q ingress-nginx; then
  helm uninstall ingress-nginx -n ingress-nginx
else
  echo "No ingress-nginx Helm release found; remove the controller manually"
fi

kubectl delete namespace ingress-nginx --ignore-not-found

echo "Old Ingress objects are no longer served. Review and delete them:"
kubectl get ingress --all-namespaces
"#;
    GeneratedArtifact::new(
        "07-cleanup/remove-nginx.sh",
        ArtifactCategory::Cleanup,
        "Remove ingress-nginx after cutover",
        content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingshift_model::PathRule;

    #[test]
    fn versions_come_from_config() {
        let config = SynthConfig::default();
        assert!(install_crds(&config)
            .content
            .contains("releases/download/v1.2.0/standard-install.yaml"));
        assert!(helm_install(&config).content.contains("--version v1.2.0 \\\n"));
    }

    #[test]
    fn verify_checks_configured_gateway() {
        let config = SynthConfig::default().with_gateway("edge", "infra");
        let route = Route::new("shop", "web").with_path(PathRule::new("shop.example.com", "/", "web", 80));
        let script = verify(&config, &[&route]).content;
        assert!(script.contains("kubectl get gateway edge -n infra\n"));
        assert!(script.contains("jsonpath='{.status.addresses[0].value}'"));
        assert!(script.contains("curl -s --connect-to \"shop.example.com:80:${GATEWAY_IP}:80\""));
    }

    #[test]
    fn values_run_two_replicas() {
        assert!(helm_values().content.contains("replicas: 2"));
        assert!(remove_nginx().is_script());
    }
}
